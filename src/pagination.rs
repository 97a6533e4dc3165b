pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the 1-based `page` of `records`, at most [`QUESTIONS_PER_PAGE`] long.
///
/// Pages past the end, and pages below 1, are empty.
pub fn paginate<T>(records: Vec<T>, page: i64) -> Vec<T> {
    let Some(skipped_pages) = page.checked_sub(1).and_then(|p| usize::try_from(p).ok()) else {
        return Vec::new();
    };
    let start = skipped_pages.saturating_mul(QUESTIONS_PER_PAGE);
    records
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
