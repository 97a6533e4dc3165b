mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::extract::{rejection::QueryRejection, Query};
use serde::Deserialize;

use super::deserializers::deserialize_lenient_i64;
use super::ApiError;

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
}

// a query string that cannot be read at all (e.g. `page` given twice) means the first page
fn page_number(query: Result<Query<PageQuery>, QueryRejection>) -> i64 {
    match query {
        Ok(Query(PageQuery { page })) => page.unwrap_or(1),
        Err(rejection) => {
            tracing::debug!("Ignoring query string: {}", rejection.body_text());
            1
        }
    }
}
