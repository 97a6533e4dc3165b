//! Quiz question selection.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::Question;

/// Category id that means "questions from every category".
pub const ANY_CATEGORY: i64 = 0;

/// Source of uniformly distributed indices.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn index(&self, len: usize) -> usize;
}

pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible sequence of picks for a given seed.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}

/// `None` for [`ANY_CATEGORY`], the category id otherwise.
pub fn category_filter(category: i64) -> Option<i64> {
    (category != ANY_CATEGORY).then_some(category)
}

/// Picks one of the `candidates` whose id is not in `previous`, uniformly at random.
pub fn pick_unseen(
    candidates: Vec<Question>,
    previous: &[i64],
    random: &dyn RandomSource,
) -> Option<Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let mut unseen: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();
    if unseen.is_empty() {
        return None;
    }
    let index = random.index(unseen.len()).min(unseen.len() - 1);
    Some(unseen.swap_remove(index))
}
