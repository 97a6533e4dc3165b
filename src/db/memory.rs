use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use itertools::Itertools;
use tokio::sync::RwLock;

use super::store::{StoreError, StoreResult, TriviaStore};
use super::{Category, NewQuestion, Question};

/// In-process store with the same ordering rules as the SQLite one.
///
/// Can be switched into an unavailable state to exercise store failure paths.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
}

struct MemoryState {
    categories: Vec<Category>,
    questions: Vec<Question>,
    next_question_id: i64,
}

impl MemoryStore {
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Self {
        let questions: Vec<Question> = questions.into_iter().sorted_by_key(|q| q.id).collect();
        let next_question_id = questions.last().map_or(1, |q| q.id + 1);
        Self {
            state: RwLock::new(MemoryState {
                categories,
                questions,
                next_question_id,
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// While set, every operation fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl TriviaStore for MemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .cloned()
            .sorted_by(|a, b| a.kind.cmp(&b.kind).then(a.id.cmp(&b.id)))
            .collect())
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        self.ensure_available()?;
        Ok(self.state.read().await.questions.clone())
    }

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        self.ensure_available()?;
        let term = term.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.question.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<i64> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let id = state.next_question_id;
        state.next_question_id += 1;
        state.questions.push(question.with_id(id));
        Ok(id)
    }

    async fn delete_question(&self, id: i64) -> StoreResult<bool> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let before = state.questions.len();
        state.questions.retain(|q| q.id != id);
        Ok(state.questions.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, text: &str, category: i64) -> Question {
        Question {
            id,
            question: text.to_owned(),
            answer: "answer".to_owned(),
            category,
            difficulty: 1,
        }
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_questions() {
        let store = MemoryStore::new(vec![], vec![question(7, "b", 1), question(3, "a", 1)]);
        let id = store
            .insert_question(NewQuestion {
                question: "c".to_owned(),
                answer: "d".to_owned(),
                category: 1,
                difficulty: 1,
            })
            .await
            .unwrap();
        assert_eq!(id, 8);

        let ids: Vec<i64> = store
            .list_questions()
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![3, 7, 8]);
    }

    #[tokio::test]
    async fn search_ignores_case_beyond_ascii() {
        let store = MemoryStore::new(vec![], vec![question(1, "ÉCOLE or école?", 1)]);
        assert_eq!(store.search_questions("éCOLE").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new(vec![], vec![question(1, "a", 1)]);
        store.set_unavailable(true);
        assert!(matches!(
            store.list_questions().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.delete_question(1).await.is_err());

        store.set_unavailable(false);
        assert!(store.delete_question(1).await.unwrap());
    }
}
