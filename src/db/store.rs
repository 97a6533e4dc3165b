//! Storage seam used by the HTTP layer.
//!
//! Handlers only see [`TriviaStore`], so the SQLite-backed [`SqliteStore`] can be swapped for
//! [`MemoryStore`](super::MemoryStore) in tests.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use super::queries::{categories, questions};
use super::{Category, NewQuestion, Question};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TriviaStore: Send + Sync {
    /// All categories, ordered by label.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    /// All questions, ordered by id.
    async fn list_questions(&self) -> StoreResult<Vec<Question>>;

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>>;

    /// Questions whose category equals `category`, ordered by id.
    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>>;

    /// Questions containing `term` as a case-insensitive substring, ordered by id.
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;

    /// Persists the question and returns the id assigned to it.
    async fn insert_question(&self, question: NewQuestion) -> StoreResult<i64>;

    /// Returns `false` when nothing was deleted.
    async fn delete_question(&self, id: i64) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TriviaStore for SqliteStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(categories::get_all_categories(&self.pool).await?)
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        Ok(questions::get_all_questions(&self.pool).await?)
    }

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(questions::get_question_by_id(&self.pool, id).await?)
    }

    async fn questions_in_category(&self, category: i64) -> StoreResult<Vec<Question>> {
        Ok(questions::get_questions_for_category(&self.pool, category).await?)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        Ok(questions::search_questions(&self.pool, term).await?)
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<i64> {
        Ok(questions::create_question(&self.pool, &question).await?)
    }

    async fn delete_question(&self, id: i64) -> StoreResult<bool> {
        Ok(questions::delete_question(&self.pool, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{in_memory_pool, run_migrations};

    async fn store() -> SqliteStore {
        let pool = in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_owned(),
            answer: "answer".to_owned(),
            category,
            difficulty: 2,
        }
    }

    #[tokio::test]
    async fn insert_then_delete() {
        let store = store().await;
        let id = store
            .insert_question(new_question("Who invented Peanut Butter?", 4))
            .await
            .unwrap();

        let found = store.find_question(id).await.unwrap().unwrap();
        assert_eq!(found.question, "Who invented Peanut Butter?");
        assert_eq!(found.difficulty, 2);
        assert_eq!(store.list_questions().await.unwrap().len(), 1);

        assert!(store.delete_question(id).await.unwrap());
        assert!(store.find_question(id).await.unwrap().is_none());
        assert!(store.list_questions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_questions_get_increasing_ids() {
        let store = store().await;
        let first = store.insert_question(new_question("a", 1)).await.unwrap();
        let second = store.insert_question(new_question("b", 1)).await.unwrap();
        assert!(second > first);

        let last = store.list_questions().await.unwrap().pop().unwrap();
        assert_eq!(last.id, second);
    }

    #[tokio::test]
    async fn search_agrees_with_memory_store() {
        let sqlite = store().await;
        let texts = ["Which ÉCOLE?", "Straße or STRASSE?", "Who discovered penicillin?"];
        for text in texts {
            sqlite.insert_question(new_question(text, 1)).await.unwrap();
        }
        let memory = crate::db::MemoryStore::new(vec![], sqlite.list_questions().await.unwrap());

        for term in ["école", "STRASSE", "straße", "PENICILLIN", "nothing"] {
            assert_eq!(
                sqlite.search_questions(term).await.unwrap(),
                memory.search_questions(term).await.unwrap(),
                "term {term}"
            );
        }
        assert_eq!(sqlite.search_questions("école").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_errors_wrap_database_failures() {
        let store = store().await;
        store.pool().close().await;

        let err = store.list_questions().await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
