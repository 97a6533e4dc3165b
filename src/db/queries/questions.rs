use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

impl NewQuestion {
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Questions containing `term`, ignoring case.
///
/// SQLite only folds ASCII case, so rows are filtered here with full Unicode lowercasing.
#[tracing::instrument(skip(pool))]
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when there was no question with this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{in_memory_pool, run_migrations};

    async fn pool_with(questions: &[(&str, i64)]) -> SqlitePool {
        let pool = in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        for (text, category) in questions {
            create_question(
                &pool,
                &NewQuestion {
                    question: text.to_string(),
                    answer: "answer".to_owned(),
                    category: *category,
                    difficulty: 1,
                },
            )
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = pool_with(&[
            ("What is the TITLE of the book?", 1),
            ("Whose autobiography is entitled this?", 4),
            ("Who discovered penicillin?", 1),
        ])
        .await;

        let found = search_questions(&pool, "tItLe").await.unwrap();
        let ids: Vec<i64> = found.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn search_treats_percent_literally() {
        let pool = pool_with(&[("Is 100% of it water?", 1), ("Is 1000 a number?", 1)]).await;

        let found = search_questions(&pool, "100%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Is 100% of it water?");
    }

    #[tokio::test]
    async fn search_folds_case_beyond_ascii() {
        let pool = pool_with(&[("Which ÉCOLE?", 1), ("Which school?", 1)]).await;

        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Which ÉCOLE?");
    }

    #[tokio::test]
    async fn empty_term_matches_everything() {
        let pool = pool_with(&[("a", 1), ("b", 2)]).await;
        assert_eq!(search_questions(&pool, "").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filter_by_category() {
        let pool = pool_with(&[("a", 1), ("b", 2), ("c", 1)]).await;

        let ids: Vec<i64> = get_questions_for_category(&pool, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(get_questions_for_category(&pool, 9)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = pool_with(&[("a", 1)]).await;

        assert!(delete_question(&pool, 1).await.unwrap());
        assert!(!delete_question(&pool, 1).await.unwrap());
        assert_eq!(get_question_by_id(&pool, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn import_preserves_ids() {
        let pool = pool_with(&[("old text", 1)]).await;

        import_questions(
            &pool,
            vec![
                Question {
                    id: 1,
                    question: "new text".to_owned(),
                    answer: "x".to_owned(),
                    category: 2,
                    difficulty: 3,
                },
                Question {
                    id: 20,
                    question: "Who discovered penicillin?".to_owned(),
                    answer: "Alexander Fleming".to_owned(),
                    category: 1,
                    difficulty: 3,
                },
            ],
        )
        .await
        .unwrap();

        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "new text");
        assert_eq!(questions[1].id, 20);
    }
}
