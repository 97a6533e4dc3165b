use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    db::{NewQuestion, Question, TriviaStore},
    format::CategoryMap,
    pagination::paginate,
    server::{app::AppState, ApiError},
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{page_number, ApiResponse, PageQuery};

// the frontend posts select values, so numbers may arrive as strings
#[derive(Deserialize)]
struct CreateQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

impl From<CreateQuestion> for NewQuestion {
    fn from(body: CreateQuestion) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    category: &'static str,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct DeletedPage {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct SearchPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: &'static str,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

async fn list_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = store.list_questions().await?;
    let total_questions = questions.len();
    let questions = paginate(questions, page_number(page));
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        category: "",
        categories: store.list_categories().await?.into_iter().collect(),
    }))
}

async fn create_question(
    State(store): State<Arc<dyn TriviaStore>>,
    body: Result<Json<CreateQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(body) = body?;
    let id = store
        .insert_question(body.into())
        .await
        .map_err(ApiError::unprocessable)?;

    QUESTIONS_CREATED.inc();
    tracing::info!(id, "Created question");
    Ok(Json(Created { success: true }))
}

/// Deletes the question and returns the requested page of what is left.
///
/// A page left empty by the delete is still a success.
async fn delete_question(
    State(store): State<Arc<dyn TriviaStore>>,
    id: Result<Path<i64>, PathRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<DeletedPage>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    if store.find_question(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    // someone else may have deleted it in between
    if !store.delete_question(id).await? {
        return Err(ApiError::NotFound);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Deleted question");

    let questions = store.list_questions().await?;
    let total_questions = questions.len();
    Ok(Json(DeletedPage {
        success: true,
        deleted: id,
        questions: paginate(questions, page_number(page)),
        total_questions,
        categories: store.list_categories().await?.into_iter().collect(),
    }))
}

async fn search_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    page: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResponse<Json<SearchPage>> {
    let Json(SearchRequest { search_term }) = body?;
    let found = store
        .search_questions(&search_term)
        .await
        .map_err(ApiError::unprocessable)?;
    let total_questions = found.len();
    tracing::debug!(%search_term, total_questions, "Searched questions");
    let categories = store
        .list_categories()
        .await
        .map_err(ApiError::unprocessable)?
        .into_iter()
        .collect();

    Ok(Json(SearchPage {
        success: true,
        questions: paginate(found, page_number(page)),
        total_questions,
        current_category: "",
        categories,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
