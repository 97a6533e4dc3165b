use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::{Question, TriviaStore},
    format::CategoryMap,
    pagination::paginate,
    server::{app::AppState, ApiError},
};

use super::{page_number, ApiResponse, PageQuery};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    category: i64,
    categories: CategoryMap,
}

async fn get_categories(
    State(store): State<Arc<dyn TriviaStore>>,
) -> ApiResponse<Json<CategoriesResponse>> {
    let categories: CategoryMap = store.list_categories().await?.into_iter().collect();
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

async fn category_questions(
    State(store): State<Arc<dyn TriviaStore>>,
    id: Result<Path<i64>, PathRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<CategoryQuestionsPage>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let questions = store.questions_in_category(id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = questions.len();
    let categories = store.list_categories().await?.into_iter().collect();

    Ok(Json(CategoryQuestionsPage {
        success: true,
        questions: paginate(questions, page_number(page)),
        total_questions,
        category: id,
        categories,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
