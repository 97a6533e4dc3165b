use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    db::{Question, TriviaStore},
    quiz::{self, RandomSource, ANY_CATEGORY},
    server::{app::AppState, ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

// the frontend sends `{"type": "Science", "id": "1"}`, or `{"type": "click", "id": 0}` for all
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QuizResponse {
    Next { success: bool, question: Question },
    Exhausted { question: Option<Question> },
}

async fn next_question(
    State(store): State<Arc<dyn TriviaStore>>,
    State(random): State<Arc<dyn RandomSource>>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(request) = body?;
    let category = request.quiz_category.map_or(ANY_CATEGORY, |c| c.id);
    let candidates = match quiz::category_filter(category) {
        Some(id) => store.questions_in_category(id).await,
        None => store.list_questions().await,
    }
    .map_err(ApiError::unprocessable)?;
    let previous = request.previous_questions.unwrap_or_default();

    let response = match quiz::pick_unseen(candidates, &previous, &*random) {
        Some(question) => {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.to_string().as_str()])
                .inc();
            tracing::debug!(question = question.id, category, "Serving quiz question");
            QuizResponse::Next {
                success: true,
                question,
            }
        }
        None => {
            tracing::debug!(category, seen = previous.len(), "Quiz has no questions left");
            QuizResponse::Exhausted { question: None }
        }
    };
    Ok(Json(response))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
