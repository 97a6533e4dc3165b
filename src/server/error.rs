use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// Failures clients get to see. Handlers only produce `NotFound` and `Unprocessable`;
/// `MethodNotAllowed` comes from the router when a known path gets the wrong method.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn unprocessable(cause: impl Display) -> Self {
        tracing::warn!("Unprocessable request: {cause}");
        ApiError::Unprocessable(cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::NotFound => "Not found",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Unprocessable(_) => "Unprocessable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

// store failures on read and delete paths are reported as missing resources
impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        tracing::error!("Store failure: {error}");
        ApiError::NotFound
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body() {
        let (status, body) = body_of(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 404, "message": "Not found"})
        );
    }

    #[tokio::test]
    async fn unprocessable_body_hides_the_cause() {
        let (status, body) = body_of(ApiError::unprocessable("missing field `answer`")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 422, "message": "Unprocessable"})
        );
    }

    #[tokio::test]
    async fn method_not_allowed_body() {
        let (status, body) = body_of(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 405, "message": "Method not allowed"})
        );
    }

    #[test]
    fn store_errors_become_not_found() {
        let error: ApiError = StoreError::Unavailable("down".to_owned()).into();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }
}
