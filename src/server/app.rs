use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{routes, ApiError};
use crate::db::TriviaStore;
use crate::quiz::RandomSource;

#[derive(FromRef, Clone)]
pub struct AppState {
    store: Arc<dyn TriviaStore>,
    random: Arc<dyn RandomSource>,
}

impl AppState {
    pub fn new(store: Arc<dyn TriviaStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(err) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Failed to encode metrics: {err}");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}
