use axum::{extract::State, Json};
use fake_news_model::ArtifactInfo;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: ArtifactInfo,
    retriever: &'static str,
    summarizer: &'static str,
}

/// Health check endpoint
///
/// The model is loaded before the server binds, so a running server is
/// always healthy; the response reports what was loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.pipeline.artifacts().info().clone(),
        retriever: state.pipeline.retriever_name(),
        summarizer: state.pipeline.summarizer_name(),
    })
}
