//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::ClaimPipeline;
use crate::server::routes::{analyze_api_handler, analyze_form_handler, health_handler, index_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ClaimPipeline>,
}

/// Headroom between the pipeline's evidence deadline and the request
/// timeout, so a slow lookup still returns the prediction.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(30);

/// Build the Axum application router
pub fn build_app(pipeline: Arc<ClaimPipeline>) -> Router {
    let request_timeout = pipeline.evidence_timeout() + REQUEST_TIMEOUT_MARGIN;
    let state = AppState { pipeline };

    // CORS configuration - allow any origin for the JSON API
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_form_handler))
        .route("/api/analyze", post(analyze_api_handler))
        .route("/health", get(health_handler))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
