use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::pipeline::{AnalysisReport, PipelineError};
use crate::server::app::AppState;
use crate::server::page::{render_page, PageContent};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

/// `GET /` - empty form
pub async fn index_handler() -> Html<String> {
    Html(render_page("", PageContent::Empty))
}

/// `POST /analyze` - form submission, renders the result page
pub async fn analyze_form_handler(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Response {
    match state.pipeline.analyze(&request.text).await {
        Ok(report) => {
            Html(render_page(&request.text, PageContent::Report(&report))).into_response()
        }
        Err(PipelineError::EmptyInput) => (
            StatusCode::OK,
            Html(render_page(
                &request.text,
                PageContent::Warning(&PipelineError::EmptyInput.to_string()),
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&request.text, PageContent::Error(&e.to_string()))),
            )
                .into_response()
        }
    }
}

/// `POST /api/analyze` - JSON in, [`AnalysisReport`] out
pub async fn analyze_api_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, PipelineError> {
    let report = state.pipeline.analyze(&request.text).await?;
    Ok(Json(report))
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match self {
            PipelineError::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Classify(ref e) => {
                tracing::error!(error = %e, "Analysis failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
