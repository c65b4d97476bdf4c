//! HTTP route tests, run in-process against the router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use evidence::testing::sample_hits;
use evidence::{EvidenceHit, EvidenceRetriever, MockRetriever, MockSummarizer, RetrievalResult};
use factflow_core::server::build_app;
use factflow_core::ClaimPipeline;
use fake_news_model::testing::constant_artifacts;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Answers only after `delay`, measured on the tokio clock.
struct SlowRetriever {
    delay: Duration,
}

#[async_trait]
impl EvidenceRetriever for SlowRetriever {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn retrieve(&self, _claim: &str) -> RetrievalResult<Vec<EvidenceHit>> {
        tokio::time::sleep(self.delay).await;
        Ok(sample_hits(5))
    }
}

fn slow_app(delay: Duration, evidence_timeout: Duration) -> Router {
    let pipeline = ClaimPipeline::new(
        Arc::new(constant_artifacts(0.87)),
        Arc::new(SlowRetriever { delay }),
        Arc::new(MockSummarizer::new()),
    )
    .with_evidence_timeout(evidence_timeout);
    build_app(Arc::new(pipeline))
}

fn test_app(retriever: MockRetriever) -> Router {
    let pipeline = ClaimPipeline::new(
        Arc::new(constant_artifacts(0.87)),
        Arc::new(retriever),
        Arc::new(MockSummarizer::new()),
    );
    build_app(Arc::new(pipeline))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_serves_form() {
    let app = test_app(MockRetriever::new());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("FactFlow — Fake News Detection + Evidence Summarizer"));
    assert!(html.contains(">Analyze</button>"));
}

#[tokio::test]
async fn form_submission_renders_result() {
    let app = test_app(MockRetriever::new().with_hits(sample_hits(5)));

    let response = app
        .oneshot(form_request("text=The+moon+is+made+of+cheese"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("🟥 Fake (Fake Probability: 87.00%)"));
    assert!(html.contains("<strong>Source 1</strong>"));
    assert!(html.contains("<strong>Source 3</strong>"));
    assert!(!html.contains("Source 4"));
    assert_eq!(html.matches(">Read more</a>").count(), 3);

    let first = html.find("Source 1").unwrap();
    let third = html.find("Source 3").unwrap();
    assert!(first < third);
}

#[tokio::test]
async fn blank_form_shows_warning() {
    let app = test_app(MockRetriever::new().with_hits(sample_hits(5)));

    let response = app.oneshot(form_request("text=+++")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Please enter something."));
    assert!(!html.contains("Fake Probability"));
}

#[tokio::test]
async fn api_returns_report() {
    let app = test_app(MockRetriever::new().with_hits(sample_hits(5)));

    let response = app
        .oneshot(json_request(
            "/api/analyze",
            r#"{"text":"The moon is made of cheese"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["prediction"]["label"], "fake");
    assert_eq!(json["evidence"]["status"], "summarized");
    assert_eq!(json["evidence"]["summaries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn api_rejects_blank_text() {
    let app = test_app(MockRetriever::new());

    let response = app
        .oneshot(json_request("/api/analyze", r#"{"text":"  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error"], "Please enter something.");
}

#[tokio::test]
async fn api_reports_retrieval_failure_in_body() {
    let app = test_app(MockRetriever::new().failing("search backend down"));

    let response = app
        .oneshot(json_request("/api/analyze", r#"{"text":"A claim"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["evidence"]["status"], "retrieval_failed");
    assert!(json["evidence"]["reason"]
        .as_str()
        .unwrap()
        .contains("search backend down"));
}

#[tokio::test(start_paused = true)]
async fn slow_evidence_still_returns_prediction() {
    let app = slow_app(Duration::from_secs(150), Duration::from_secs(90));

    let response = app
        .oneshot(json_request("/api/analyze", r#"{"text":"The moon is made of cheese"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["prediction"]["label"], "fake");
    assert_eq!(json["evidence"]["status"], "retrieval_failed");
    assert!(json["evidence"]["reason"]
        .as_str()
        .unwrap()
        .contains("timed out after 90 seconds"));
}

#[tokio::test(start_paused = true)]
async fn request_timeout_follows_evidence_timeout() {
    // Longer than the old fixed two minute limit
    let app = slow_app(Duration::from_secs(150), Duration::from_secs(200));

    let response = app
        .oneshot(json_request("/api/analyze", r#"{"text":"The moon is made of cheese"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["evidence"]["status"], "summarized");
    assert_eq!(json["evidence"]["summaries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn health_reports_loaded_model() {
    let app = test_app(MockRetriever::new());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"]["model_kind"], "logistic_regression");
    assert_eq!(json["model"]["dimension"], 18);
    assert_eq!(json["retriever"], "mock");
    assert_eq!(json["summarizer"], "mock");
}
