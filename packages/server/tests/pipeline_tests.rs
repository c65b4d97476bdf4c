//! Pipeline integration tests: classification plus every evidence outcome.

use std::sync::Arc;

use evidence::testing::sample_hits;
use evidence::{MockRetriever, MockSummarizer, MockSummaryMode, SNIPPET_CHARS};
use factflow_core::render::{evidence_markdown, prediction_line};
use factflow_core::{ClaimPipeline, EvidenceOutcome, PipelineError};
use fake_news_model::testing::{constant_artifacts, demo_artifacts};
use fake_news_model::Label;

fn pipeline_with(
    fake_probability: f64,
    retriever: Arc<MockRetriever>,
    summarizer: Arc<MockSummarizer>,
) -> ClaimPipeline {
    ClaimPipeline::new(
        Arc::new(constant_artifacts(fake_probability)),
        retriever,
        summarizer,
    )
}

#[tokio::test]
async fn moon_cheese_example_end_to_end() {
    let retriever = Arc::new(MockRetriever::new().with_hits(sample_hits(5)));
    let summarizer = Arc::new(MockSummarizer::new());
    let pipeline = pipeline_with(0.87, retriever.clone(), summarizer.clone());

    let report = pipeline.analyze("The moon is made of cheese").await.unwrap();

    assert_eq!(report.prediction.label, Label::Fake);
    assert_eq!(
        prediction_line(&report.prediction),
        "🟥 Fake (Fake Probability: 87.00%)"
    );

    // Raw claim goes to the retriever, only three hits reach the summarizer
    assert_eq!(retriever.calls(), vec!["The moon is made of cheese".to_string()]);
    assert_eq!(summarizer.batches(), vec![3]);

    let EvidenceOutcome::Summarized { summaries } = &report.evidence else {
        panic!("expected summaries, got {:?}", report.evidence);
    };
    let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Source 1", "Source 2", "Source 3"]);
    assert_eq!(summaries[0].summary, "Summary of Source 1");
    assert_eq!(summaries[2].href.as_str(), "https://source3.example.com/");

    let md = evidence_markdown(&report.evidence);
    assert_eq!(md.matches("[Read more]").count(), 3);
}

#[tokio::test]
async fn fewer_than_three_hits_are_all_used() {
    let summarizer = Arc::new(MockSummarizer::new());
    let pipeline = pipeline_with(
        0.2,
        Arc::new(MockRetriever::new().with_hits(sample_hits(2))),
        summarizer.clone(),
    );

    let report = pipeline.analyze("Water boils at 100 degrees").await.unwrap();
    assert_eq!(report.prediction.label, Label::Real);
    assert_eq!(summarizer.batches(), vec![2]);
    assert_eq!(report.evidence.entries().len(), 2);
}

#[tokio::test]
async fn blank_input_short_circuits() {
    let retriever = Arc::new(MockRetriever::new().with_hits(sample_hits(5)));
    let summarizer = Arc::new(MockSummarizer::new());
    let pipeline = pipeline_with(0.5, retriever.clone(), summarizer.clone());

    for blank in ["", "   ", "\n\t"] {
        let err = pipeline.analyze(blank).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
        assert_eq!(err.to_string(), "Please enter something.");
    }

    assert!(retriever.calls().is_empty());
    assert!(summarizer.batches().is_empty());
}

#[tokio::test]
async fn no_hits_outcome() {
    let summarizer = Arc::new(MockSummarizer::new());
    let pipeline = pipeline_with(0.6, Arc::new(MockRetriever::new()), summarizer.clone());

    let report = pipeline.analyze("Some claim").await.unwrap();
    assert_eq!(report.evidence, EvidenceOutcome::NoHits);
    assert!(summarizer.batches().is_empty());
    assert_eq!(
        evidence_markdown(&report.evidence),
        "No supporting evidence found."
    );
}

#[tokio::test]
async fn retrieval_failure_keeps_prediction() {
    let summarizer = Arc::new(MockSummarizer::new());
    let pipeline = pipeline_with(
        0.9,
        Arc::new(MockRetriever::new().failing("connection reset")),
        summarizer.clone(),
    );

    let report = pipeline.analyze("Some claim").await.unwrap();
    assert_eq!(report.prediction.label, Label::Fake);
    assert!(summarizer.batches().is_empty());

    let EvidenceOutcome::RetrievalFailed { reason } = &report.evidence else {
        panic!("expected retrieval failure, got {:?}", report.evidence);
    };
    assert!(reason.contains("connection reset"));
    assert!(report
        .evidence
        .notice()
        .unwrap()
        .starts_with("⚠️ Could not retrieve supporting evidence: "));
}

#[tokio::test]
async fn summarizer_failure_falls_back_to_snippets() {
    let pipeline = pipeline_with(
        0.3,
        Arc::new(MockRetriever::new().with_hits(sample_hits(4))),
        Arc::new(MockSummarizer::new().failing("rate limited")),
    );

    let report = pipeline.analyze("Some claim").await.unwrap();
    let EvidenceOutcome::Snippets { reason, summaries } = &report.evidence else {
        panic!("expected snippets, got {:?}", report.evidence);
    };
    assert!(reason.contains("rate limited"));
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[1].title, "Source 2");
    assert_eq!(summaries[1].summary, "Body of source 2. It has two sentences.");
    assert!(summaries
        .iter()
        .all(|s| s.summary.chars().count() <= SNIPPET_CHARS + 1));
}

#[tokio::test]
async fn misaligned_summaries_fall_back_to_snippets() {
    for mode in [MockSummaryMode::Reversed, MockSummaryMode::Short] {
        let pipeline = pipeline_with(
            0.3,
            Arc::new(MockRetriever::new().with_hits(sample_hits(3))),
            Arc::new(MockSummarizer::new().with_mode(mode.clone())),
        );

        let report = pipeline.analyze("Some claim").await.unwrap();
        assert_eq!(report.evidence.status(), "snippets", "mode {:?}", mode);

        let hrefs: Vec<String> = report
            .evidence
            .entries()
            .iter()
            .map(|s| s.href.to_string())
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "https://source1.example.com/",
                "https://source2.example.com/",
                "https://source3.example.com/",
            ]
        );
    }
}

#[tokio::test]
async fn identical_text_gives_identical_prediction() {
    let text = "SHOCKING: the moon is made of cheese, officials reported";

    let first = ClaimPipeline::new(
        Arc::new(demo_artifacts()),
        Arc::new(MockRetriever::new()),
        Arc::new(MockSummarizer::new()),
    );
    let second = ClaimPipeline::new(
        Arc::new(demo_artifacts()),
        Arc::new(MockRetriever::new()),
        Arc::new(MockSummarizer::new()),
    );

    let a = first.classify(text).unwrap();
    let b = second.classify(text).unwrap();
    assert_eq!(a, b);
    assert!((0.0..=1.0).contains(&a.fake_probability));
    assert_eq!(a.label.is_fake(), a.fake_probability > 0.5);
}

#[tokio::test]
async fn report_serializes_for_the_api() {
    let pipeline = pipeline_with(
        0.87,
        Arc::new(MockRetriever::new().with_hits(sample_hits(1))),
        Arc::new(MockSummarizer::new()),
    );

    let report = pipeline.analyze("The moon is made of cheese").await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["claim"], "The moon is made of cheese");
    assert_eq!(json["prediction"]["label"], "fake");
    assert_eq!(json["evidence"]["status"], "summarized");
    assert_eq!(json["evidence"]["summaries"][0]["title"], "Source 1");
    assert!(json["id"].is_string());
    assert!(json["created_at"].is_string());
}
