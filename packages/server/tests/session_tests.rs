//! Session state machine tests using a recording presenter.

use std::sync::Arc;

use evidence::testing::sample_hits;
use evidence::{MockRetriever, MockSummarizer};
use factflow_core::render::prediction_line;
use factflow_core::{ClaimPipeline, EvidenceOutcome, Presenter, Session, SessionState};
use fake_news_model::testing::constant_artifacts;
use fake_news_model::Prediction;

#[derive(Default)]
struct RecordingPresenter {
    events: Vec<String>,
    states: Vec<SessionState>,
}

impl Presenter for RecordingPresenter {
    fn show_warning(&mut self, message: &str) {
        self.events.push(format!("warning: {}", message));
    }

    fn show_prediction(&mut self, prediction: &Prediction) {
        self.events.push(format!("prediction: {}", prediction_line(prediction)));
    }

    fn retrieving(&mut self) {
        self.events.push("retrieving".to_string());
    }

    fn show_evidence(&mut self, evidence: &EvidenceOutcome) {
        self.events
            .push(format!("evidence: {} entries", evidence.entries().len()));
    }

    fn state_changed(&mut self, state: SessionState) {
        self.states.push(state);
    }
}

fn session(retriever: Arc<MockRetriever>) -> Session {
    let pipeline = ClaimPipeline::new(
        Arc::new(constant_artifacts(0.87)),
        retriever,
        Arc::new(MockSummarizer::new()),
    );
    Session::new(Arc::new(pipeline))
}

#[test]
fn start_moves_to_awaiting_input() {
    let mut session = session(Arc::new(MockRetriever::new()));
    let mut presenter = RecordingPresenter::default();

    assert_eq!(session.state(), SessionState::Idle);
    session.start(&mut presenter);
    assert_eq!(session.state(), SessionState::AwaitingInput);

    // Starting twice is a no-op
    session.start(&mut presenter);
    assert_eq!(presenter.states, vec![SessionState::AwaitingInput]);
}

#[tokio::test]
async fn submission_walks_every_state_in_order() {
    let mut session = session(Arc::new(MockRetriever::new().with_hits(sample_hits(5))));
    let mut presenter = RecordingPresenter::default();
    session.start(&mut presenter);

    let report = session
        .submit("The moon is made of cheese", &mut presenter)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.evidence.entries().len(), 3);
    assert_eq!(
        presenter.states,
        vec![
            SessionState::AwaitingInput,
            SessionState::Classifying,
            SessionState::Retrieving,
            SessionState::Done,
            SessionState::AwaitingInput,
        ]
    );
    // Prediction is shown before retrieval starts
    assert_eq!(
        presenter.events,
        vec![
            "prediction: 🟥 Fake (Fake Probability: 87.00%)".to_string(),
            "retrieving".to_string(),
            "evidence: 3 entries".to_string(),
        ]
    );
    assert_eq!(session.state(), SessionState::AwaitingInput);
}

#[tokio::test]
async fn blank_submission_only_warns() {
    let retriever = Arc::new(MockRetriever::new().with_hits(sample_hits(5)));
    let mut session = session(retriever.clone());
    let mut presenter = RecordingPresenter::default();
    session.start(&mut presenter);

    let result = session.submit("   \n", &mut presenter).await.unwrap();

    assert!(result.is_none());
    assert_eq!(presenter.events, vec!["warning: Please enter something.".to_string()]);
    assert_eq!(presenter.states, vec![SessionState::AwaitingInput]);
    assert_eq!(session.state(), SessionState::AwaitingInput);
    assert!(retriever.calls().is_empty());
}

#[test]
fn session_accepts_repeated_submissions() {
    let retriever = Arc::new(MockRetriever::new().with_hits(sample_hits(1)));
    let mut session = session(retriever.clone());
    let mut presenter = RecordingPresenter::default();

    let first = tokio_test::block_on(session.submit("claim", &mut presenter))
        .unwrap()
        .unwrap();
    let second = tokio_test::block_on(session.submit("claim", &mut presenter))
        .unwrap()
        .unwrap();

    assert_eq!(first.prediction, second.prediction);
    assert_ne!(first.id, second.id);
    assert_eq!(retriever.calls().len(), 2);
    assert_eq!(session.state(), SessionState::AwaitingInput);
}
