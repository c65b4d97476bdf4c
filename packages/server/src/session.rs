//! Interactive session state machine.
//!
//! ```text
//! Idle --start--> AwaitingInput --submit(text)--> Classifying --> Retrieving --> Done --> AwaitingInput
//!                      ^    |
//!                      +----+ submit(blank): warning, no pipeline call
//! ```
//!
//! Front ends implement [`Presenter`] to show each step as it happens.

use std::fmt;
use std::sync::Arc;

use fake_news_model::Prediction;
use serde::Serialize;

use crate::pipeline::{
    is_blank, AnalysisReport, ClaimPipeline, EvidenceOutcome, PipelineError, EMPTY_INPUT_WARNING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingInput,
    Classifying,
    Retrieving,
    Done,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingInput => "awaiting input",
            SessionState::Classifying => "classifying",
            SessionState::Retrieving => "retrieving",
            SessionState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Receives the visible effects of a submission.
pub trait Presenter {
    fn show_warning(&mut self, message: &str);

    fn show_prediction(&mut self, prediction: &Prediction);

    /// Called before evidence retrieval starts (spinners go here).
    fn retrieving(&mut self) {}

    fn show_evidence(&mut self, evidence: &EvidenceOutcome);

    fn state_changed(&mut self, _state: SessionState) {}
}

/// Drives one user's submissions through the pipeline.
pub struct Session {
    pipeline: Arc<ClaimPipeline>,
    state: SessionState,
}

impl Session {
    pub fn new(pipeline: Arc<ClaimPipeline>) -> Self {
        Self {
            pipeline,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Idle -> AwaitingInput. The pipeline's artifacts are already loaded.
    pub fn start(&mut self, presenter: &mut dyn Presenter) {
        if self.state == SessionState::Idle {
            self.transition(SessionState::AwaitingInput, presenter);
        }
    }

    /// Handle one press of "Analyze".
    ///
    /// Blank input leaves the session in `AwaitingInput` and only shows the
    /// warning. Otherwise the prediction is shown before evidence is
    /// retrieved, and the session returns to `AwaitingInput` when done.
    /// Returns `None` for blank input.
    pub async fn submit(
        &mut self,
        text: &str,
        presenter: &mut dyn Presenter,
    ) -> Result<Option<AnalysisReport>, PipelineError> {
        self.start(presenter);

        if is_blank(text) {
            presenter.show_warning(EMPTY_INPUT_WARNING);
            return Ok(None);
        }

        self.transition(SessionState::Classifying, presenter);
        let prediction = match self.pipeline.classify(text) {
            Ok(prediction) => prediction,
            Err(e) => {
                self.transition(SessionState::AwaitingInput, presenter);
                return Err(e);
            }
        };
        presenter.show_prediction(&prediction);

        self.transition(SessionState::Retrieving, presenter);
        presenter.retrieving();
        let evidence = self.pipeline.gather_evidence(text).await;
        presenter.show_evidence(&evidence);

        self.transition(SessionState::Done, presenter);
        let report = AnalysisReport::new(text, prediction, evidence);
        self.transition(SessionState::AwaitingInput, presenter);

        Ok(Some(report))
    }

    fn transition(&mut self, next: SessionState, presenter: &mut dyn Presenter) {
        tracing::debug!(from = %self.state, to = %next, "Session state change");
        self.state = next;
        presenter.state_changed(next);
    }
}
