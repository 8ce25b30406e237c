//! Orchestration around the pure reducer: owns the injected backend and
//! performs the one suspension point of the console, the `evaluate` call.

use std::sync::Arc;

use shared::{domain::Outcome, error::ConsoleError};
use tracing::{debug, error, info, warn};

use crate::{
    backend::EvalBackend,
    reducer::{apply, ConsoleAction, ConsoleState},
};

pub struct ConsoleSession {
    state: ConsoleState,
    backend: Option<Arc<dyn EvalBackend>>,
}

/// A submission accepted by [`ConsoleSession::begin_submit`], not yet evaluated.
///
/// Owns everything the backend call needs, so it can be awaited (or spawned)
/// while the session stays available to the front-end.
pub struct PendingEvaluation {
    input: String,
    backend: Arc<dyn EvalBackend>,
}

impl PendingEvaluation {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub async fn run(self) -> Outcome {
        match self.backend.evaluate(&self.input).await {
            Ok(reply) => Outcome::from(reply),
            Err(err) => {
                warn!(error = %err, input = %self.input, "evaluation backend failed");
                Outcome::error(format!("backend failure: {err:#}"))
            }
        }
    }
}

impl ConsoleSession {
    pub fn new<I, S>(banners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: ConsoleState::new(banners),
            backend: None,
        }
    }

    pub fn with_backend<I, S>(banners: I, backend: Arc<dyn EvalBackend>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut session = Self::new(banners);
        session.attach_backend(backend);
        session
    }

    pub fn attach_backend(&mut self, backend: Arc<dyn EvalBackend>) {
        info!(backend = %backend.identify(), "evaluation backend attached");
        self.backend = Some(backend);
        self.dispatch(ConsoleAction::BackendReady);
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.backend().busy
    }

    pub fn dispatch(&mut self, action: ConsoleAction) {
        debug!(action = action.name(), "console action");
        let state = std::mem::take(&mut self.state);
        self.state = apply(state, action);
    }

    pub fn input_changed(&mut self, input: impl Into<String>) {
        self.dispatch(ConsoleAction::InputChanged(input.into()));
    }

    pub fn clear_input(&mut self) {
        self.dispatch(ConsoleAction::InputCleared);
    }

    pub fn reset<I, S>(&mut self, banners: I) -> Result<(), ConsoleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.is_busy() {
            warn!("reset rejected while an evaluation is in flight");
            return Err(ConsoleError::SubmissionInFlight);
        }
        let banners = banners.into_iter().map(Into::into).collect();
        self.dispatch(ConsoleAction::Reset(banners));
        if let Some(backend) = &self.backend {
            backend.reset();
            self.dispatch(ConsoleAction::BackendReady);
        }
        Ok(())
    }

    /// Accept the live input for evaluation.
    ///
    /// This is the authoritative at-most-one-in-flight gate: while busy the
    /// submission is refused and nothing is dispatched.
    pub fn begin_submit(&mut self) -> Result<PendingEvaluation, ConsoleError> {
        if self.is_busy() {
            warn!("submission rejected: evaluation already in flight");
            return Err(ConsoleError::SubmissionInFlight);
        }
        let Some(backend) = self.backend.clone() else {
            error!("submission attempted without an evaluation backend");
            return Err(ConsoleError::BackendMissing);
        };

        let input = self.state.current_input().to_owned();
        self.dispatch(ConsoleAction::BackendBusy(true));
        self.dispatch(ConsoleAction::InputSubmitted);
        debug!(input = %input, "submission accepted");
        Ok(PendingEvaluation { input, backend })
    }

    pub fn complete(&mut self, outcome: Outcome) -> Result<(), ConsoleError> {
        if !self.is_busy() {
            error!("outcome delivered with no evaluation in flight");
            return Err(ConsoleError::NothingInFlight);
        }
        self.dispatch(ConsoleAction::CommitOutcome(outcome));
        self.dispatch(ConsoleAction::BackendBusy(false));
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<(), ConsoleError> {
        let pending = self.begin_submit()?;
        let outcome = pending.run().await;
        self.complete(outcome)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
