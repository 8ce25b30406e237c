//! Pure console state machine: `apply(state, action) -> state`.
//!
//! The reducer never talks to the backend. Busy tracking and outcomes are
//! recorded here; the backend call itself lives in `session`.

use shared::domain::{LineIndex, Outcome, TranscriptEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStatus {
    pub ready: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleState {
    backend: BackendStatus,
    transcript: Vec<TranscriptEntry>,
    current_input: String,
    submitted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    BackendReady,
    BackendBusy(bool),
    Reset(Vec<String>),
    InputChanged(String),
    InputCleared,
    /// Freeze the live buffer as the text under evaluation and clear it.
    InputSubmitted,
    CommitOutcome(Outcome),
}

impl ConsoleAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackendReady => "backend_ready",
            Self::BackendBusy(_) => "backend_busy",
            Self::Reset(_) => "reset",
            Self::InputChanged(_) => "input_changed",
            Self::InputCleared => "input_cleared",
            Self::InputSubmitted => "input_submitted",
            Self::CommitOutcome(_) => "commit_outcome",
        }
    }
}

impl ConsoleState {
    pub fn new<I, S>(banners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backend: BackendStatus::default(),
            transcript: banners
                .into_iter()
                .map(|banner| TranscriptEntry::Outcome(Outcome::host(banner)))
                .collect(),
            current_input: String::new(),
            submitted: None,
        }
    }

    pub fn backend(&self) -> BackendStatus {
        self.backend
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn entries(&self) -> impl Iterator<Item = (LineIndex, &TranscriptEntry)> {
        self.transcript
            .iter()
            .enumerate()
            .map(|(index, entry)| (LineIndex(index), entry))
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    /// Text frozen by the last `InputSubmitted`, until its outcome is committed.
    pub fn submitted_input(&self) -> Option<&str> {
        self.submitted.as_deref()
    }
}

pub fn apply(state: ConsoleState, action: ConsoleAction) -> ConsoleState {
    match action {
        ConsoleAction::Reset(banners) => ConsoleState::new(banners),
        ConsoleAction::BackendReady => ConsoleState {
            backend: BackendStatus {
                ready: true,
                busy: false,
            },
            ..state
        },
        ConsoleAction::BackendBusy(busy) => ConsoleState {
            backend: BackendStatus {
                busy,
                ..state.backend
            },
            ..state
        },
        ConsoleAction::InputChanged(input) => ConsoleState {
            current_input: input,
            ..state
        },
        ConsoleAction::InputCleared => ConsoleState {
            current_input: String::new(),
            ..state
        },
        ConsoleAction::InputSubmitted => {
            let ConsoleState {
                backend,
                transcript,
                current_input,
                ..
            } = state;
            ConsoleState {
                backend,
                transcript,
                current_input: String::new(),
                submitted: Some(current_input),
            }
        }
        ConsoleAction::CommitOutcome(outcome) => {
            let ConsoleState {
                backend,
                mut transcript,
                current_input,
                submitted,
            } = state;
            let value = submitted.unwrap_or(current_input);
            transcript.push(TranscriptEntry::PastInput { value });
            transcript.push(TranscriptEntry::Outcome(outcome));
            ConsoleState {
                backend,
                transcript,
                current_input: String::new(),
                submitted: None,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
