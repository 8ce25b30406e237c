use serde::{Deserialize, Serialize};

use crate::domain::Outcome;

/// Reply of an evaluation backend for one line of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvalOutcome {
    /// Nothing to show, e.g. a blank or comment-only line.
    Empty,
    Error { text: String },
    Result { text: String },
}

impl EvalOutcome {
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    pub fn result(text: impl Into<String>) -> Self {
        Self::Result { text: text.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<EvalOutcome> for Outcome {
    fn from(value: EvalOutcome) -> Self {
        match value {
            EvalOutcome::Empty => Outcome::empty(),
            EvalOutcome::Error { text } => Outcome::error(text),
            EvalOutcome::Result { text } => Outcome::result(text),
        }
    }
}
