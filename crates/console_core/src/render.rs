//! Line renderer: maps transcript entries and the live input to views.

use shared::domain::{OutcomeKind, TranscriptEntry};
use tracing::debug;

pub const DEFAULT_PROMPT: &str = "user> ";

/// Visual classification of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Result,
    Neutral,
}

impl From<OutcomeKind> for Tone {
    fn from(value: OutcomeKind) -> Self {
        match value {
            OutcomeKind::Error => Self::Error,
            OutcomeKind::Result => Self::Result,
            OutcomeKind::Host | OutcomeKind::Empty => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineView<'a> {
    PastInput {
        text: &'a str,
    },
    Output {
        tone: Tone,
        text: &'a str,
    },
    LiveInput {
        prompt: &'a str,
        value: &'a str,
        enabled: bool,
    },
}

pub fn render_entry(entry: &TranscriptEntry) -> LineView<'_> {
    match entry {
        TranscriptEntry::PastInput { value } => LineView::PastInput { text: value },
        TranscriptEntry::Outcome(outcome) => LineView::Output {
            tone: outcome.kind().into(),
            text: outcome.text(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Focus,
    Blur,
}

/// The editable input line.
///
/// Disabled while an evaluation is pending, focused again when it resolves.
/// Its submit gate mirrors the session's own in-flight check so a submit
/// gesture delivered before the busy state is observed is dropped here.
#[derive(Debug, Clone)]
pub struct LiveInput {
    prompt: String,
    pending: bool,
}

impl Default for LiveInput {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl LiveInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Follow the backend busy flag, reporting focus transitions.
    pub fn sync(&mut self, busy: bool) -> Option<FocusChange> {
        if busy == self.pending {
            return None;
        }
        self.pending = busy;
        Some(if busy {
            FocusChange::Blur
        } else {
            FocusChange::Focus
        })
    }

    pub fn view<'a>(&'a self, value: &'a str) -> LineView<'a> {
        LineView::LiveInput {
            prompt: &self.prompt,
            value,
            enabled: !self.pending,
        }
    }

    /// Forward a submit gesture, or swallow it while pending.
    pub fn submit<'a>(&self, value: &'a str) -> Option<&'a str> {
        if self.pending {
            debug!(input = %value, "submit swallowed while evaluation is pending");
            return None;
        }
        Some(value)
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
