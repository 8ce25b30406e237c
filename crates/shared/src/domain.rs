use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub usize);
    };
}

index_newtype!(LineIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Empty,
    Error,
    Result,
    Host,
}

/// One output line of the transcript: a backend reply or a host banner.
///
/// `Empty` outcomes never carry text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    kind: OutcomeKind,
    text: String,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, text: impl Into<String>) -> Self {
        let text = match kind {
            OutcomeKind::Empty => String::new(),
            OutcomeKind::Error | OutcomeKind::Result | OutcomeKind::Host => text.into(),
        };
        Self { kind, text }
    }

    pub fn empty() -> Self {
        Self::new(OutcomeKind::Empty, "")
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Error, text)
    }

    pub fn result(text: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Result, text)
    }

    pub fn host(text: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Host, text)
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An immutable transcript line, identified by its position in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireLine", from = "WireLine")]
pub enum TranscriptEntry {
    PastInput { value: String },
    Outcome(Outcome),
}

impl TranscriptEntry {
    pub fn past_input(value: impl Into<String>) -> Self {
        Self::PastInput {
            value: value.into(),
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::PastInput { .. })
    }
}

impl From<Outcome> for TranscriptEntry {
    fn from(value: Outcome) -> Self {
        Self::Outcome(value)
    }
}

// Flat `type`-tagged shape used on the wire: `{"type":"input","value":..}` or
// `{"type":"<kind>","print":..}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireLine {
    Input {
        value: String,
    },
    Empty {
        #[serde(default)]
        print: String,
    },
    Error {
        print: String,
    },
    Result {
        print: String,
    },
    Host {
        print: String,
    },
}

impl From<TranscriptEntry> for WireLine {
    fn from(value: TranscriptEntry) -> Self {
        match value {
            TranscriptEntry::PastInput { value } => Self::Input { value },
            TranscriptEntry::Outcome(Outcome { kind, text }) => match kind {
                OutcomeKind::Empty => Self::Empty { print: text },
                OutcomeKind::Error => Self::Error { print: text },
                OutcomeKind::Result => Self::Result { print: text },
                OutcomeKind::Host => Self::Host { print: text },
            },
        }
    }
}

impl From<WireLine> for TranscriptEntry {
    fn from(value: WireLine) -> Self {
        match value {
            WireLine::Input { value } => Self::PastInput { value },
            WireLine::Empty { .. } => Self::Outcome(Outcome::empty()),
            WireLine::Error { print } => Self::Outcome(Outcome::error(print)),
            WireLine::Result { print } => Self::Outcome(Outcome::result(print)),
            WireLine::Host { print } => Self::Outcome(Outcome::host(print)),
        }
    }
}
