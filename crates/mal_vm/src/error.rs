use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalError {
    /// Blank or comment-only input; not an error for the user.
    #[error("empty line")]
    EmptyLine,
    #[error("expected '{0}', got EOF")]
    UnexpectedEof(char),
    #[error("unexpected '{0}'")]
    UnexpectedDelimiter(char),
    #[error("'{0}' not found")]
    SymbolNotFound(String),
    #[error("{0}")]
    Message(String),
}

impl MalError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

pub type MalResult = Result<crate::types::MalValue, MalError>;
