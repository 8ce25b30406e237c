use thiserror::Error;

/// Wiring and precondition failures of the console orchestration layer.
///
/// These signal a defect in how the console is composed, not a failed
/// evaluation; evaluation failures travel as `Outcome`s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("no evaluation backend attached to the console session")]
    BackendMissing,
    #[error("an evaluation is already in flight")]
    SubmissionInFlight,
    #[error("no evaluation is in flight")]
    NothingInFlight,
}

impl ConsoleError {
    pub fn is_wiring_defect(&self) -> bool {
        matches!(self, Self::BackendMissing | Self::NothingInFlight)
    }
}
