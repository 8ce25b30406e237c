//! Console core: the evaluation backend seam, the pure console reducer, the
//! orchestration layer that performs backend calls, and the line renderer.

pub mod backend;
pub mod reducer;
pub mod render;
pub mod session;

pub use backend::{compose_banners, EvalBackend};
pub use reducer::{apply, BackendStatus, ConsoleAction, ConsoleState};
pub use render::{render_entry, FocusChange, LineView, LiveInput, Tone};
pub use session::{ConsoleSession, PendingEvaluation};
pub use shared::{
    domain::{LineIndex, Outcome, OutcomeKind, TranscriptEntry},
    error::ConsoleError,
    protocol::EvalOutcome,
};
