//! A Make-A-Lisp read/eval/print VM usable as a console evaluation backend.

use async_trait::async_trait;
use console_core::EvalBackend;
use shared::protocol::EvalOutcome;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod printer;
pub mod reader;
pub mod types;

pub use env::Env;
pub use error::MalError;
pub use eval::rep;
pub use types::{Closure, MalValue};

/// Console backend over a persistent root environment.
///
/// Definitions made with `def!` stay visible to later lines until
/// [`EvalBackend::reset`].
pub struct MalVm {
    env: Mutex<Env>,
}

impl Default for MalVm {
    fn default() -> Self {
        Self::new()
    }
}

impl MalVm {
    pub fn new() -> Self {
        Self {
            env: Mutex::new(console_env()),
        }
    }
}

fn console_env() -> Env {
    let env = Env::root();
    if let Err(err) = eval::load_prelude(&env) {
        warn!(error = %err, "mal prelude failed to load");
    }
    env
}

#[async_trait]
impl EvalBackend for MalVm {
    fn identify(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    async fn evaluate(&self, input: &str) -> anyhow::Result<EvalOutcome> {
        let env = self.env.lock().await;
        let outcome = match rep(input, &env) {
            Ok(printed) => EvalOutcome::result(printed),
            Err(MalError::EmptyLine) => EvalOutcome::Empty,
            Err(err) => EvalOutcome::error(err.to_string()),
        };
        debug!(input = %input, is_error = outcome.is_error(), "mal line evaluated");
        Ok(outcome)
    }

    fn reset(&self) {
        match self.env.try_lock() {
            Ok(mut env) => {
                env.clear();
                *env = console_env();
                debug!("mal environment reset");
            }
            Err(_) => warn!("mal environment in use; reset skipped"),
        }
    }
}
