use async_trait::async_trait;
use shared::protocol::EvalOutcome;

/// Black-box evaluator behind the console.
///
/// Implementations must resolve every `evaluate` call; the console never
/// times out or cancels an issued call, and issues at most one at a time.
#[async_trait]
pub trait EvalBackend: Send + Sync {
    /// Human-readable identity, used for the session banner only.
    fn identify(&self) -> String;

    /// Read, evaluate and print one line of input.
    ///
    /// `Err` means the backend itself failed (not the user's expression); the
    /// console reports it once as an error line.
    async fn evaluate(&self, input: &str) -> anyhow::Result<EvalOutcome>;

    /// Forget state accumulated by earlier evaluations, such as definitions.
    /// Called when the console is reset; never while an evaluation is pending.
    fn reset(&self) {}
}

/// Banner lines for a new session: the caller's greeting followed by the
/// backend identity.
pub fn compose_banners<I, S>(backend: &dyn EvalBackend, greeting: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut banners: Vec<String> = greeting.into_iter().map(Into::into).collect();
    banners.push(backend.identify());
    banners
}
