use super::*;
use anyhow::anyhow;
use async_trait::async_trait;
use shared::{domain::TranscriptEntry, protocol::EvalOutcome};
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::sync::{Mutex, Notify};

struct ScriptedBackend {
    replies: Mutex<VecDeque<EvalOutcome>>,
    seen_inputs: Mutex<Vec<String>>,
    calls: AtomicUsize,
    resets: AtomicUsize,
    fail_with: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    fn replying(replies: impl IntoIterator<Item = EvalOutcome>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen_inputs: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            resets: AtomicUsize::new(0),
            fail_with: None,
            gate: None,
        }
    }

    fn failing(err: impl Into<String>) -> Self {
        let mut backend = Self::replying([]);
        backend.fail_with = Some(err.into());
        backend
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvalBackend for ScriptedBackend {
    fn identify(&self) -> String {
        "scripted 1.0".into()
    }

    async fn evaluate(&self, input: &str) -> anyhow::Result<EvalOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_inputs.lock().await.push(input.to_owned());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        Ok(self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(EvalOutcome::Empty))
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

fn last_two(session: &ConsoleSession) -> &[TranscriptEntry] {
    let transcript = session.state().transcript();
    &transcript[transcript.len() - 2..]
}

#[test]
fn new_session_has_banners_and_is_not_ready() {
    let session = ConsoleSession::new(["v1.0", "ready"]);
    assert_eq!(session.state().transcript().len(), 2);
    assert!(!session.state().backend().ready);
    assert!(!session.is_busy());
}

#[test]
fn attaching_backend_marks_ready() {
    let backend = Arc::new(ScriptedBackend::replying([]));
    let session = ConsoleSession::with_backend(["v1.0"], backend);
    assert!(session.state().backend().ready);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn submit_records_input_and_result() {
    let backend = Arc::new(ScriptedBackend::replying([EvalOutcome::result("3")]));
    let mut session = ConsoleSession::with_backend(Vec::<String>::new(), backend.clone());

    session.input_changed("(+ 1 2)");
    session.submit().await.expect("submit");

    assert_eq!(
        last_two(&session),
        &[
            TranscriptEntry::past_input("(+ 1 2)"),
            TranscriptEntry::Outcome(Outcome::result("3")),
        ]
    );
    assert_eq!(session.state().current_input(), "");
    assert!(!session.is_busy());
    assert_eq!(*backend.seen_inputs.lock().await, vec!["(+ 1 2)".to_string()]);
}

#[tokio::test]
async fn empty_submission_yields_blank_outcome() {
    let backend = Arc::new(ScriptedBackend::replying([EvalOutcome::Empty]));
    let mut session = ConsoleSession::with_backend(Vec::<String>::new(), backend);

    session.submit().await.expect("submit");

    assert_eq!(
        last_two(&session),
        &[
            TranscriptEntry::past_input(""),
            TranscriptEntry::Outcome(Outcome::empty()),
        ]
    );
}

#[tokio::test]
async fn second_submission_while_busy_is_refused() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(
        ScriptedBackend::replying([EvalOutcome::result("1")]).gated(gate.clone()),
    );
    let mut session = ConsoleSession::with_backend(["hello"], backend.clone());

    session.input_changed("1");
    let pending = session.begin_submit().expect("first submission");
    assert!(session.is_busy());
    assert_eq!(session.state().current_input(), "");

    let task = tokio::spawn(pending.run());

    session.input_changed("2");
    let before = session.state().transcript().len();
    assert_eq!(
        session.begin_submit().err(),
        Some(ConsoleError::SubmissionInFlight)
    );
    assert_eq!(session.state().transcript().len(), before);

    gate.notify_one();
    let outcome = task.await.expect("join");
    session.complete(outcome).expect("complete");

    assert_eq!(backend.calls(), 1);
    assert_eq!(
        last_two(&session),
        &[
            TranscriptEntry::past_input("1"),
            TranscriptEntry::Outcome(Outcome::result("1")),
        ]
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn error_outcome_is_recorded_and_input_reenabled() {
    let backend = Arc::new(ScriptedBackend::replying([EvalOutcome::error(
        "unexpected EOF",
    )]));
    let mut session = ConsoleSession::with_backend(Vec::<String>::new(), backend);

    session.input_changed("(+ 1");
    session.submit().await.expect("submit");

    assert_eq!(
        session.state().transcript().last(),
        Some(&TranscriptEntry::Outcome(Outcome::error("unexpected EOF")))
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn backend_failure_is_reported_once_as_error_line() {
    let backend = Arc::new(ScriptedBackend::failing("worker crashed"));
    let mut session = ConsoleSession::with_backend(Vec::<String>::new(), backend.clone());

    session.input_changed("(boom)");
    session.submit().await.expect("submit");

    assert_eq!(backend.calls(), 1);
    match session.state().transcript().last() {
        Some(TranscriptEntry::Outcome(outcome)) => {
            assert_eq!(outcome.kind(), shared::domain::OutcomeKind::Error);
            assert!(outcome.text().contains("worker crashed"));
        }
        other => panic!("expected error line, got {other:?}"),
    }
    assert!(!session.is_busy());
}

#[tokio::test]
async fn submit_without_backend_fails_fast() {
    let mut session = ConsoleSession::new(["banner"]);
    session.input_changed("(+ 1 2)");

    let err = session.submit().await.expect_err("no backend");

    assert_eq!(err, ConsoleError::BackendMissing);
    assert!(err.is_wiring_defect());
    assert_eq!(session.state().transcript().len(), 1);
    assert_eq!(session.state().current_input(), "(+ 1 2)");
    assert!(!session.is_busy());
}

#[test]
fn complete_without_submission_is_rejected() {
    let mut session = ConsoleSession::new(["banner"]);
    assert_eq!(
        session.complete(Outcome::result("3")),
        Err(ConsoleError::NothingInFlight)
    );
    assert_eq!(session.state().transcript().len(), 1);
}

#[tokio::test]
async fn reset_reseeds_banners_and_keeps_backend_ready() {
    let backend = Arc::new(ScriptedBackend::replying([EvalOutcome::result("1")]));
    let mut session = ConsoleSession::with_backend(["old"], backend.clone());
    session.input_changed("1");
    session.submit().await.expect("submit");

    session.reset(["new", "banner"]).expect("reset");

    assert_eq!(
        session.state().transcript(),
        &[
            TranscriptEntry::Outcome(Outcome::host("new")),
            TranscriptEntry::Outcome(Outcome::host("banner")),
        ]
    );
    assert!(session.state().backend().ready);
    assert_eq!(backend.resets(), 1);
}

#[tokio::test]
async fn reset_is_refused_while_busy() {
    let backend = Arc::new(ScriptedBackend::replying([]));
    let mut session = ConsoleSession::with_backend(["old"], backend.clone());
    let _pending = session.begin_submit().expect("submit");

    assert_eq!(
        session.reset(["new"]),
        Err(ConsoleError::SubmissionInFlight)
    );
    assert!(session.is_busy());
    assert_eq!(backend.resets(), 0);
}

#[tokio::test]
async fn cleared_input_submits_an_empty_line() {
    let backend = Arc::new(ScriptedBackend::replying([EvalOutcome::Empty]));
    let mut session = ConsoleSession::with_backend(Vec::<String>::new(), backend.clone());

    session.input_changed("(def! half-typed");
    session.clear_input();
    assert_eq!(session.state().current_input(), "");

    session.submit().await.expect("submit");

    assert_eq!(*backend.seen_inputs.lock().await, vec![String::new()]);
    assert_eq!(last_two(&session)[0], TranscriptEntry::past_input(""));
}
