use std::sync::Arc;

use console_core::{compose_banners, ConsoleSession, EvalBackend, Outcome, TranscriptEntry};
use mal_vm::MalVm;
use shared::protocol::EvalOutcome;

#[tokio::test]
async fn evaluate_maps_reader_results_to_outcomes() {
    let vm = MalVm::new();

    assert_eq!(vm.evaluate("(+ 1 2)").await.expect("eval"), EvalOutcome::result("3"));
    assert_eq!(vm.evaluate("   ").await.expect("eval"), EvalOutcome::Empty);
    assert_eq!(
        vm.evaluate("(+ 1 2").await.expect("eval"),
        EvalOutcome::error("expected ')', got EOF")
    );
    assert_eq!(
        vm.evaluate("(/ 1 0)").await.expect("eval"),
        EvalOutcome::error("cannot divide by 0")
    );
}

#[tokio::test]
async fn definitions_survive_between_calls() {
    let vm = MalVm::new();
    vm.evaluate("(def! n 21)").await.expect("eval");
    assert_eq!(vm.evaluate("(* n 2)").await.expect("eval"), EvalOutcome::result("42"));
}

#[tokio::test]
async fn deeply_nested_line_is_an_error_not_a_crash() {
    let vm = Arc::new(MalVm::new());
    let line = format!("{}1{}", "(+ 1 ".repeat(5000), ")".repeat(5000));

    let worker = Arc::clone(&vm);
    let outcome = tokio::spawn(async move { worker.evaluate(&line).await })
        .await
        .expect("evaluation task")
        .expect("eval");

    assert_eq!(outcome, EvalOutcome::error("nesting too deep"));
    assert_eq!(vm.evaluate("(+ 1 1)").await.expect("eval"), EvalOutcome::result("2"));
}

#[tokio::test]
async fn runaway_recursion_is_reported() {
    let vm = MalVm::new();
    vm.evaluate("(def! loop (fn* (n) (+ 1 (loop n))))").await.expect("eval");
    assert_eq!(
        vm.evaluate("(loop 0)").await.expect("eval"),
        EvalOutcome::error("nesting too deep")
    );
}

#[tokio::test]
async fn reset_forgets_definitions_but_keeps_prelude() {
    let vm = MalVm::new();
    vm.evaluate("(def! n 21)").await.expect("eval");

    vm.reset();

    assert_eq!(
        vm.evaluate("n").await.expect("eval"),
        EvalOutcome::error("'n' not found")
    );
    assert_eq!(vm.evaluate("(not nil)").await.expect("eval"), EvalOutcome::result("true"));
}

#[tokio::test]
async fn functions_and_conditionals() {
    let vm = MalVm::new();
    vm.evaluate("(def! abs (fn* (x) (if (< x 0) (- 0 x) x)))").await.expect("eval");
    assert_eq!(vm.evaluate("(abs -7)").await.expect("eval"), EvalOutcome::result("7"));
    assert_eq!(
        vm.evaluate("(if 1 2 3 4)").await.expect("eval"),
        EvalOutcome::error("wrong arity for if, should be 3 or 4")
    );
}

#[test]
fn identify_names_crate_and_version() {
    let identity = MalVm::new().identify();
    assert!(identity.starts_with("mal_vm "));
}

#[tokio::test]
async fn console_session_over_mal_vm() {
    let vm: Arc<dyn EvalBackend> = Arc::new(MalVm::new());
    let banners = compose_banners(vm.as_ref(), ["Make-A-Lisp console"]);
    let mut session = ConsoleSession::with_backend(banners, vm);

    for line in ["(+ 1 2)", "", "(+ 1"] {
        session.input_changed(line);
        session.submit().await.expect("submit");
    }

    let transcript = session.state().transcript();
    assert_eq!(transcript.len(), 2 + 6);
    assert_eq!(&transcript[0], &TranscriptEntry::Outcome(Outcome::host("Make-A-Lisp console")));
    assert_eq!(
        &transcript[2..],
        &[
            TranscriptEntry::past_input("(+ 1 2)"),
            TranscriptEntry::Outcome(Outcome::result("3")),
            TranscriptEntry::past_input(""),
            TranscriptEntry::Outcome(Outcome::empty()),
            TranscriptEntry::past_input("(+ 1"),
            TranscriptEntry::Outcome(Outcome::error("expected ')', got EOF")),
        ]
    );
    assert!(!session.is_busy());
}
