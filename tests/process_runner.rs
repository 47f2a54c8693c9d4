// tests/process_runner.rs

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use edi::errors::SpawnError;
use edi::exec::ProcessRunner;

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[tokio::test]
async fn empty_argv_is_a_spawn_error() {
    init_tracing();
    let err = ProcessRunner::new().spawn(&[]).unwrap_err();
    assert!(matches!(err, SpawnError::EmptyArgv));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    init_tracing();
    let err = ProcessRunner::new()
        .spawn(&argv(&["edi-no-such-program-xyz"]))
        .unwrap_err();
    match err {
        SpawnError::Start { program, .. } => assert_eq!(program, "edi-no-such-program-xyz"),
        other => panic!("expected SpawnError::Start, got {other:?}"),
    }
}

#[tokio::test]
async fn exit_code_is_available_after_wait() -> TestResult {
    init_tracing();
    let mut process = ProcessRunner::new().spawn(&argv(&["sh", "-c", "exit 3"]))?;
    assert_eq!(process.program(), "sh");
    assert!(process.take_stdout().is_some());
    assert!(process.take_stderr().is_some());
    // Already taken.
    assert!(process.take_stdout().is_none());

    let outcome = with_timeout(process.wait()).await?;
    assert_eq!(outcome.code, Some(3));
    assert!(!outcome.success);
    Ok(())
}

#[tokio::test]
async fn successful_process_reports_success() -> TestResult {
    init_tracing();
    let mut process = ProcessRunner::new().spawn(&argv(&["true"]))?;
    let outcome = with_timeout(process.wait()).await?;
    assert_eq!(outcome.code, Some(0));
    assert!(outcome.success);
    Ok(())
}
