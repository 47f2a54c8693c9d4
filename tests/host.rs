// tests/host.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{init_tracing, with_timeout, TestResult};

use tokio::sync::{mpsc, oneshot};

use edi::host::{Host, HostInput};
use edi::types::{CommandId, CommandState, ShellId};

#[test]
fn directives_are_parsed() {
    assert_eq!(HostInput::parse(":toggle 3"), HostInput::Toggle(CommandId::new(3)));
    assert_eq!(HostInput::parse(" :switch 2 "), HostInput::Switch(ShellId::new(2)));
    assert_eq!(HostInput::parse(":show"), HostInput::Show);
    assert_eq!(HostInput::parse(":new"), HostInput::NewShell);
    assert_eq!(HostInput::parse(":wait"), HostInput::Wait);
    assert_eq!(HostInput::parse(":quit"), HostInput::Quit);
    assert_eq!(HostInput::parse(":q"), HostInput::Quit);
}

#[test]
fn anything_else_is_submitted_verbatim() {
    assert_eq!(
        HostInput::parse("ls -la 'my dir'"),
        HostInput::Submit("ls -la 'my dir'".to_string())
    );
    assert_eq!(HostInput::parse(""), HostInput::Submit(String::new()));
}

#[test]
fn malformed_directives_are_invalid() {
    assert!(matches!(HostInput::parse(":toggle"), HostInput::Invalid(_)));
    assert!(matches!(HostInput::parse(":toggle x"), HostInput::Invalid(_)));
    assert!(matches!(HostInput::parse(":bogus"), HostInput::Invalid(_)));
}

#[tokio::test]
async fn submit_wait_and_toggle_through_the_host() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().prompt("$ ").build()).await?;

    let step = host.handle(HostInput::parse("echo hi")).await;
    assert!(step.keep_running);
    assert_eq!(step.output, None);

    with_timeout(host.handle(HostInput::Wait)).await;
    assert_eq!(
        host.registry().state(CommandId::new(1)),
        Some(CommandState::Completed)
    );
    assert_eq!(host.render_all().await?, "$ echo hi\nhi\n\n");

    let step = host.handle(HostInput::parse(":toggle 1")).await;
    assert_eq!(step.output.as_deref(), Some("command 1: Hidden\n"));
    assert_eq!(host.render_all().await?, "$ echo hi\n");

    let step = host.handle(HostInput::parse(":toggle 5")).await;
    assert_eq!(step.output.as_deref(), Some("no command 5 in shell 1\n"));
    Ok(())
}

#[tokio::test]
async fn shells_can_be_opened_and_switched() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().build()).await?;

    let step = host.handle(HostInput::NewShell).await;
    assert_eq!(step.output.as_deref(), Some("shell 2\n"));
    assert_eq!(host.active_shell().id(), ShellId::new(2));

    let step = host.handle(HostInput::Switch(ShellId::new(1))).await;
    assert_eq!(step.output.as_deref(), Some("shell 1\n"));
    assert_eq!(host.active_shell().id(), ShellId::new(1));

    let step = host.handle(HostInput::Switch(ShellId::new(9))).await;
    assert_eq!(step.output.as_deref(), Some("no shell 9\n"));
    assert_eq!(host.shells().len(), 2);
    Ok(())
}

#[tokio::test]
async fn script_renders_every_shell_after_all_commands_finish() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().prompt("> ").build()).await?;

    let script = vec![
        "echo one".to_string(),
        ":new".to_string(),
        "echo two".to_string(),
    ];
    let rendered = with_timeout(host.run_script(&script)).await?;

    assert_eq!(
        rendered,
        "── shell1 ──\n> echo one\none\n\n── shell2 ──\n> echo two\ntwo\n\n"
    );
    Ok(())
}

#[tokio::test]
async fn quit_stops_the_script() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().build()).await?;

    let script = vec![":quit".to_string(), "echo never".to_string()];
    let rendered = with_timeout(host.run_script(&script)).await?;

    assert_eq!(rendered, "");
    assert!(host.registry().is_empty());
    Ok(())
}

#[tokio::test]
async fn session_applies_input_until_quit() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().prompt("$ ").build()).await?;

    let (tx, rx) = mpsc::channel::<std::io::Result<String>>(8);
    for line in ["echo hi", ":quit", "echo never"] {
        tx.send(Ok(line.to_string())).await?;
    }

    let interrupted = with_timeout(host.run_session(rx, std::future::pending())).await?;

    assert!(!interrupted);
    assert_eq!(host.render_all().await?, "$ echo hi\nhi\n\n");
    Ok(())
}

#[tokio::test]
async fn interrupt_ends_the_session_while_input_stays_open() -> TestResult {
    init_tracing();
    let mut host = Host::new(ConfigFileBuilder::new().build()).await?;

    let (tx, rx) = mpsc::channel::<std::io::Result<String>>(8);
    tx.send(Ok("sleep 10".to_string())).await?;
    let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();

    let session = host.run_session(rx, async move {
        let _ = interrupt_rx.await;
    });
    interrupt_tx.send(()).map_err(|_| "session dropped the interrupt")?;

    // `tx` is still alive, so only the interrupt can end the session, and
    // the running `sleep` is not awaited.
    let interrupted = with_timeout(session).await?;
    assert!(interrupted);
    drop(tx);
    Ok(())
}
