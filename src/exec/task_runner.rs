// src/exec/task_runner.rs

//! Background task of one command: spawn → drain stdout ∥ drain stderr →
//! wait.

use tracing::{error, info, warn};

use crate::command::CommandRegistry;
use crate::document::{DocumentSink, TextIndex};
use crate::errors::SpawnError;
use crate::exec::runner::ProcessRunner;
use crate::exec::streamer::{stream_process, OutputTarget};
use crate::types::{CommandId, CommandState, ExitOutcome, ShellId};

/// Everything the background task needs to run one command.
#[derive(Debug, Clone)]
pub struct CommandJob {
    pub id: CommandId,
    pub shell: ShellId,
    pub argv: Vec<String>,
    pub target: OutputTarget,
}

/// Run a single command to completion and return its final state.
///
/// - If the process cannot be started, the error text is written into the
///   output region and the command becomes `Failed`.
/// - Otherwise it becomes `Running`, its output is streamed, and it becomes
///   `Completed` once the process has exited, whatever the exit code.
pub async fn run_command<S>(
    job: CommandJob,
    runner: &ProcessRunner,
    sink: &S,
    registry: &CommandRegistry,
) -> CommandState
where
    S: DocumentSink + ?Sized,
{
    info!(
        command = %job.id,
        shell = %job.shell,
        argv = ?job.argv,
        "starting command process"
    );

    let process = match runner.spawn(&job.argv) {
        Ok(process) => process,
        Err(err) => {
            report_spawn_failure(&job, &err, sink, registry).await;
            return CommandState::Failed;
        }
    };

    registry.transition(job.id, CommandState::Running);

    let outcome = match stream_process(process, sink, &job.target).await {
        Ok((outcome, summary)) => {
            info!(
                command = %job.id,
                shell = %job.shell,
                exit_code = ?outcome.code,
                success = outcome.success,
                stdout_lines = summary.stdout.lines,
                stderr_lines = summary.stderr.lines,
                "command process exited"
            );
            outcome
        }
        Err(e) => {
            warn!(
                command = %job.id,
                shell = %job.shell,
                error = %e,
                "output drained but waiting for the process failed"
            );
            ExitOutcome::unknown()
        }
    };

    registry.complete(job.id, outcome);
    CommandState::Completed
}

async fn report_spawn_failure<S>(
    job: &CommandJob,
    err: &SpawnError,
    sink: &S,
    registry: &CommandRegistry,
) where
    S: DocumentSink + ?Sized,
{
    error!(
        command = %job.id,
        shell = %job.shell,
        argv = ?job.argv,
        error = %err,
        "command process could not be started"
    );

    registry.transition(job.id, CommandState::Failed);

    let written = sink
        .insert_text(
            &job.target.region,
            TextIndex::TagEnd(job.target.tag.clone()),
            format!("{err}\n"),
            Some(job.target.tag.clone()),
        )
        .await;

    if let Err(e) = written {
        warn!(
            command = %job.id,
            error = %e,
            "could not write spawn error into the document"
        );
    }
}
