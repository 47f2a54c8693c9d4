// src/exec/runner.rs

//! Starting external processes.

use std::io;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, warn};

use crate::errors::SpawnError;
use crate::types::{ExitOutcome, StreamKind};

/// Spawns one process per command.
///
/// Environment and working directory are inherited from the host; stdin is
/// the null device; stdout and stderr are piped back to us.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Start `argv[0]` with `argv[1..]` as arguments.
    pub fn spawn(&self, argv: &[String]) -> Result<RunningProcess, SpawnError> {
        let (program, args) = argv.split_first().ok_or(SpawnError::EmptyArgv)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        let mut child = cmd.spawn().map_err(|source| SpawnError::Start {
            program: program.clone(),
            source,
        })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            (out, _) => {
                let missing = if out.is_none() {
                    StreamKind::Stdout
                } else {
                    StreamKind::Stderr
                };
                if let Err(e) = child.start_kill() {
                    warn!(program = %program, error = %e, "failed to kill process with missing pipe");
                }
                return Err(SpawnError::Pipe(missing));
            }
        };

        debug!(program = %program, pid = ?child.id(), "process started");

        Ok(RunningProcess {
            program: program.clone(),
            child,
            stdout: Some(stdout),
            stderr: Some(stderr),
        })
    }
}

/// A started process and its not-yet-taken output streams.
#[derive(Debug)]
pub struct RunningProcess {
    program: String,
    child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

impl RunningProcess {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// OS process id, `None` once the process has been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    /// Wait for the process to exit.
    pub async fn wait(&mut self) -> io::Result<ExitOutcome> {
        let status = self.child.wait().await?;
        Ok(ExitOutcome::from(status))
    }
}
