// src/shell/mod.rs

//! A prompt plus the text region it writes into.
//!
//! [`Shell::submit`] is the whole "line typed → streamed output" workflow:
//! tokenize, issue an id, reserve the command's block in the document,
//! bind its toggle, and start the process in the background. It returns as
//! soon as the background task is spawned.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{parse_argv, Command, CommandRegistry};
use crate::document::{ClickAction, DocumentSink, Insertion, RegionName, Tag};
use crate::errors::{ParseError, Result, SinkError};
use crate::exec::{run_command, CommandJob, OutputTarget, ProcessRunner};
use crate::types::{CommandId, CommandState, ShellId, Visibility};

/// Prompt shown in front of every command unless configured otherwise.
pub const DEFAULT_PROMPT: &str = "» ";

/// Per-shell settings, usually taken from `[shell]` in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub prompt: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// One command block this shell wrote into its region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    pub command: CommandId,
    /// Line the block started on when it was written.
    pub anchor_line: usize,
    pub output: Tag,
}

pub struct Shell<S: DocumentSink + 'static> {
    id: ShellId,
    region: RegionName,
    prompt: String,
    input: String,
    registry: Arc<CommandRegistry>,
    sink: Arc<S>,
    runner: ProcessRunner,
    regions: Vec<RegionDescriptor>,
    running: Vec<(CommandId, JoinHandle<CommandState>)>,
}

impl<S: DocumentSink + 'static> std::fmt::Debug for Shell<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("prompt", &self.prompt)
            .field("input", &self.input)
            .field("regions", &self.regions)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentSink + 'static> Shell<S> {
    /// Create a shell with a fresh id and its own (empty) region.
    pub async fn open(
        registry: Arc<CommandRegistry>,
        sink: Arc<S>,
        settings: &ShellSettings,
    ) -> std::result::Result<Self, SinkError> {
        let id = registry.next_shell_id();
        let region = format!("shell{id}");
        sink.create_region(&region).await?;

        info!(shell = %id, %region, "shell opened");

        Ok(Self {
            id,
            region,
            prompt: settings.prompt.clone(),
            input: String::new(),
            registry,
            sink,
            runner: ProcessRunner::new(),
            regions: Vec::new(),
            running: Vec::new(),
        })
    }

    pub fn id(&self) -> ShellId {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the pending input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Command blocks written by this shell, oldest first.
    pub fn regions(&self) -> &[RegionDescriptor] {
        &self.regions
    }

    /// Submit the current input buffer.
    ///
    /// Returns `Ok(None)` when the input has no tokens (the input is cleared
    /// and nothing else happens). Otherwise returns the new command's id as
    /// soon as its process has been handed to a background task.
    ///
    /// The input is cleared only once the block has been written; if the
    /// document refuses the block, the error is returned and the input is
    /// left as it was.
    pub async fn submit(&mut self) -> Result<Option<CommandId>> {
        let line = self.input.clone();

        let argv = match parse_argv(&line) {
            Ok(argv) => argv,
            Err(ParseError::Empty) => {
                debug!(shell = %self.id, "empty submission ignored");
                self.input.clear();
                return Ok(None);
            }
        };

        self.reap_finished();

        let id = self.registry.next_command_id();
        let output = Tag::Output(id);

        let block = vec![
            Insertion::tagged(self.prompt.clone(), Tag::Prompt(id)),
            Insertion::tagged(echo_text(&line), Tag::Echo(id)),
            Insertion::tagged("\n", output.clone()),
            Insertion::plain("\n"),
        ];
        let anchor = self.sink.insert_block(&self.region, block).await?;

        if let Err(e) = self
            .sink
            .bind_click(&self.region, Tag::Prompt(id), ClickAction::ToggleOutput(id))
            .await
        {
            warn!(command = %id, error = %e, "could not bind output toggle");
        }

        self.registry.record(Command::pending(
            id,
            self.id,
            line,
            argv.clone(),
            anchor.line,
        ));
        self.regions.push(RegionDescriptor {
            command: id,
            anchor_line: anchor.line,
            output: output.clone(),
        });

        let job = CommandJob {
            id,
            shell: self.id,
            argv,
            target: OutputTarget {
                region: self.region.clone(),
                tag: output,
            },
        };
        let runner = self.runner;
        let sink = Arc::clone(&self.sink);
        let registry = Arc::clone(&self.registry);
        let handle = tokio::spawn(async move {
            run_command(job, &runner, sink.as_ref(), registry.as_ref()).await
        });

        self.running.push((id, handle));
        self.input.clear();

        debug!(shell = %self.id, command = %id, anchor_line = anchor.line, "command submitted");
        Ok(Some(id))
    }

    /// Set the input to `line` and submit it.
    pub async fn submit_line(&mut self, line: impl Into<String>) -> Result<Option<CommandId>> {
        self.set_input(line);
        self.submit().await
    }

    /// Collapse or expand the output of `command`, as a click on its prompt
    /// marker would. Returns the new visibility (`None` if the command has no
    /// toggle bound in this shell).
    pub async fn toggle(
        &self,
        command: CommandId,
    ) -> std::result::Result<Option<Visibility>, SinkError> {
        self.sink.click(&self.region, Tag::Prompt(command)).await
    }

    /// Number of command tasks that have not finished yet.
    pub fn running(&self) -> usize {
        self.running.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    /// Command tasks still tracked: running ones plus finished ones not
    /// reaped yet. Finished tasks are dropped on the next submission.
    pub fn tracked(&self) -> usize {
        self.running.len()
    }

    /// Wait for every tracked command task and return their final states in
    /// submission order. Tasks already reaped by `submit` are not reported;
    /// their state stays available in the registry.
    pub async fn wait_idle(&mut self) -> Vec<(CommandId, CommandState)> {
        let mut finished = Vec::with_capacity(self.running.len());
        for (id, handle) in self.running.drain(..) {
            match handle.await {
                Ok(state) => finished.push((id, state)),
                Err(e) => {
                    warn!(command = %id, error = %e, "command task did not finish cleanly");
                    let state = self.registry.state(id).unwrap_or(CommandState::Failed);
                    finished.push((id, state));
                }
            }
        }
        finished
    }

    fn reap_finished(&mut self) {
        let before = self.running.len();
        self.running.retain(|(_, handle)| !handle.is_finished());
        let reaped = before - self.running.len();
        if reaped > 0 {
            debug!(shell = %self.id, reaped, "dropped finished command tasks");
        }
    }
}

/// The submitted line as echoed in the document: always a single line.
fn echo_text(line: &str) -> String {
    line.replace(['\r', '\n'], " ")
}
