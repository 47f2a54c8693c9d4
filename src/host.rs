// src/host.rs

//! Line-oriented terminal front end.
//!
//! Stands in for the graphical document view: every stdin line is either a
//! host directive (starting with `:`) or text submitted at the active
//! shell's prompt. Rendered regions go to stdout; logs go to stderr.

use std::future::Future;
use std::io::{self, BufRead};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::command::CommandRegistry;
use crate::config::ConfigFile;
use crate::document::{spawn_document_writer, Document, DocumentHandle};
use crate::errors::{Result, SinkError};
use crate::shell::Shell;
use crate::types::{CommandId, CommandState, ShellId};

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    /// Text for the active shell's prompt.
    Submit(String),
    /// `:toggle <command-id>`
    Toggle(CommandId),
    /// `:show`
    Show,
    /// `:new`
    NewShell,
    /// `:switch <shell-id>`
    Switch(ShellId),
    /// `:wait`
    Wait,
    /// `:quit`
    Quit,
    /// A directive that could not be understood; carries the message to show.
    Invalid(String),
}

impl HostInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(directive) = trimmed.strip_prefix(':') else {
            return HostInput::Submit(line.to_string());
        };

        let mut words = directive.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();

        match (name, arg) {
            ("toggle", Some(id)) => match id.parse() {
                Ok(id) => HostInput::Toggle(CommandId::new(id)),
                Err(_) => HostInput::Invalid(format!("not a command id: {id}")),
            },
            ("switch", Some(id)) => match id.parse() {
                Ok(id) => HostInput::Switch(ShellId::new(id)),
                Err(_) => HostInput::Invalid(format!("not a shell id: {id}")),
            },
            ("toggle", None) => HostInput::Invalid("usage: :toggle <command-id>".to_string()),
            ("switch", None) => HostInput::Invalid("usage: :switch <shell-id>".to_string()),
            ("show", _) => HostInput::Show,
            ("new", _) => HostInput::NewShell,
            ("wait", _) => HostInput::Wait,
            ("quit" | "q", _) => HostInput::Quit,
            (other, _) => HostInput::Invalid(format!("unknown directive :{other}")),
        }
    }
}

/// Result of handling one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostStep {
    /// Text to print to stdout, if any.
    pub output: Option<String>,
    /// Whether the host should keep reading input.
    pub keep_running: bool,
}

impl HostStep {
    fn quiet() -> Self {
        Self {
            output: None,
            keep_running: true,
        }
    }

    fn print(text: impl Into<String>) -> Self {
        Self {
            output: Some(text.into()),
            keep_running: true,
        }
    }

    fn quit() -> Self {
        Self {
            output: None,
            keep_running: false,
        }
    }
}

/// Owns the document writer, the command registry and every shell.
pub struct Host {
    config: ConfigFile,
    registry: Arc<CommandRegistry>,
    document: Arc<DocumentHandle>,
    shells: Vec<Shell<DocumentHandle>>,
    active: usize,
}

impl Host {
    /// Start the document writer and open the first shell.
    pub async fn new(config: ConfigFile) -> Result<Self> {
        let registry = Arc::new(CommandRegistry::new());
        let document = Arc::new(spawn_document_writer(
            Document::new(),
            config.document.queue_length,
        ));
        let first = Shell::open(
            Arc::clone(&registry),
            Arc::clone(&document),
            &config.shell_settings(),
        )
        .await?;

        Ok(Self {
            config,
            registry,
            document,
            shells: vec![first],
            active: 0,
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    pub fn active_shell(&self) -> &Shell<DocumentHandle> {
        &self.shells[self.active]
    }

    pub fn shells(&self) -> &[Shell<DocumentHandle>] {
        &self.shells
    }

    /// Apply one input line.
    pub async fn handle(&mut self, input: HostInput) -> HostStep {
        debug!(?input, "host input");

        match input {
            HostInput::Submit(line) => {
                let shell = &mut self.shells[self.active];
                if let Err(e) = shell.submit_line(line).await {
                    error!(shell = %shell.id(), error = %e, "submission failed");
                    return HostStep::print(format!("error: {e}\n"));
                }
                HostStep::quiet()
            }
            HostInput::Toggle(id) => {
                let shell = &self.shells[self.active];
                match shell.toggle(id).await {
                    Ok(Some(visibility)) => {
                        HostStep::print(format!("command {id}: {visibility:?}\n"))
                    }
                    Ok(None) => HostStep::print(format!("no command {id} in shell {}\n", shell.id())),
                    Err(e) => HostStep::print(format!("error: {e}\n")),
                }
            }
            HostInput::Show => {
                let region = self.shells[self.active].region().to_string();
                match self.document.render(&region).await {
                    Ok(text) => HostStep::print(terminated(text)),
                    Err(e) => HostStep::print(format!("error: {e}\n")),
                }
            }
            HostInput::NewShell => match self.open_shell().await {
                Ok(id) => HostStep::print(format!("shell {id}\n")),
                Err(e) => HostStep::print(format!("error: {e}\n")),
            },
            HostInput::Switch(id) => match self.shells.iter().position(|s| s.id() == id) {
                Some(index) => {
                    self.active = index;
                    HostStep::print(format!("shell {id}\n"))
                }
                None => HostStep::print(format!("no shell {id}\n")),
            },
            HostInput::Wait => {
                self.wait_all().await;
                HostStep::quiet()
            }
            HostInput::Quit => HostStep::quit(),
            HostInput::Invalid(message) => HostStep::print(format!("{message}\n")),
        }
    }

    /// Open another shell and make it the active one.
    pub async fn open_shell(&mut self) -> std::result::Result<ShellId, SinkError> {
        let shell = Shell::open(
            Arc::clone(&self.registry),
            Arc::clone(&self.document),
            &self.config.shell_settings(),
        )
        .await?;
        let id = shell.id();
        self.shells.push(shell);
        self.active = self.shells.len() - 1;
        Ok(id)
    }

    /// Wait for every running command of every shell.
    pub async fn wait_all(&mut self) -> Vec<(CommandId, CommandState)> {
        let mut finished = Vec::new();
        for shell in &mut self.shells {
            finished.extend(shell.wait_idle().await);
        }
        finished
    }

    /// Displayed text of every shell region, in shell order. Regions are
    /// headed by their name when there is more than one.
    pub async fn render_all(&self) -> std::result::Result<String, SinkError> {
        let many = self.shells.len() > 1;
        let mut out = String::new();
        for shell in &self.shells {
            if many {
                out.push_str(&format!("── {} ──\n", shell.region()));
            }
            out.push_str(&terminated(self.document.render(shell.region()).await?));
        }
        Ok(out)
    }

    /// Scripted mode: apply each line, wait for all commands, return the
    /// rendered document.
    pub async fn run_script(&mut self, lines: &[String]) -> Result<String> {
        for line in lines {
            let step = self.handle(HostInput::parse(line)).await;
            if let Some(text) = step.output {
                print!("{text}");
            }
            if !step.keep_running {
                break;
            }
        }
        self.wait_all().await;
        Ok(self.render_all().await?)
    }

    /// Interactive mode: read stdin until EOF, `:quit`, or Ctrl-C, then print
    /// every region if `[host].print_on_exit` is set.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = shutdown_tx.send(()).await;
        });
        let interrupt = async move {
            if shutdown_rx.recv().await.is_none() {
                // No signal listener; only input can end the session.
                std::future::pending::<()>().await;
            }
        };

        self.run_session(spawn_stdin_reader()?, interrupt).await?;

        if self.config.host.print_on_exit {
            print!("{}", self.render_all().await?);
        }
        Ok(())
    }

    /// Apply `input` lines until it closes, `:quit` is entered, or
    /// `interrupt` resolves. Returns `true` if interrupted.
    ///
    /// On close or `:quit` running commands are awaited; on interrupt they
    /// are left running and the session ends at once.
    pub async fn run_session<F>(
        &mut self,
        mut input: mpsc::Receiver<io::Result<String>>,
        interrupt: F,
    ) -> Result<bool>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        let interrupted = loop {
            tokio::select! {
                line = input.recv() => {
                    let Some(line) = line else {
                        info!("input closed");
                        break false;
                    };
                    let step = self.handle(HostInput::parse(&line?)).await;
                    if let Some(text) = step.output {
                        print!("{text}");
                    }
                    if !step.keep_running {
                        break false;
                    }
                }
                () = &mut interrupt => {
                    info!("interrupted; not waiting for running commands");
                    break true;
                }
            }
        };

        if !interrupted {
            self.wait_all().await;
        }
        Ok(interrupted)
    }
}

/// Read stdin lines on a dedicated thread.
///
/// A blocked read on that thread never holds up runtime shutdown, so the
/// process can exit while the terminal is still open.
fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("edi-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn terminated(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
