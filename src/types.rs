// src/types.rs

use std::fmt;

/// Identifier of a submitted command.
///
/// Issued by [`crate::command::CommandRegistry`]; ordering follows creation
/// order across every shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(u64);

impl CommandId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a shell (prompt + text container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShellId(u64);

impl ShellId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a command.
///
/// - `Pending`: region reserved, process not started yet.
/// - `Running`: process started, output is streaming.
/// - `Completed`: process exited (any exit code).
/// - `Failed`: the process could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl CommandState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CommandState::Completed | CommandState::Failed)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_advance_to(self, next: CommandState) -> bool {
        matches!(
            (self, next),
            (CommandState::Pending, CommandState::Running)
                | (CommandState::Pending, CommandState::Failed)
                | (CommandState::Running, CommandState::Completed)
        )
    }
}

/// Visibility of a command's output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Shown,
    Hidden,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Shown => Visibility::Hidden,
            Visibility::Hidden => Visibility::Shown,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }

    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Shown
        }
    }
}

/// Which output stream of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// How a process terminated.
///
/// Kept on the command record; the document does not display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when killed by a signal or when the status could not
    /// be collected.
    pub code: Option<i32>,
    pub success: bool,
}

impl ExitOutcome {
    /// Outcome used when waiting on the process itself failed.
    pub fn unknown() -> Self {
        Self {
            code: None,
            success: false,
        }
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}
