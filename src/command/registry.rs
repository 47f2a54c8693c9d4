// src/command/registry.rs

//! Identity and bookkeeping for commands.
//!
//! A single [`CommandRegistry`] is shared (via `Arc`) by every shell of the
//! process. It owns two independent id sequences, one for commands and one
//! for shells, and the record of every command ever submitted.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::types::{CommandId, CommandState, ExitOutcome, ShellId};

/// Lock-free, strictly increasing counter starting at 1.
#[derive(Debug, Default)]
pub struct IdCounter(AtomicU64);

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next value. Values are never reused.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last issued value (0 if nothing was issued yet).
    pub fn last(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything known about one submitted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub shell: ShellId,
    /// Raw line as typed at the prompt.
    pub source: String,
    pub argv: Vec<String>,
    /// Document line at which the command's region began when created.
    pub anchor_line: usize,
    pub state: CommandState,
    pub exit: Option<ExitOutcome>,
}

impl Command {
    /// A freshly created command, not started yet.
    pub fn pending(
        id: CommandId,
        shell: ShellId,
        source: impl Into<String>,
        argv: Vec<String>,
        anchor_line: usize,
    ) -> Self {
        Self {
            id,
            shell,
            source: source.into(),
            argv,
            anchor_line,
            state: CommandState::Pending,
            exit: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    command_ids: IdCounter,
    shell_ids: IdCounter,
    commands: RwLock<BTreeMap<CommandId, Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next command id; safe to call concurrently from any thread.
    pub fn next_command_id(&self) -> CommandId {
        CommandId::new(self.command_ids.next())
    }

    /// Next shell id, from a sequence independent of command ids.
    pub fn next_shell_id(&self) -> ShellId {
        ShellId::new(self.shell_ids.next())
    }

    /// Store the record of a newly created command.
    pub fn record(&self, command: Command) {
        debug!(
            command = %command.id,
            shell = %command.shell,
            anchor_line = command.anchor_line,
            "recorded command"
        );
        self.write().insert(command.id, command);
    }

    /// Move a command to `next`, if that is a legal lifecycle step.
    ///
    /// Returns `false` (and logs) for unknown ids and illegal transitions.
    pub fn transition(&self, id: CommandId, next: CommandState) -> bool {
        let mut commands = self.write();
        let Some(command) = commands.get_mut(&id) else {
            warn!(command = %id, ?next, "state change for unknown command");
            return false;
        };

        if !command.state.can_advance_to(next) {
            warn!(
                command = %id,
                from = ?command.state,
                to = ?next,
                "ignoring illegal command state transition"
            );
            return false;
        }

        debug!(command = %id, from = ?command.state, to = ?next, "command state changed");
        command.state = next;
        true
    }

    /// Mark a running command as completed and keep its exit outcome.
    pub fn complete(&self, id: CommandId, outcome: ExitOutcome) -> bool {
        if !self.transition(id, CommandState::Completed) {
            return false;
        }
        if let Some(command) = self.write().get_mut(&id) {
            command.exit = Some(outcome);
        }
        true
    }

    pub fn state(&self, id: CommandId) -> Option<CommandState> {
        self.read().get(&id).map(|c| c.state)
    }

    pub fn get(&self, id: CommandId) -> Option<Command> {
        self.read().get(&id).cloned()
    }

    /// Commands owned by `shell`, in creation order.
    pub fn commands_for(&self, shell: ShellId) -> Vec<Command> {
        self.read()
            .values()
            .filter(|c| c.shell == shell)
            .cloned()
            .collect()
    }

    /// Number of recorded commands across all shells.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a record half-written
    // (every update is a single field store), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<CommandId, Command>> {
        self.commands.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<CommandId, Command>> {
        self.commands.write().unwrap_or_else(PoisonError::into_inner)
    }
}
