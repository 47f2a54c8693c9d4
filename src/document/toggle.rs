// src/document/toggle.rs

use std::collections::HashMap;

use tracing::debug;

use crate::types::{CommandId, Visibility};

/// Per-command visibility of output regions.
///
/// A command that was never toggled is [`Visibility::Shown`]; each toggle
/// flips the explicit state.
#[derive(Debug, Clone, Default)]
pub struct ToggleController {
    states: HashMap<CommandId, Visibility>,
}

impl ToggleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self, id: CommandId) -> Visibility {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Flip the visibility of `id` and return the new state.
    pub fn toggle(&mut self, id: CommandId) -> Visibility {
        let next = self.visibility(id).toggled();
        self.states.insert(id, next);
        debug!(command = %id, visibility = ?next, "toggled output region");
        next
    }

    /// Record an explicitly configured state.
    pub fn set(&mut self, id: CommandId, visibility: Visibility) {
        self.states.insert(id, visibility);
    }
}
