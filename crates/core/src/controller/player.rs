use std::collections::BTreeMap;

use super::ControllerError;
use crate::command::Command;
use crate::state::EntityId;

/// Holds at most one queued command fed in by the host.
///
/// Two intake paths: `take_command` parses an opaque input symbol through a
/// caller-supplied binding map, `accept_command` queues a pre-built command
/// directly. Either way the queued command is consumed exactly once when the
/// turn resolves.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PlayerController {
    pending: Option<Command>,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps an input symbol to a command and queues it. An unrecognized
    /// symbol is reported as `false` and leaves any pending command alone.
    pub fn take_command(&mut self, symbol: char, bindings: &BTreeMap<char, Command>) -> bool {
        match bindings.get(&symbol) {
            Some(command) => {
                self.pending = Some(*command);
                true
            }
            None => false,
        }
    }

    /// Queues a pre-built command, replacing any pending one.
    pub fn accept_command(&mut self, command: Command) {
        self.pending = Some(command);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(super) fn decide(&mut self, actor: EntityId) -> Result<Command, ControllerError> {
        self.pending
            .take()
            .ok_or(ControllerError::NoPendingCommand { actor })
    }
}
