//! The turn engine: one synchronous, deterministic sweep per player input.
//!
//! Turn order is fixed: the player acts first, then the remaining actors in
//! stable roster order, then the construction behaviors. When the player's
//! command comes to nothing (walking into a wall with nobody to bump) the
//! rest of the world holds still and the turn is not consumed.

use crate::action::{self, ActionError};
use crate::command::Command;
use crate::controller::{Controller, ControllerError};
use crate::state::{EntityId, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Action(#[from] ActionError),
    /// A command was supplied but no player-controlled actor leads the
    /// roster.
    #[error("no player-controlled actor to receive the command")]
    NoPlayer,
}

/// What one call to [`GameEngine::process_turn`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Whether the player's command amounted to an action.
    pub player_acted: bool,
    /// Completed turns so far, this one included when it was consumed.
    pub turn: u64,
}

/// Borrows the world for the duration of one or more turns.
pub struct GameEngine<'a> {
    world: &'a mut World,
}

impl<'a> GameEngine<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Advances the simulation by one turn.
    ///
    /// A supplied command is queued on the player controller first. The
    /// remaining actors and the constructions only move when the player
    /// actually acted.
    pub fn process_turn(&mut self, command: Option<Command>) -> Result<TurnReport, TurnError> {
        if let Some(command) = command {
            self.deliver(command)?;
        }

        let roster: Vec<EntityId> = self.world.roster().to_vec();
        let Some(&front) = roster.first() else {
            return Ok(TurnReport {
                player_acted: false,
                turn: self.world.turn(),
            });
        };

        let player_acted = self.take_turn(front)?;
        if player_acted {
            for actor in roster.into_iter().skip(1) {
                self.take_turn(actor)?;
            }
            self.run_constructions();
            self.world.advance_turn();
        }

        Ok(TurnReport {
            player_acted,
            turn: self.world.turn(),
        })
    }

    fn deliver(&mut self, command: Command) -> Result<(), TurnError> {
        let Some(player) = self.world.player() else {
            return Err(TurnError::NoPlayer);
        };
        let Some(mut controller) = self.world.take_controller(player) else {
            return Err(ControllerError::NotAttached { actor: player }.into());
        };
        if let Controller::Player(player_controller) = &mut controller {
            player_controller.accept_command(command);
        }
        self.world.put_back_controller(player, controller);
        Ok(())
    }

    /// One actor's turn. Dead actors and actors that left play mid-sweep do
    /// nothing; controller-less actors (scenery like flags) just stand there.
    fn take_turn(&mut self, actor: EntityId) -> Result<bool, TurnError> {
        let alive = match self.world.entity(actor) {
            Some(entity) if entity.position().is_some() => {
                entity.fighter.is_none_or(|f| f.is_alive())
            }
            _ => false,
        };
        if !alive {
            return Ok(false);
        }
        let Some(mut controller) = self.world.take_controller(actor) else {
            return Ok(false);
        };
        let decision = controller.decide(self.world, actor);
        self.world.put_back_controller(actor, controller);
        let command = decision?;
        Ok(action::execute(self.world, actor, command)?)
    }

    fn run_constructions(&mut self) {
        for id in self.world.behavior_ids() {
            if let Some(mut behavior) = self.world.take_behavior(id) {
                behavior.tick(self.world, id);
                self.world.put_back_behavior(id, behavior);
            }
        }
    }
}
