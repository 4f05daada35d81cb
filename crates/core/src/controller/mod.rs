//! Decision-making layer: who chooses what an actor does each turn.
//!
//! Controllers live in a side map on the world, keyed by actor id, so actor
//! and controller never own each other. A controller only ever decides; the
//! action layer executes the resulting [`Command`].

mod ai;
mod player;

pub use ai::{MeleeAi, RangedAi};
pub use player::PlayerController;

use crate::command::Command;
use crate::state::{EntityId, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The player controller was asked to act without a queued command.
    /// The host must feed a command before advancing the turn.
    #[error("player actor {actor} has no pending command")]
    NoPendingCommand { actor: EntityId },

    /// A roster actor has no controller attached.
    #[error("actor {actor} has no attached controller")]
    NotAttached { actor: EntityId },
}

/// Tagged controller variants. One per actor, exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum Controller {
    Player(PlayerController),
    MeleeAi(MeleeAi),
    RangedAi(RangedAi),
}

impl Controller {
    /// Produces this actor's command for the current turn.
    ///
    /// The player variant consumes its pending command; AI variants compute
    /// one from world state (rolling the world RNG, hence `&mut World`).
    pub fn decide(&mut self, world: &mut World, actor: EntityId) -> Result<Command, ControllerError> {
        match self {
            Controller::Player(player) => player.decide(actor),
            Controller::MeleeAi(ai) => Ok(ai.decide(world, actor)),
            Controller::RangedAi(ai) => Ok(ai.decide(world, actor)),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Controller::Player(_))
    }
}
