pub mod action;
pub mod behavior;
pub mod command;
pub mod config;
pub mod controller;
pub mod effect;
pub mod engine;
pub mod rng;
pub mod state;

pub use action::ActionError;
pub use behavior::{ConstructionBehavior, Spawner, Trap};
pub use command::{Command, EffectTarget, InventorySlot};
pub use config::{ClampPolicy, GameConfig};
pub use controller::{Controller, ControllerError, MeleeAi, PlayerController, RangedAi};
pub use effect::{
    Effect, EffectError, FighterEffect, FighterEffectKind, TargetKind, TileEffect, TileEffectKind,
};
pub use engine::{GameEngine, TurnError, TurnReport};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use state::{
    ActorTemplate, ColumnSlots, ConstructionTemplate, DamageOutcome, Entity, EntityId, EntityKind,
    EventKind, EventLog, Fighter, GameEvent, Grid, GridError, Inventory, ItemTemplate, Layer,
    NeighborSlots, Offset, Placement, Position, ResourceMeter, World,
};
