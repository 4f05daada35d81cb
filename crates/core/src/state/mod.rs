//! World state: identifiers, the layered grid, entities, fighters, events
//! and the world context that ties them together.

mod common;
mod entity;
mod events;
mod fighter;
mod grid;
mod world;

pub use common::{EntityId, Offset, Position, ResourceMeter};
pub use entity::{
    ActorTemplate, ConstructionTemplate, Entity, EntityKind, Inventory, ItemTemplate, Placement,
};
pub use events::{EventKind, EventLog, GameEvent};
pub use fighter::{DamageOutcome, Fighter};
pub use grid::{ColumnSlots, Grid, GridError, Layer, NeighborSlots};
pub use world::World;
