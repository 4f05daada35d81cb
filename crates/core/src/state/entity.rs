use arrayvec::ArrayVec;

use super::{EntityId, Fighter, Layer, Position};
use crate::behavior::ConstructionBehavior;
use crate::config::GameConfig;
use crate::controller::Controller;
use crate::effect::Effect;

/// Where an entity was last placed.
///
/// A non-owning back-reference: the grid stays the canonical location
/// registry, the placement is just the stamp the world leaves on the entity
/// so actions can ask "where am I" without a grid sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub layer: Layer,
    pub position: Position,
}

/// Broad family an entity belongs to. Items carry their effect as data.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Ground,
    Actor,
    Construction,
    Item { effect: Effect },
}

/// A placeable thing: ground tile, actor, construction or item.
///
/// Components are optional; only combat-capable entities carry a `Fighter`
/// and only carriers have an `Inventory`. The `sprite` is an opaque
/// presentation key for the rendering collaborator, never interpreted here.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub passable: bool,
    pub air_passable: bool,
    pub sprite: Option<String>,
    pub fighter: Option<Fighter>,
    pub inventory: Option<Inventory>,
    pub placement: Option<Placement>,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            passable: true,
            air_passable: true,
            sprite: None,
            fighter: None,
            inventory: None,
            placement: None,
        }
    }

    pub fn with_passable(mut self, passable: bool) -> Self {
        self.passable = passable;
        self
    }

    pub fn with_air_passable(mut self, air_passable: bool) -> Self {
        self.air_passable = air_passable;
        self
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn is_actor(&self) -> bool {
        matches!(self.kind, EntityKind::Actor)
    }

    pub fn is_construction(&self) -> bool {
        matches!(self.kind, EntityKind::Construction)
    }

    pub fn is_item(&self) -> bool {
        matches!(self.kind, EntityKind::Item { .. })
    }

    /// Combat-capable means carrying a fighter component.
    pub fn is_combat_capable(&self) -> bool {
        self.fighter.is_some()
    }

    pub fn position(&self) -> Option<Position> {
        self.placement.map(|p| p.position)
    }
}

/// Capacity-bounded item storage.
///
/// `volume` is the per-entity cap (a chassis carries one item, the player
/// ten); the compile-time bound is the hard ceiling for any entity.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Inventory {
    volume: usize,
    slots: ArrayVec<EntityId, { GameConfig::MAX_INVENTORY_SLOTS }>,
}

impl Inventory {
    pub fn with_volume(volume: usize) -> Self {
        Self {
            volume: volume.min(GameConfig::MAX_INVENTORY_SLOTS),
            slots: ArrayVec::new(),
        }
    }

    pub fn volume(&self) -> usize {
        self.volume
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.volume
    }

    /// Adds an item, reporting false when at volume.
    pub fn insert(&mut self, item: EntityId) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.push(item);
        true
    }

    pub fn get(&self, slot: usize) -> Option<EntityId> {
        self.slots.get(slot).copied()
    }

    /// Removes and returns the item in a slot; later slots shift down.
    pub fn remove(&mut self, slot: usize) -> Option<EntityId> {
        if slot >= self.slots.len() {
            return None;
        }
        Some(self.slots.remove(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().copied()
    }

    /// Drains every carried item (used when the owner is destroyed).
    pub fn take_all(&mut self) -> ArrayVec<EntityId, { GameConfig::MAX_INVENTORY_SLOTS }> {
        std::mem::take(&mut self.slots)
    }
}

// ============================================================================
// Templates
// ============================================================================
// Templates are the data side of "what a usable thing spawns": an effect or
// a construction behavior carries a template and the world instantiates it
// on demand. Boxes break the natural recursion (a landmine item spawns a
// mine construction whose trap effect could spawn more constructions).

/// Blueprint for a construction placed by effects or scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructionTemplate {
    pub name: String,
    pub sprite: Option<String>,
    pub passable: bool,
    pub air_passable: bool,
    pub fighter: Option<Fighter>,
    pub behavior: Option<Box<ConstructionBehavior>>,
}

impl ConstructionTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprite: None,
            passable: false,
            air_passable: false,
            fighter: None,
            behavior: None,
        }
    }

    /// The hole an explosion leaves behind: blocks walking, not flying.
    pub fn hole() -> Self {
        Self {
            name: "Hole".to_string(),
            sprite: Some("Hole.png".to_string()),
            passable: false,
            air_passable: true,
            fighter: None,
            behavior: None,
        }
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_passable(mut self, passable: bool) -> Self {
        self.passable = passable;
        self
    }

    pub fn with_air_passable(mut self, air_passable: bool) -> Self {
        self.air_passable = air_passable;
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_behavior(mut self, behavior: ConstructionBehavior) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn instantiate(&self) -> Entity {
        let mut entity = Entity::new(self.name.clone(), EntityKind::Construction)
            .with_passable(self.passable)
            .with_air_passable(self.air_passable);
        entity.sprite = self.sprite.clone();
        entity.fighter = self.fighter;
        entity
    }
}

/// Blueprint for a single-use item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemTemplate {
    pub name: String,
    pub sprite: Option<String>,
    pub effect: Effect,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, effect: Effect) -> Self {
        Self {
            name: name.into(),
            sprite: None,
            effect,
        }
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn instantiate(&self) -> Entity {
        let mut entity = Entity::new(
            self.name.clone(),
            EntityKind::Item {
                effect: self.effect.clone(),
            },
        );
        entity.sprite = self.sprite.clone();
        entity
    }
}

/// Blueprint for an actor, controller included.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorTemplate {
    pub name: String,
    pub sprite: Option<String>,
    pub fighter: Fighter,
    pub controller: Controller,
    pub volume: usize,
    pub items: Vec<ItemTemplate>,
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>, fighter: Fighter, controller: Controller) -> Self {
        Self {
            name: name.into(),
            sprite: None,
            fighter,
            controller,
            volume: 1,
            items: Vec::new(),
        }
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_volume(mut self, volume: usize) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_items(mut self, items: Vec<ItemTemplate>) -> Self {
        self.items = items;
        self
    }

    /// Actors always block walking.
    pub fn instantiate(&self) -> Entity {
        let mut entity = Entity::new(self.name.clone(), EntityKind::Actor)
            .with_passable(false)
            .with_fighter(self.fighter)
            .with_inventory(Inventory::with_volume(self.volume));
        entity.sprite = self.sprite.clone();
        entity
    }
}
