//! Data-driven effects: what a usable thing does, encoded as values.
//!
//! Effects come in two target families, split at the type level so a
//! fighter-targeted effect can never be aimed at a map tile by accident.
//! The application call still returns a usage error on a mismatched call so
//! misuse through the common [`Effect`] entry points surfaces immediately.

use crate::state::{
    ConstructionTemplate, EntityId, EventKind, GameEvent, Layer, Position, World,
};

/// RNG context tags, one per independent roll site.
pub(crate) mod roll_context {
    pub const HEAL: u32 = 0;
    pub const BLAST_ITEM: u32 = 1;
    pub const AI_TARGET: u32 = 2;
}

/// Which family of target an effect application expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetKind {
    Fighter,
    Tile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("{expected} effect applied to a {supplied} target")]
    TargetKind {
        expected: TargetKind,
        supplied: TargetKind,
    },
}

/// An effect targeting the fighter component of a single entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FighterEffect {
    pub kind: FighterEffectKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FighterEffectKind {
    /// Adds a uniform draw from `[min, max]` to hit points.
    Heal { min: u32, max: u32 },
    /// Adds a fixed amount of ammo.
    RestoreAmmo { amount: u32 },
}

impl FighterEffect {
    pub fn heal(min: u32, max: u32) -> Self {
        Self {
            kind: FighterEffectKind::Heal { min, max },
        }
    }

    pub fn restore_ammo(amount: u32) -> Self {
        Self {
            kind: FighterEffectKind::RestoreAmmo { amount },
        }
    }

    /// Applies to the target's fighter. Returns false when the target has no
    /// fighter component (nothing happened, not an error).
    pub fn apply(&self, world: &mut World, target: EntityId) -> bool {
        let policy = world.config.clamp_policy;
        match self.kind {
            FighterEffectKind::Heal { min, max } => {
                let amount = world.roll_range(roll_context::HEAL, min, max);
                match world.entity_mut(target).and_then(|e| e.fighter.as_mut()) {
                    Some(fighter) => {
                        fighter.heal(amount, policy);
                        true
                    }
                    None => false,
                }
            }
            FighterEffectKind::RestoreAmmo { amount } => {
                match world.entity_mut(target).and_then(|e| e.fighter.as_mut()) {
                    Some(fighter) => {
                        fighter.restore_ammo(amount, policy);
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

/// An effect targeting a map location.
#[derive(Clone, Debug, PartialEq)]
pub struct TileEffect {
    pub kind: TileEffectKind,
    /// Whether using this effect demands an explicit target (a rocket must
    /// be fired somewhere, a landmine goes under your feet).
    pub requires_targeting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TileEffectKind {
    /// Places the template on the constructions layer if it is empty there.
    SpawnConstruction(Box<ConstructionTemplate>),
    /// Damages everything combat-capable on the tile and its 8 neighbors.
    Explode { damage: u32 },
}

impl TileEffect {
    pub fn spawn_construction(template: ConstructionTemplate) -> Self {
        Self {
            kind: TileEffectKind::SpawnConstruction(Box::new(template)),
            requires_targeting: false,
        }
    }

    pub fn explode(damage: u32) -> Self {
        Self {
            kind: TileEffectKind::Explode { damage },
            requires_targeting: true,
        }
    }

    pub fn with_targeting(mut self, requires_targeting: bool) -> Self {
        self.requires_targeting = requires_targeting;
        self
    }

    /// Applies at a location. The boolean reports whether the effect took
    /// hold; an occupied spawn cell is an expected failure, never an error.
    pub fn apply(&self, world: &mut World, location: Position) -> bool {
        match &self.kind {
            TileEffectKind::SpawnConstruction(template) => {
                if world.occupant_or_empty(Layer::Constructions, location).is_some()
                    || !world.contains(location)
                {
                    return false;
                }
                match world.spawn_construction(template, location) {
                    Ok(id) => {
                        world.push_event(GameEvent::new(
                            EventKind::ConstructionSpawned,
                            Some(id),
                            Some(location),
                        ));
                        true
                    }
                    Err(_) => false,
                }
            }
            TileEffectKind::Explode { damage } => {
                explode(world, location, *damage);
                true
            }
        }
    }
}

/// Blast resolution over ground zero and its 8-neighborhood.
///
/// Two passes: damage is applied to every fighter-capable occupant first,
/// removal happens afterwards, so the sweep never mutates a column it is
/// still iterating. Constructions exactly at ground zero eat an extra
/// `2 x max_hp` up front, which guarantees their destruction barring
/// unusual defense values. Items at ground zero are always destroyed,
/// items one tile out with 50% probability.
fn explode(world: &mut World, location: Position, damage: u32) {
    world.push_event(GameEvent::new(EventKind::Exploded, None, Some(location)));

    let mut footprint: Vec<(Position, bool)> = vec![(location, true)];
    footprint.extend(
        world
            .neighbor_positions(location)
            .into_iter()
            .map(|p| (p, false)),
    );

    let mut destroyed_fighters: Vec<EntityId> = Vec::new();
    let mut destroyed_items: Vec<(EntityId, Position)> = Vec::new();

    for (tile, ground_zero) in footprint {
        for victim in world.column_at(tile) {
            let Some(entity) = world.entity(victim) else {
                continue;
            };
            if entity.is_combat_capable() {
                let construction_at_ground_zero = ground_zero && entity.is_construction();
                let Some(fighter) = world.entity_mut(victim).and_then(|e| e.fighter.as_mut())
                else {
                    continue;
                };
                use crate::state::DamageOutcome::Destroyed;
                if construction_at_ground_zero {
                    let extra = 2 * fighter.hp.maximum;
                    if fighter.apply_damage(extra) == Destroyed {
                        destroyed_fighters.push(victim);
                    }
                }
                if fighter.apply_damage(damage) == Destroyed {
                    destroyed_fighters.push(victim);
                }
            } else if entity.is_item() {
                let doomed = ground_zero
                    || world.roll_percent(roll_context::BLAST_ITEM)
                        <= crate::config::GameConfig::ITEM_BLAST_DESTRUCTION_PERCENT;
                if doomed {
                    destroyed_items.push((victim, tile));
                }
            }
        }
    }

    for id in destroyed_fighters {
        world.destroy_entity(id);
    }
    let any_item_destroyed = !destroyed_items.is_empty();
    for (id, tile) in destroyed_items {
        world.push_event(GameEvent::new(EventKind::WasDestroyed, Some(id), Some(tile)));
        world.remove_from_play(id);
    }

    // The crater: always placed, overwriting whatever construction remains.
    let _ = world.delete(Layer::Constructions, location);
    if let Ok(hole) = world.spawn_construction(&ConstructionTemplate::hole(), location) {
        world.push_event(GameEvent::new(
            EventKind::ConstructionSpawned,
            Some(hole),
            Some(location),
        ));
    }

    if any_item_destroyed {
        world.extend_log("Some items were destroyed");
    }
}

/// A complete effect value: one target family, one kind, one payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Fighter(FighterEffect),
    Tile(TileEffect),
}

impl Effect {
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Effect::Fighter(_) => TargetKind::Fighter,
            Effect::Tile(_) => TargetKind::Tile,
        }
    }

    pub fn requires_targeting(&self) -> bool {
        match self {
            Effect::Fighter(_) => false,
            Effect::Tile(effect) => effect.requires_targeting,
        }
    }

    /// Applies against a fighter target; calling this on a tile effect is a
    /// usage error.
    pub fn apply_to_fighter(
        &self,
        world: &mut World,
        target: EntityId,
    ) -> Result<bool, EffectError> {
        match self {
            Effect::Fighter(effect) => Ok(effect.apply(world, target)),
            Effect::Tile(_) => Err(EffectError::TargetKind {
                expected: TargetKind::Tile,
                supplied: TargetKind::Fighter,
            }),
        }
    }

    /// Applies against a tile target; calling this on a fighter effect is a
    /// usage error.
    pub fn apply_to_tile(&self, world: &mut World, location: Position) -> Result<bool, EffectError> {
        match self {
            Effect::Tile(effect) => Ok(effect.apply(world, location)),
            Effect::Fighter(_) => Err(EffectError::TargetKind {
                expected: TargetKind::Fighter,
                supplied: TargetKind::Tile,
            }),
        }
    }
}
