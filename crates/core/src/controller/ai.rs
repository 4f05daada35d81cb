use crate::command::{Command, EffectTarget, InventorySlot};
use crate::effect::roll_context;
use crate::state::{EntityId, Layer, Position, World};

/// Aggressive melee policy: bump into an adjacent enemy, otherwise drift.
///
/// "Enemy" here is any combat-capable actor in the 8-neighborhood on the
/// actor layer; with several candidates one is picked uniformly with the
/// world's seeded RNG. Walking onto the pick's tile triggers collision
/// resolution, which is where the actual attack happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MeleeAi;

impl MeleeAi {
    pub fn new() -> Self {
        Self
    }

    pub(super) fn decide(&mut self, world: &mut World, actor: EntityId) -> Command {
        let Some(position) = world.position_of(actor) else {
            return Command::Wait;
        };
        match pick_adjacent_enemy(world, position) {
            Some((_, enemy_position)) => Command::Walk {
                offset: position.offset_to(enemy_position),
            },
            None => Command::Walk {
                offset: world.config.ai_drift,
            },
        }
    }
}

/// Shooter policy layered over the melee one.
///
/// Fires the first carried item at an adjacent enemy when it has ammo to
/// spend; with no ammo, no item or no enemy in reach it behaves exactly
/// like [`MeleeAi`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RangedAi {
    melee: MeleeAi,
}

impl RangedAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn decide(&mut self, world: &mut World, actor: EntityId) -> Command {
        if let Some(position) = world.position_of(actor)
            && has_ammo(world, actor)
            && let Some(slot) = first_item_slot(world, actor)
            && let Some((enemy, enemy_position)) = pick_adjacent_enemy(world, position)
        {
            let target = if carried_effect_targets_tiles(world, actor, slot) {
                EffectTarget::Tile(enemy_position)
            } else {
                EffectTarget::Fighter(enemy)
            };
            return Command::UseItem {
                slot,
                target: Some(target),
            };
        }
        self.melee.decide(world, actor)
    }
}

fn has_ammo(world: &World, actor: EntityId) -> bool {
    world
        .entity(actor)
        .and_then(|e| e.fighter)
        .is_some_and(|f| f.ammo.current > 0)
}

fn first_item_slot(world: &World, actor: EntityId) -> Option<InventorySlot> {
    let inventory = world.entity(actor)?.inventory.as_ref()?;
    if inventory.is_empty() {
        None
    } else {
        Some(InventorySlot(0))
    }
}

fn carried_effect_targets_tiles(world: &World, actor: EntityId, slot: InventorySlot) -> bool {
    use crate::effect::TargetKind;
    use crate::state::EntityKind;

    world
        .entity(actor)
        .and_then(|e| e.inventory.as_ref())
        .and_then(|inventory| inventory.get(slot.index()))
        .and_then(|item| world.entity(item))
        .is_some_and(|item| match &item.kind {
            EntityKind::Item { effect } => effect.target_kind() == TargetKind::Tile,
            _ => false,
        })
}

/// Uniform pick over combat-capable occupants of the 8 neighboring actor
/// cells. Consumes one RNG draw only when there are candidates.
fn pick_adjacent_enemy(world: &mut World, position: Position) -> Option<(EntityId, Position)> {
    let candidates: Vec<(EntityId, Position)> = world
        .neighbors_of(position, Layer::Actors)
        .into_iter()
        .filter_map(|id| {
            let entity = world.entity(id)?;
            if entity.is_combat_capable() {
                Some((id, entity.position()?))
            } else {
                None
            }
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let pick = world.pick_index(roll_context::AI_TARGET, candidates.len());
    Some(candidates[pick])
}
