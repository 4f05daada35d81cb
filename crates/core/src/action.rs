//! Command execution: the only code that turns a [`Command`] into world
//! mutations.
//!
//! Every entry point reports whether the actor actually acted. Expected
//! no-ops (walking into a wall with nobody to bump, grabbing from an empty
//! tile, a full inventory) come back as `Ok(false)` so the turn engine can
//! refuse to consume the player's turn, while genuine misuse surfaces as an
//! error.

use crate::command::{Command, EffectTarget, InventorySlot};
use crate::effect::{Effect, EffectError, TargetKind};
use crate::state::{
    EntityId, EntityKind, EventKind, GameEvent, GridError, Layer, Position, World,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Effect(#[from] EffectError),
}

/// Runs one command for one actor. Exactly one primitive below is invoked.
pub fn execute(world: &mut World, actor: EntityId, command: Command) -> Result<bool, ActionError> {
    match command {
        Command::Walk { offset } => {
            let Some(from) = world.position_of(actor) else {
                return Ok(false);
            };
            move_actor(world, actor, from.step(offset))
        }
        Command::Wait => Ok(pause()),
        Command::Grab => Ok(grab(world, actor)),
        Command::DropItem { slot } => Ok(drop_item(world, actor, slot)),
        Command::UseItem { slot, target } => use_item(world, actor, slot, target),
    }
}

/// Attempts to move an actor to an adjacent (or any) destination tile.
///
/// Passability is judged before collisions, so a bump attack that kills the
/// blocker does not also step into the freed tile, while a passable occupant
/// displaced by the collision does make way within the same attempt. A
/// collision counts the attempt as acted even when no movement happens.
pub fn move_actor(world: &mut World, actor: EntityId, to: Position) -> Result<bool, ActionError> {
    let Some(from) = world.position_of(actor) else {
        return Ok(false);
    };
    let can_enter = world.entrance_possible(to);

    let mut collided = false;
    if let Some(occupant) = world.occupant_or_empty(Layer::Actors, to)
        && occupant != actor
        && world.entity(occupant).is_some_and(|e| e.is_actor())
    {
        collided = collide(world, occupant, actor);
    }

    if can_enter {
        world.relocate(Layer::Actors, from, to)?;
        world.push_event(GameEvent::new(EventKind::Moved, Some(actor), Some(to)));
        return Ok(true);
    }
    Ok(collided)
}

/// Spend the turn doing nothing. Always an action.
pub fn pause() -> bool {
    true
}

/// Resolves one collision between a tile's occupant and a mover.
///
/// Combat case: the mover's damage lands on the occupant, and only that way
/// round; walking into someone hurts them, not you. Non-combat case (either
/// side lacks a fighter): the occupant is displaced to the configured
/// fallback tile when that tile admits it. The collision is handled either
/// way.
pub fn collide(world: &mut World, this: EntityId, other: EntityId) -> bool {
    let this_fights = world.entity(this).is_some_and(|e| e.is_combat_capable());
    let other_damage = world
        .entity(other)
        .and_then(|e| e.fighter)
        .map(|f| f.damage);

    if let (true, Some(damage)) = (this_fights, other_damage) {
        let location = world.position_of(this);
        world.push_event(GameEvent::new(EventKind::Attacked, Some(other), location));
        let outcome = world
            .entity_mut(this)
            .and_then(|e| e.fighter.as_mut())
            .map(|f| f.apply_damage(damage));
        if outcome == Some(crate::state::DamageOutcome::Destroyed) {
            world.destroy_entity(this);
        }
        return true;
    }

    // Non-combat collision: shove the occupant out of the way.
    let fallback = world.config.fallback_tile;
    let name = world
        .entity(this)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    if world.entrance_possible(fallback)
        && let Some(placement) = world.entity(this).and_then(|e| e.placement)
        && world
            .relocate(placement.layer, placement.position, fallback)
            .is_ok()
    {
        world.extend_log(format!("The {name} is knocked away"));
    } else {
        world.extend_log(format!("The {name} has nowhere to go"));
    }
    true
}

/// Picks up the item lying on the actor's own tile.
pub fn grab(world: &mut World, actor: EntityId) -> bool {
    let Some(position) = world.position_of(actor) else {
        return false;
    };
    let Some(item) = world.occupant_or_empty(Layer::Items, position) else {
        return false;
    };
    let has_room = world
        .entity(actor)
        .and_then(|e| e.inventory.as_ref())
        .is_some_and(|inventory| !inventory.is_full());
    if !has_room {
        return false;
    }
    world.remove_from_play(item);
    if let Some(inventory) = world.entity_mut(actor).and_then(|e| e.inventory.as_mut()) {
        inventory.insert(item);
    }
    world.push_event(GameEvent::new(
        EventKind::PickedUp,
        Some(item),
        Some(position),
    ));
    true
}

/// Drops the item in `slot` onto the actor's tile, if that tile's item
/// layer is free.
pub fn drop_item(world: &mut World, actor: EntityId, slot: InventorySlot) -> bool {
    let Some(position) = world.position_of(actor) else {
        return false;
    };
    let carried = world
        .entity(actor)
        .and_then(|e| e.inventory.as_ref())
        .and_then(|inventory| inventory.get(slot.index()));
    let Some(item) = carried else {
        return false;
    };
    if world.occupant_or_empty(Layer::Items, position).is_some() {
        world.extend_log("There is no room here to drop that");
        return false;
    }
    if let Some(inventory) = world.entity_mut(actor).and_then(|e| e.inventory.as_mut()) {
        inventory.remove(slot.index());
    }
    if world.place_existing(item, Layer::Items, position).is_ok() {
        world.push_event(GameEvent::new(
            EventKind::Dropped,
            Some(item),
            Some(position),
        ));
        return true;
    }
    false
}

/// Uses the single-use item in `slot`, resolving its target.
///
/// Fighter effects default to the user; tile effects default to the user's
/// own tile unless the effect demands an explicit target, in which case the
/// attempt is refused with a log line. Firing a tile effect anywhere but
/// underfoot is a shot: it costs one round of ammo and emits `Shot`.
/// The item is consumed only when the effect took hold.
pub fn use_item(
    world: &mut World,
    actor: EntityId,
    slot: InventorySlot,
    target: Option<EffectTarget>,
) -> Result<bool, ActionError> {
    let carried = world
        .entity(actor)
        .and_then(|e| e.inventory.as_ref())
        .and_then(|inventory| inventory.get(slot.index()));
    let Some(item) = carried else {
        return Ok(false);
    };
    let effect = match world.entity(item).map(|e| &e.kind) {
        Some(EntityKind::Item { effect }) => effect.clone(),
        _ => return Ok(false),
    };

    let applied = match &effect {
        Effect::Fighter(_) => {
            let target_id = match target {
                Some(EffectTarget::Fighter(id)) => id,
                Some(EffectTarget::Tile(_)) => {
                    return Err(EffectError::TargetKind {
                        expected: TargetKind::Fighter,
                        supplied: TargetKind::Tile,
                    }
                    .into());
                }
                None => actor,
            };
            effect.apply_to_fighter(world, target_id)?
        }
        Effect::Tile(tile_effect) => {
            let own_tile = world.position_of(actor);
            let location = match target {
                Some(EffectTarget::Tile(position)) => position,
                Some(EffectTarget::Fighter(_)) => {
                    return Err(EffectError::TargetKind {
                        expected: TargetKind::Tile,
                        supplied: TargetKind::Fighter,
                    }
                    .into());
                }
                None if tile_effect.requires_targeting => {
                    world.extend_log("You really do not want to set that off underfoot");
                    return Ok(false);
                }
                None => match own_tile {
                    Some(position) => position,
                    None => return Ok(false),
                },
            };

            let is_shot = own_tile.is_some_and(|own| own != location);
            if is_shot {
                let fired = world
                    .entity_mut(actor)
                    .and_then(|e| e.fighter.as_mut())
                    .is_some_and(|f| f.spend_ammo());
                if !fired {
                    world.extend_log("Out of ammo");
                    return Ok(false);
                }
                world.push_event(GameEvent::new(EventKind::Shot, Some(actor), Some(location)));
            }
            effect.apply_to_tile(world, location)?
        }
    };

    if applied {
        world.consume_item(actor, slot.index());
    }
    Ok(applied)
}
