//! Autonomous construction behaviors, stored beside the entity registry.
//!
//! Constructions act after every actor has taken its turn. A behavior is
//! taken out of the world's side map for the duration of its tick and put
//! back afterwards, so it can freely mutate the world without aliasing its
//! own storage.

use crate::effect::TileEffect;
use crate::state::{ActorTemplate, EntityId, EventKind, GameEvent, Layer, World};

#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionBehavior {
    Spawner(Spawner),
    Trap(Trap),
}

impl ConstructionBehavior {
    /// Runs one turn of this behavior for the construction `id`.
    pub fn tick(&mut self, world: &mut World, id: EntityId) {
        match self {
            ConstructionBehavior::Spawner(spawner) => spawner.tick(world, id),
            ConstructionBehavior::Trap(trap) => trap.tick(world, id),
        }
    }
}

/// Periodically spawns an actor on its own tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    frequency: u32,
    counter: u32,
    template: Box<ActorTemplate>,
}

impl Spawner {
    pub fn new(frequency: u32, template: ActorTemplate) -> Self {
        Self {
            frequency: frequency.max(1),
            counter: 0,
            template: Box::new(template),
        }
    }

    /// Counts turns; on every `frequency`-th, spawns the template actor on
    /// the cell above the construction if no actor stands there. A blocked
    /// spawn is forfeited, not deferred.
    fn tick(&mut self, world: &mut World, id: EntityId) {
        self.counter += 1;
        if self.counter < self.frequency {
            return;
        }
        self.counter = 0;

        let Some(position) = world.position_of(id) else {
            return;
        };
        if world.occupant_or_empty(Layer::Actors, position).is_some() {
            return;
        }
        if let Ok(spawned) = world.spawn_actor(&self.template, position) {
            world.push_event(GameEvent::new(
                EventKind::ActorSpawned,
                Some(spawned),
                Some(position),
            ));
            world.extend_log(format!("A {} crawls out", self.template.name));
        }
    }
}

/// A pressure trigger that detonates under the first actor to stand on it.
///
/// The trap arms one turn after placement, so the actor that lays it can
/// step away before it goes live.
#[derive(Clone, Debug, PartialEq)]
pub struct Trap {
    effect: TileEffect,
    primed: bool,
}

impl Trap {
    pub fn new(effect: TileEffect) -> Self {
        Self {
            effect,
            primed: false,
        }
    }

    fn tick(&mut self, world: &mut World, id: EntityId) {
        if !self.primed {
            self.primed = true;
            return;
        }
        let Some(position) = world.position_of(id) else {
            return;
        };
        if world.occupant_or_empty(Layer::Actors, position).is_none() {
            return;
        }

        let name = world
            .entity(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| "trap".to_string());
        world.extend_log(format!("The {name} goes off"));
        world.push_event(GameEvent::new(
            EventKind::WasDestroyed,
            Some(id),
            Some(position),
        ));
        // Remove the trap before the blast so it is not among its own victims.
        world.remove_from_play(id);
        self.effect.apply(world, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Controller, MeleeAi};
    use crate::state::{ConstructionTemplate, Entity, EntityKind, Fighter, Position};

    fn spawner_template() -> ActorTemplate {
        ActorTemplate::new("thug", Fighter::new(3, 1), Controller::MeleeAi(MeleeAi::new()))
    }

    fn tick_constructions(world: &mut World) {
        for id in world.behavior_ids() {
            if let Some(mut behavior) = world.take_behavior(id) {
                behavior.tick(world, id);
                world.put_back_behavior(id, behavior);
            }
        }
    }

    #[test]
    fn spawner_waits_for_its_frequency() {
        let mut world = World::new(5, 5, 3);
        let template = ConstructionTemplate::new("Camp")
            .with_passable(true)
            .with_behavior(ConstructionBehavior::Spawner(Spawner::new(
                3,
                spawner_template(),
            )));
        world.spawn_construction(&template, Position::new(2, 2)).unwrap();

        tick_constructions(&mut world);
        tick_constructions(&mut world);
        assert!(world.roster().is_empty());

        tick_constructions(&mut world);
        assert_eq!(world.roster().len(), 1);
        let spawned = world.roster()[0];
        assert_eq!(world.position_of(spawned), Some(Position::new(2, 2)));
    }

    #[test]
    fn spawner_skips_occupied_cell_without_deferring() {
        let mut world = World::new(5, 5, 3);
        let template = ConstructionTemplate::new("Camp")
            .with_passable(true)
            .with_behavior(ConstructionBehavior::Spawner(Spawner::new(
                1,
                spawner_template(),
            )));
        world.spawn_construction(&template, Position::new(2, 2)).unwrap();
        let blocker = world
            .add(
                Entity::new("guard", EntityKind::Actor)
                    .with_passable(false)
                    .with_fighter(Fighter::new(5, 1)),
                Layer::Actors,
                Position::new(2, 2),
            )
            .unwrap();

        tick_constructions(&mut world);
        assert_eq!(world.roster(), &[blocker]);

        world.delete(Layer::Actors, Position::new(2, 2)).unwrap();
        tick_constructions(&mut world);
        assert_eq!(world.roster().len(), 1);
        assert_ne!(world.roster()[0], blocker);
    }

    #[test]
    fn trap_never_fires_on_its_first_turn() {
        let mut world = World::new(5, 5, 3);
        let mine = ConstructionTemplate::new("Mine")
            .with_passable(true)
            .with_behavior(ConstructionBehavior::Trap(Trap::new(TileEffect::explode(4))));
        let mine_id = world.spawn_construction(&mine, Position::new(2, 2)).unwrap();
        let victim = world
            .add(
                Entity::new("victim", EntityKind::Actor)
                    .with_passable(false)
                    .with_fighter(Fighter::new(10, 1)),
                Layer::Actors,
                Position::new(2, 2),
            )
            .unwrap();

        tick_constructions(&mut world);
        assert!(world.position_of(mine_id).is_some());
        assert_eq!(
            world.entity(victim).unwrap().fighter.unwrap().hp.current,
            10
        );

        tick_constructions(&mut world);
        assert_eq!(world.position_of(mine_id), None);
        assert_eq!(world.entity(victim).unwrap().fighter.unwrap().hp.current, 6);
    }

    #[test]
    fn armed_trap_stays_quiet_until_stepped_on() {
        let mut world = World::new(5, 5, 3);
        let mine = ConstructionTemplate::new("Mine")
            .with_passable(true)
            .with_behavior(ConstructionBehavior::Trap(Trap::new(TileEffect::explode(4))));
        let mine_id = world.spawn_construction(&mine, Position::new(2, 2)).unwrap();

        for _ in 0..5 {
            tick_constructions(&mut world);
        }
        assert!(world.position_of(mine_id).is_some());
    }
}
