//! Event listeners: the session-level consequences of simulation events.
//!
//! Listeners observe drained events and return signals instead of mutating
//! the world, so all world mutation stays inside the core.

use outpost_core::{EntityId, EventKind, GameEvent, Position, World};

/// What a listener wants the session to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    /// The player is gone; the session ends.
    GameOver,
    /// The player walked off an edge toward the named adjacent map.
    SwitchMap { direction: String, map_id: String },
}

pub trait Listener {
    fn on_event(&mut self, world: &World, event: &GameEvent) -> Option<SessionSignal>;
}

/// Ends the session when the watched actor is destroyed.
#[derive(Clone, Copy, Debug)]
pub struct DeathListener {
    watched: EntityId,
}

impl DeathListener {
    pub fn new(watched: EntityId) -> Self {
        Self { watched }
    }
}

impl Listener for DeathListener {
    fn on_event(&mut self, _world: &World, event: &GameEvent) -> Option<SessionSignal> {
        if event.kind == EventKind::WasDestroyed && event.actor == Some(self.watched) {
            Some(SessionSignal::GameOver)
        } else {
            None
        }
    }
}

/// Signals a map switch when the watched actor steps onto a border tile
/// that has a registered neighbour in that direction.
#[derive(Clone, Copy, Debug)]
pub struct BorderWalkListener {
    watched: EntityId,
}

impl BorderWalkListener {
    pub fn new(watched: EntityId) -> Self {
        Self { watched }
    }

    fn edge_direction(world: &World, position: Position) -> Option<&'static str> {
        if position.x == 0 {
            Some("west")
        } else if position.x == world.width() as i32 - 1 {
            Some("east")
        } else if position.y == 0 {
            Some("north")
        } else if position.y == world.height() as i32 - 1 {
            Some("south")
        } else {
            None
        }
    }
}

impl Listener for BorderWalkListener {
    fn on_event(&mut self, world: &World, event: &GameEvent) -> Option<SessionSignal> {
        if event.kind != EventKind::Moved || event.actor != Some(self.watched) {
            return None;
        }
        let direction = Self::edge_direction(world, event.location?)?;
        let map_id = world.neighbour_map(direction)?;
        Some(SessionSignal::SwitchMap {
            direction: direction.to_string(),
            map_id: map_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(actor: EntityId, to: Position) -> GameEvent {
        GameEvent::new(EventKind::Moved, Some(actor), Some(to))
    }

    #[test]
    fn death_listener_only_triggers_on_its_actor() {
        let world = World::new(3, 3, 0);
        let mut listener = DeathListener::new(EntityId(7));

        let other = GameEvent::new(EventKind::WasDestroyed, Some(EntityId(8)), None);
        assert_eq!(listener.on_event(&world, &other), None);

        let own = GameEvent::new(EventKind::WasDestroyed, Some(EntityId(7)), None);
        assert_eq!(listener.on_event(&world, &own), Some(SessionSignal::GameOver));
    }

    #[test]
    fn border_walk_requires_a_registered_neighbour() {
        let mut world = World::new(4, 4, 0);
        let mut listener = BorderWalkListener::new(EntityId(0));

        // East edge with no neighbour registered: nothing happens.
        let step = moved(EntityId(0), Position::new(3, 2));
        assert_eq!(listener.on_event(&world, &step), None);

        world.set_neighbour_map("east", "quarry");
        assert_eq!(
            listener.on_event(&world, &step),
            Some(SessionSignal::SwitchMap {
                direction: "east".to_string(),
                map_id: "quarry".to_string(),
            })
        );

        // Interior tile never signals.
        let inner = moved(EntityId(0), Position::new(2, 2));
        assert_eq!(listener.on_event(&world, &inner), None);
    }
}
