use std::collections::BTreeMap;

use super::{
    ActorTemplate, ConstructionTemplate, Entity, EntityId, EntityKind, EventKind, EventLog,
    GameEvent, Grid, GridError, ItemTemplate, Layer, Position,
};
use crate::behavior::ConstructionBehavior;
use crate::config::GameConfig;
use crate::controller::Controller;
use crate::rng::{PcgRng, RngOracle, compute_seed};

/// The explicit world context: grid, entity registry, controller and
/// behavior side maps, turn rosters, event log and the RNG cursor.
///
/// Everything that mutates simulation state goes through this object; there
/// is no ambient global. Controllers and construction behaviors live in side
/// maps keyed by entity id, which keeps the Actor/Controller relation
/// non-owning and cycle-free.
#[derive(Clone, Debug)]
pub struct World {
    pub config: GameConfig,
    grid: Grid,
    entities: BTreeMap<EntityId, Entity>,
    controllers: BTreeMap<EntityId, Controller>,
    behaviors: BTreeMap<EntityId, ConstructionBehavior>,
    roster: Vec<EntityId>,
    construction_roster: Vec<EntityId>,
    events: EventLog,
    next_id: u32,
    turn: u64,
    game_seed: u64,
    nonce: u64,
    neighbour_maps: BTreeMap<String, String>,
    entrance_message: Option<String>,
}

impl World {
    pub fn new(width: u32, height: u32, game_seed: u64) -> Self {
        Self {
            config: GameConfig::default(),
            grid: Grid::new(width, height),
            entities: BTreeMap::new(),
            controllers: BTreeMap::new(),
            behaviors: BTreeMap::new(),
            roster: Vec::new(),
            construction_roster: Vec::new(),
            events: EventLog::new(),
            next_id: 0,
            turn: 0,
            game_seed,
            nonce: 0,
            neighbour_maps: BTreeMap::new(),
            entrance_message: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    // ========================================================================
    // Registry access
    // ========================================================================

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.entity(id).and_then(Entity::position)
    }

    pub fn controller(&self, id: EntityId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    /// Detaches the controller for the duration of a turn resolution.
    /// Pair with [`World::put_back_controller`].
    pub fn take_controller(&mut self, id: EntityId) -> Option<Controller> {
        self.controllers.remove(&id)
    }

    /// Reattaches a controller taken for resolution, unless its actor was
    /// removed from play mid-turn (blew itself up, for instance).
    pub fn put_back_controller(&mut self, id: EntityId, controller: Controller) {
        if self.entities.contains_key(&id) && self.roster.contains(&id) {
            self.controllers.insert(id, controller);
        }
    }

    /// Attaches a controller, replacing any previous one. Exactly one
    /// controller drives an actor.
    pub fn attach_controller(&mut self, id: EntityId, controller: Controller) {
        self.controllers.insert(id, controller);
    }

    pub fn is_player_controlled(&self, id: EntityId) -> bool {
        matches!(self.controllers.get(&id), Some(Controller::Player(_)))
    }

    pub fn behavior_ids(&self) -> Vec<EntityId> {
        self.construction_roster
            .iter()
            .copied()
            .filter(|id| self.behaviors.contains_key(id))
            .collect()
    }

    pub fn take_behavior(&mut self, id: EntityId) -> Option<ConstructionBehavior> {
        self.behaviors.remove(&id)
    }

    pub fn put_back_behavior(&mut self, id: EntityId, behavior: ConstructionBehavior) {
        if self.entities.contains_key(&id) && self.construction_roster.contains(&id) {
            self.behaviors.insert(id, behavior);
        }
    }

    // ========================================================================
    // Grid operations
    // ========================================================================

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.grid.contains(position)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("EntityId overflow");
        id
    }

    /// Places an entity on the grid, registering it in the world.
    ///
    /// Overwrites any prior occupant of the cell (the evicted entity leaves
    /// play but stays in the registry for event consumers). Actors join the
    /// turn roster, player-controlled ones at the front; constructions join
    /// the construction roster. Out-of-bounds locations are an error.
    pub fn add(
        &mut self,
        entity: Entity,
        layer: Layer,
        position: Position,
    ) -> Result<EntityId, GridError> {
        let id = self.allocate_id();
        self.entities.insert(id, entity);
        self.place_existing(id, layer, position)?;
        Ok(id)
    }

    /// Places an already-registered entity (one sitting in an inventory or
    /// newly instantiated) onto the grid.
    pub fn place_existing(
        &mut self,
        id: EntityId,
        layer: Layer,
        position: Position,
    ) -> Result<(), GridError> {
        let evicted = self.grid.place(id, layer, position)?;
        if let Some(evicted) = evicted
            && evicted != id
        {
            self.unregister(evicted);
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.placement = Some(super::Placement { layer, position });
            match entity.kind {
                EntityKind::Actor => {
                    if !self.roster.contains(&id) {
                        if self.is_player_controlled(id) {
                            self.roster.insert(0, id);
                        } else {
                            self.roster.push(id);
                        }
                    }
                }
                EntityKind::Construction => {
                    if !self.construction_roster.contains(&id) {
                        self.construction_roster.push(id);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Moves whatever occupies a cell to another cell. No legality check;
    /// passability and collisions are resolved by the action layer first.
    pub fn relocate(&mut self, layer: Layer, from: Position, to: Position) -> Result<(), GridError> {
        if let Some(moved) = self.grid.relocate(layer, from, to)?
            && let Some(entity) = self.entities.get_mut(&moved)
        {
            entity.placement = Some(super::Placement { layer, position: to });
        }
        Ok(())
    }

    pub fn get(&self, layer: Layer, position: Position) -> Result<Option<EntityId>, GridError> {
        self.grid.occupant(layer, position)
    }

    pub fn has(&self, layer: Layer, position: Position) -> Result<bool, GridError> {
        self.grid.is_occupied(layer, position)
    }

    /// Scan-safe lookup: out of bounds reads as nothing there.
    pub fn occupant_or_empty(&self, layer: Layer, position: Position) -> Option<EntityId> {
        self.grid.occupant_or_empty(layer, position)
    }

    /// Clears a cell; the removed entity leaves the rosters too.
    pub fn delete(&mut self, layer: Layer, position: Position) -> Result<Option<EntityId>, GridError> {
        let removed = self.grid.clear(layer, position)?;
        if let Some(id) = removed {
            self.unregister(id);
        }
        Ok(removed)
    }

    /// Takes an entity out of play wherever it currently sits.
    pub fn remove_from_play(&mut self, id: EntityId) {
        if let Some(placement) = self.entities.get(&id).and_then(|e| e.placement) {
            // Only clear the cell if this entity still owns it.
            if self.grid.occupant_or_empty(placement.layer, placement.position) == Some(id) {
                let _ = self.grid.clear(placement.layer, placement.position);
            }
        }
        self.unregister(id);
    }

    fn unregister(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.placement = None;
        }
        self.roster.retain(|r| *r != id);
        self.construction_roster.retain(|r| *r != id);
        self.controllers.remove(&id);
        self.behaviors.remove(&id);
    }

    /// True iff the location is in bounds and every layer's occupant there
    /// is absent or passable.
    pub fn entrance_possible(&self, position: Position) -> bool {
        self.layered_entrance_check(position, |entity| entity.passable)
    }

    /// Same check against `air_passable`, used by flying/thrown things.
    pub fn air_entrance_possible(&self, position: Position) -> bool {
        self.layered_entrance_check(position, |entity| entity.air_passable)
    }

    fn layered_entrance_check(&self, position: Position, passable: impl Fn(&Entity) -> bool) -> bool {
        use strum::IntoEnumIterator;

        if !self.grid.contains(position) {
            return false;
        }
        for layer in Layer::iter() {
            if let Some(id) = self.grid.occupant_or_empty(layer, position)
                && let Some(entity) = self.entity(id)
                && !passable(entity)
            {
                return false;
            }
        }
        true
    }

    pub fn neighbor_positions(&self, position: Position) -> arrayvec::ArrayVec<Position, 8> {
        self.grid.neighbor_positions(position)
    }

    pub fn neighbors_of(&self, position: Position, layer: Layer) -> super::NeighborSlots {
        self.grid.neighbors_of(position, layer)
    }

    pub fn column_at(&self, position: Position) -> super::ColumnSlots {
        self.grid.column_at(position)
    }

    // ========================================================================
    // Turn rosters
    // ========================================================================

    /// Actors in stable turn order: player first, then insertion order.
    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    pub fn constructions(&self) -> &[EntityId] {
        &self.construction_roster
    }

    /// Completed turns since world creation.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// The roster-front actor, when it is player-controlled.
    pub fn player(&self) -> Option<EntityId> {
        self.roster
            .first()
            .copied()
            .filter(|id| self.is_player_controlled(*id))
    }

    // ========================================================================
    // Template instantiation
    // ========================================================================

    /// Spawns an actor from a template: entity, controller, carried items.
    pub fn spawn_actor(
        &mut self,
        template: &ActorTemplate,
        position: Position,
    ) -> Result<EntityId, GridError> {
        let mut entity = template.instantiate();
        let mut carried = Vec::with_capacity(template.items.len());
        for item_template in &template.items {
            let item_id = self.allocate_id();
            self.entities.insert(item_id, item_template.instantiate());
            carried.push(item_id);
        }
        for item_id in carried {
            let accepted = entity
                .inventory
                .as_mut()
                .is_some_and(|inventory| inventory.insert(item_id));
            if !accepted {
                // More starting items than volume; the surplus never existed.
                self.entities.remove(&item_id);
            }
        }
        let id = self.allocate_id();
        self.entities.insert(id, entity);
        // Attach before placement so the roster sees the controller kind.
        self.attach_controller(id, template.controller.clone());
        self.place_existing(id, Layer::Actors, position)?;
        Ok(id)
    }

    /// Spawns a construction from a template, wiring up its behavior if any.
    pub fn spawn_construction(
        &mut self,
        template: &ConstructionTemplate,
        position: Position,
    ) -> Result<EntityId, GridError> {
        let id = self.add(template.instantiate(), Layer::Constructions, position)?;
        if let Some(behavior) = &template.behavior {
            self.behaviors.insert(id, (**behavior).clone());
        }
        Ok(id)
    }

    pub fn spawn_item(
        &mut self,
        template: &ItemTemplate,
        position: Position,
    ) -> Result<EntityId, GridError> {
        self.add(template.instantiate(), Layer::Items, position)
    }

    /// Creates an item straight into an inventory. Returns None when the
    /// owner has no inventory or it is at volume.
    pub fn give_item(&mut self, owner: EntityId, template: &ItemTemplate) -> Option<EntityId> {
        let item_id = self.allocate_id();
        self.entities.insert(item_id, template.instantiate());
        let inventory = self.entities.get_mut(&owner)?.inventory.as_mut()?;
        if inventory.insert(item_id) {
            Some(item_id)
        } else {
            self.entities.remove(&item_id);
            None
        }
    }

    /// Removes an item from an inventory and drops it from the registry.
    /// Items are single-use; this is the "used up" half of the contract.
    pub fn consume_item(&mut self, owner: EntityId, slot: usize) -> Option<EntityId> {
        let inventory = self.entities.get_mut(&owner)?.inventory.as_mut()?;
        let item = inventory.remove(slot)?;
        self.entities.remove(&item);
        Some(item)
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Removes a destroyed combatant from play: logs `WasDestroyed`, drops
    /// what it carried onto its tile (while the items layer there is free)
    /// and clears its grid cell. Damage application happens elsewhere; this
    /// is the consequence half of the two-pass rule.
    pub fn destroy_entity(&mut self, id: EntityId) {
        let Some(placement) = self.entities.get(&id).and_then(|e| e.placement) else {
            self.unregister(id);
            return;
        };
        self.push_event(GameEvent::new(
            EventKind::WasDestroyed,
            Some(id),
            Some(placement.position),
        ));

        let dropped: Vec<EntityId> = self
            .entities
            .get_mut(&id)
            .and_then(|entity| entity.inventory.as_mut())
            .map(|inventory| inventory.take_all().into_iter().collect())
            .unwrap_or_default();
        for item_id in dropped {
            if self.occupant_or_empty(Layer::Items, placement.position).is_none()
                && self.place_existing(item_id, Layer::Items, placement.position).is_ok()
            {
                self.push_event(GameEvent::new(
                    EventKind::Dropped,
                    Some(item_id),
                    Some(placement.position),
                ));
            } else {
                // No room on the corpse tile; the item is lost with the body.
                self.entities.remove(&item_id);
            }
        }

        self.remove_from_play(id);
    }

    // ========================================================================
    // Events and log
    // ========================================================================

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.append(event);
    }

    pub fn extend_log(&mut self, line: impl Into<String>) {
        self.events.extend_log(line);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        self.events.pending()
    }

    pub fn log_lines(&self) -> &[String] {
        self.events.log_lines()
    }

    // ========================================================================
    // Randomness
    // ========================================================================

    fn next_seed(&mut self, context: u32) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, context);
        self.nonce += 1;
        seed
    }

    pub fn roll_percent(&mut self, context: u32) -> u32 {
        let seed = self.next_seed(context);
        PcgRng.roll_percent(seed)
    }

    pub fn roll_range(&mut self, context: u32, min: u32, max: u32) -> u32 {
        let seed = self.next_seed(context);
        PcgRng.range(seed, min, max)
    }

    pub fn pick_index(&mut self, context: u32, len: usize) -> usize {
        let seed = self.next_seed(context);
        PcgRng.pick_index(seed, len)
    }

    // ========================================================================
    // Map adjacency boundary
    // ========================================================================

    pub fn set_neighbour_map(&mut self, direction: impl Into<String>, map_id: impl Into<String>) {
        self.neighbour_maps.insert(direction.into(), map_id.into());
    }

    pub fn neighbour_map(&self, direction: &str) -> Option<&str> {
        self.neighbour_maps.get(direction).map(String::as_str)
    }

    pub fn set_entrance_message(&mut self, message: impl Into<String>) {
        self.entrance_message = Some(message.into());
    }

    pub fn entrance_message(&self) -> Option<&str> {
        self.entrance_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Controller, MeleeAi, PlayerController};
    use crate::state::Fighter;

    fn ground() -> Entity {
        Entity::new("Floor", EntityKind::Ground)
    }

    fn bare_actor(name: &str) -> Entity {
        Entity::new(name, EntityKind::Actor)
            .with_passable(false)
            .with_fighter(Fighter::new(5, 1))
    }

    #[test]
    fn add_registers_actor_in_roster() {
        let mut world = World::new(5, 5, 0);
        let a = world.add(bare_actor("a"), Layer::Actors, Position::new(1, 1)).unwrap();
        let b = world.add(bare_actor("b"), Layer::Actors, Position::new(2, 2)).unwrap();
        assert_eq!(world.roster(), &[a, b]);
    }

    #[test]
    fn player_controlled_actor_goes_to_roster_front() {
        let mut world = World::new(5, 5, 0);
        let npc = world.add(bare_actor("npc"), Layer::Actors, Position::new(2, 2)).unwrap();
        world.attach_controller(npc, Controller::MeleeAi(MeleeAi::new()));

        let mut pc_entity = bare_actor("pc");
        pc_entity.placement = None;
        let pc = world.allocate_id();
        world.entities.insert(pc, pc_entity);
        world.attach_controller(pc, Controller::Player(PlayerController::new()));
        world.place_existing(pc, Layer::Actors, Position::new(1, 1)).unwrap();

        assert_eq!(world.roster(), &[pc, npc]);
        assert_eq!(world.player(), Some(pc));
    }

    #[test]
    fn delete_removes_actor_from_roster() {
        let mut world = World::new(5, 5, 0);
        let a = world.add(bare_actor("a"), Layer::Actors, Position::new(1, 1)).unwrap();
        world.delete(Layer::Actors, Position::new(1, 1)).unwrap();
        assert!(world.roster().is_empty());
        assert_eq!(world.position_of(a), None);
    }

    #[test]
    fn entrance_blocked_by_impassable_occupant() {
        let mut world = World::new(5, 5, 0);
        world.add(ground(), Layer::Ground, Position::new(1, 1)).unwrap();
        assert!(world.entrance_possible(Position::new(1, 1)));
        world
            .add(
                Entity::new("Wall", EntityKind::Construction).with_passable(false),
                Layer::Constructions,
                Position::new(1, 1),
            )
            .unwrap();
        assert!(!world.entrance_possible(Position::new(1, 1)));
        assert!(!world.entrance_possible(Position::new(-1, 0)));
    }

    #[test]
    fn hole_blocks_ground_entry_but_not_air() {
        let mut world = World::new(5, 5, 0);
        world
            .spawn_construction(&ConstructionTemplate::hole(), Position::new(2, 2))
            .unwrap();
        assert!(!world.entrance_possible(Position::new(2, 2)));
        assert!(world.air_entrance_possible(Position::new(2, 2)));
    }

    #[test]
    fn destroy_entity_drops_carried_item() {
        use crate::effect::{Effect, FighterEffect};

        let mut world = World::new(5, 5, 0);
        let template = ActorTemplate::new(
            "carrier",
            Fighter::new(3, 1),
            Controller::MeleeAi(MeleeAi::new()),
        )
        .with_items(vec![ItemTemplate::new("Bottle", Effect::Fighter(FighterEffect::heal(2, 3)))]);
        let actor = world.spawn_actor(&template, Position::new(1, 1)).unwrap();

        world.destroy_entity(actor);

        let dropped = world.occupant_or_empty(Layer::Items, Position::new(1, 1));
        assert!(dropped.is_some());
        assert!(world.roster().is_empty());
        let kinds: Vec<_> = world.pending_events().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::WasDestroyed));
        assert!(kinds.contains(&EventKind::Dropped));
    }
}
