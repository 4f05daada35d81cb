//! Scenario system: declarative world setup.
//!
//! A scenario names the grid dimensions and a list of piece placements;
//! building it yields a fully populated `World`. Keeping placement data
//! separate from piece stats lets one map ship with several difficulty
//! loadouts.

use std::collections::BTreeMap;
use std::path::Path;

use outpost_core::{Entity, EntityKind, Layer, Position, World};
use serde::{Deserialize, Serialize};

use crate::depot::{Depot, Piece};
use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlacement {
    pub position: Position,
    pub piece: Piece,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub seed: u64,
    /// Shown once when the player enters this map.
    #[serde(default)]
    pub entrance_message: Option<String>,
    /// Edge direction ("north", ...) to adjacent scenario name.
    #[serde(default)]
    pub neighbours: BTreeMap<String, String>,
    pub placements: Vec<ScenarioPlacement>,
}

impl Scenario {
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| RuntimeError::Parse {
            what: "scenario",
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Instantiates the scenario into a world.
    ///
    /// The whole grid gets a passable ground tile first, then the placements
    /// land in order; a later placement on the same cell and layer evicts
    /// the earlier one, matching grid overwrite semantics.
    pub fn build(&self) -> Result<World> {
        if self.width == 0 || self.height == 0 {
            return Err(self.invalid("grid dimensions must be non-zero"));
        }
        let mut world = World::new(self.width, self.height, self.seed);
        tracing::info!(
            scenario = %self.name,
            width = self.width,
            height = self.height,
            placements = self.placements.len(),
            "building world from scenario"
        );

        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                world
                    .add(
                        Entity::new("Ground", EntityKind::Ground).with_sprite("Ground.png"),
                        Layer::Ground,
                        Position::new(x, y),
                    )
                    .map_err(|e| self.invalid(e.to_string()))?;
            }
        }

        for placement in &self.placements {
            self.place(&mut world, placement)?;
        }

        for (direction, map_id) in &self.neighbours {
            world.set_neighbour_map(direction.clone(), map_id.clone());
        }
        if let Some(message) = &self.entrance_message {
            world.set_entrance_message(message.clone());
        }
        Ok(world)
    }

    fn place(&self, world: &mut World, placement: &ScenarioPlacement) -> Result<()> {
        let position = placement.position;
        if let Some(template) = Depot::actor(&placement.piece) {
            world
                .spawn_actor(&template, position)
                .map_err(|e| self.invalid(e.to_string()))?;
        } else if let Some(template) = Depot::construction(&placement.piece) {
            world
                .spawn_construction(&template, position)
                .map_err(|e| self.invalid(e.to_string()))?;
        } else if let Some(template) = Depot::item(&placement.piece) {
            world
                .spawn_item(&template, position)
                .map_err(|e| self.invalid(e.to_string()))?;
        } else if placement.piece == Piece::Flag {
            world
                .add(Depot::flag(), Layer::Actors, position)
                .map_err(|e| self.invalid(e.to_string()))?;
        } else {
            return Err(self.invalid(format!("piece {:?} cannot be placed", placement.piece)));
        }
        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::InvalidScenario {
            name: self.name.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skirmish() -> Scenario {
        Scenario {
            name: "skirmish".to_string(),
            width: 5,
            height: 5,
            seed: 9,
            entrance_message: Some("It smells of oil here".to_string()),
            neighbours: BTreeMap::from([("east".to_string(), "quarry".to_string())]),
            placements: vec![
                ScenarioPlacement {
                    position: Position::new(1, 1),
                    piece: Piece::Player,
                },
                ScenarioPlacement {
                    position: Position::new(3, 3),
                    piece: Piece::Thug,
                },
                ScenarioPlacement {
                    position: Position::new(2, 2),
                    piece: Piece::Wall,
                },
                ScenarioPlacement {
                    position: Position::new(4, 4),
                    piece: Piece::Bottle,
                },
            ],
        }
    }

    #[test]
    fn build_populates_every_layer() {
        let world = skirmish().build().unwrap();
        assert_eq!(world.roster().len(), 2);
        assert!(world.player().is_some());
        assert!(world.occupant_or_empty(Layer::Constructions, Position::new(2, 2)).is_some());
        assert!(world.occupant_or_empty(Layer::Items, Position::new(4, 4)).is_some());
        assert!(world.occupant_or_empty(Layer::Ground, Position::new(0, 0)).is_some());
        assert_eq!(world.neighbour_map("east"), Some("quarry"));
        assert_eq!(world.entrance_message(), Some("It smells of oil here"));
    }

    #[test]
    fn player_leads_the_roster_regardless_of_placement_order() {
        let mut scenario = skirmish();
        scenario.placements.reverse();
        let world = scenario.build().unwrap();
        let front = world.roster()[0];
        assert_eq!(world.player(), Some(front));
        assert_eq!(world.entity(front).unwrap().name, "Player");
    }

    #[test]
    fn out_of_bounds_placement_is_invalid() {
        let mut scenario = skirmish();
        scenario.placements.push(ScenarioPlacement {
            position: Position::new(40, 1),
            piece: Piece::Thug,
        });
        assert!(matches!(
            scenario.build(),
            Err(RuntimeError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn scenario_round_trips_through_json() {
        let scenario = skirmish();
        let json = serde_json::to_string_pretty(&scenario).unwrap();
        assert_eq!(Scenario::from_json(&json).unwrap(), scenario);
    }
}
