//! The piece depot: named constructors for everything a scenario can place.
//!
//! Stats live here, not in the core; the simulation only sees the resulting
//! templates. Numbers are tuned for the stock scenarios and are exposed as
//! plain constructors so hosts can derive their own variants.

use outpost_core::{
    ActorTemplate, ConstructionBehavior, ConstructionTemplate, Controller, Effect, Entity,
    EntityKind, Fighter, FighterEffect, ItemTemplate, MeleeAi, PlayerController, RangedAi,
    Spawner, TileEffect, Trap,
};
use serde::{Deserialize, Serialize};

/// Everything a scenario placement can name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    // Actors
    Player,
    Thug,
    Chassis,
    Gunner,
    Flag,
    // Constructions
    Wall,
    Tree,
    Hole,
    Mine,
    Spawner { frequency: u32, spawns: Box<Piece> },
    // Items
    Bottle,
    AmmoCrate,
    Rocket,
    Landmine,
}

/// Stock stats and factories.
pub struct Depot;

impl Depot {
    // ===== actors =====

    /// The player: sturdy, roomy pack, rifle ammo for rockets.
    pub fn player() -> ActorTemplate {
        ActorTemplate::new(
            "Player",
            Fighter::new(30, 4).with_ammo(10, 10),
            Controller::Player(PlayerController::new()),
        )
        .with_sprite("Player.png")
        .with_volume(10)
    }

    /// Basic melee mook.
    pub fn thug() -> ActorTemplate {
        ActorTemplate::new("Thug", Fighter::new(10, 2), Controller::MeleeAi(MeleeAi::new()))
            .with_sprite("Thug.png")
    }

    /// Slow armored walker; hits harder than a thug.
    pub fn chassis() -> ActorTemplate {
        ActorTemplate::new(
            "Chassis",
            Fighter::new(15, 3).with_defense(1),
            Controller::MeleeAi(MeleeAi::new()),
        )
        .with_sprite("Chassis.png")
    }

    /// Rocketeer: shoots while it has ammo and rockets, brawls after.
    pub fn gunner() -> ActorTemplate {
        ActorTemplate::new(
            "Gunner",
            Fighter::new(12, 2).with_ammo(5, 5),
            Controller::RangedAi(RangedAi::new()),
        )
        .with_sprite("Gunner.png")
        .with_volume(2)
        .with_items(vec![Self::rocket(), Self::rocket()])
    }

    /// Objective marker. No fighter, no controller; collisions shove it to
    /// the fallback tile.
    pub fn flag() -> Entity {
        Entity::new("Flag", EntityKind::Actor)
            .with_passable(true)
            .with_sprite("Flag.png")
    }

    // ===== constructions =====

    /// Destructible blocking wall.
    pub fn wall() -> ConstructionTemplate {
        ConstructionTemplate::new("Wall")
            .with_sprite("Wall.png")
            .with_fighter(Fighter::new(20, 0))
    }

    /// Destructible soft cover.
    pub fn tree() -> ConstructionTemplate {
        ConstructionTemplate::new("Tree")
            .with_sprite("Tree.png")
            .with_fighter(Fighter::new(8, 0))
    }

    pub fn hole() -> ConstructionTemplate {
        ConstructionTemplate::hole()
    }

    /// Armed mine sitting on the ground. Steppable, regrettably.
    pub fn mine() -> ConstructionTemplate {
        ConstructionTemplate::new("Mine")
            .with_sprite("Mine.png")
            .with_passable(true)
            .with_air_passable(true)
            .with_behavior(ConstructionBehavior::Trap(Trap::new(TileEffect::explode(
                Self::MINE_DAMAGE,
            ))))
    }

    /// Periodically releases one actor of the given template onto itself.
    pub fn spawner(frequency: u32, spawns: ActorTemplate) -> ConstructionTemplate {
        ConstructionTemplate::new("Spawner")
            .with_sprite("Spawner.png")
            .with_passable(true)
            .with_air_passable(true)
            .with_fighter(Fighter::new(25, 0))
            .with_behavior(ConstructionBehavior::Spawner(Spawner::new(frequency, spawns)))
    }

    // ===== items =====

    pub const BOTTLE_HEAL_MIN: u32 = 2;
    pub const BOTTLE_HEAL_MAX: u32 = 7;
    pub const AMMO_CRATE_ROUNDS: u32 = 5;
    pub const ROCKET_DAMAGE: u32 = 10;
    pub const MINE_DAMAGE: u32 = 10;

    /// Mystery bottle; heals a random amount when drunk.
    pub fn bottle() -> ItemTemplate {
        ItemTemplate::new(
            "Bottle",
            Effect::Fighter(FighterEffect::heal(Self::BOTTLE_HEAL_MIN, Self::BOTTLE_HEAL_MAX)),
        )
        .with_sprite("Bottle.png")
    }

    pub fn ammo_crate() -> ItemTemplate {
        ItemTemplate::new(
            "AmmoCrate",
            Effect::Fighter(FighterEffect::restore_ammo(Self::AMMO_CRATE_ROUNDS)),
        )
        .with_sprite("AmmoCrate.png")
    }

    /// Fired at a tile; refuses to detonate underfoot.
    pub fn rocket() -> ItemTemplate {
        ItemTemplate::new("Rocket", Effect::Tile(TileEffect::explode(Self::ROCKET_DAMAGE)))
            .with_sprite("Rocket.png")
    }

    /// Plants a mine on the user's own tile.
    pub fn landmine() -> ItemTemplate {
        ItemTemplate::new(
            "Landmine",
            Effect::Tile(TileEffect::spawn_construction(Self::mine())),
        )
        .with_sprite("Landmine.png")
    }

    /// Resolves a piece name to an actor template, for actor pieces.
    pub fn actor(piece: &Piece) -> Option<ActorTemplate> {
        match piece {
            Piece::Player => Some(Self::player()),
            Piece::Thug => Some(Self::thug()),
            Piece::Chassis => Some(Self::chassis()),
            Piece::Gunner => Some(Self::gunner()),
            _ => None,
        }
    }

    pub fn construction(piece: &Piece) -> Option<ConstructionTemplate> {
        match piece {
            Piece::Wall => Some(Self::wall()),
            Piece::Tree => Some(Self::tree()),
            Piece::Hole => Some(Self::hole()),
            Piece::Mine => Some(Self::mine()),
            Piece::Spawner { frequency, spawns } => {
                let template = Self::actor(spawns)?;
                Some(Self::spawner(*frequency, template))
            }
            _ => None,
        }
    }

    pub fn item(piece: &Piece) -> Option<ItemTemplate> {
        match piece {
            Piece::Bottle => Some(Self::bottle()),
            Piece::AmmoCrate => Some(Self::ammo_crate()),
            Piece::Rocket => Some(Self::rocket()),
            Piece::Landmine => Some(Self::landmine()),
            _ => None,
        }
    }
}
