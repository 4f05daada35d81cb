use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use outpost_core::{Command, GameEvent, Layer, Position, World};
use outpost_runtime::{
    Bindings, Depot, Listener, Piece, RuntimeError, Scenario, ScenarioPlacement, Session,
    SessionSignal,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scenario(width: u32, height: u32, placements: Vec<(i32, i32, Piece)>) -> Scenario {
    Scenario {
        name: "test".to_string(),
        width,
        height,
        seed: 17,
        entrance_message: None,
        neighbours: BTreeMap::new(),
        placements: placements
            .into_iter()
            .map(|(x, y, piece)| ScenarioPlacement {
                position: Position::new(x, y),
                piece,
            })
            .collect(),
    }
}

/// Stashes every dispatched event for later inspection.
struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

impl Listener for Recorder {
    fn on_event(&mut self, _world: &World, event: &GameEvent) -> Option<SessionSignal> {
        self.0.borrow_mut().push(*event);
        None
    }
}

#[test]
fn waiting_next_to_a_thug_costs_the_players_hide() {
    init_tracing();
    let scenario = scenario(3, 3, vec![(0, 0, Piece::Player), (1, 1, Piece::Thug)]);
    let mut session = Session::from_scenario(&scenario).unwrap();
    let player = session.player().unwrap();

    let report = session.advance(Some(Command::Wait)).unwrap();
    assert!(report.player_acted);

    let world = session.world();
    let fighter = world.entity(player).unwrap().fighter.unwrap();
    // Thug damage landed on the player; the thug is untouched.
    assert_eq!(fighter.hp.current, fighter.hp.maximum - 2);
    let thug = world.roster()[1];
    let thug_fighter = world.entity(thug).unwrap().fighter.unwrap();
    assert_eq!(thug_fighter.hp.current, thug_fighter.hp.maximum);
}

#[test]
fn player_death_latches_the_session_shut() {
    let scenario = scenario(3, 3, vec![(0, 0, Piece::Player), (1, 1, Piece::Thug)]);
    let mut session = Session::from_scenario(&scenario).unwrap();
    let player = session.player().unwrap();

    // One more thug hit is lethal.
    session
        .world_mut()
        .entity_mut(player)
        .unwrap()
        .fighter
        .as_mut()
        .unwrap()
        .hp
        .current = 1;

    session.advance(Some(Command::Wait)).unwrap();
    assert!(session.is_over());
    assert_eq!(session.take_signals(), vec![SessionSignal::GameOver]);
    assert!(matches!(
        session.advance(Some(Command::Wait)),
        Err(RuntimeError::SessionOver)
    ));
}

#[test]
fn walking_onto_a_connected_border_signals_a_map_switch() {
    let mut scenario = scenario(4, 4, vec![(2, 2, Piece::Player)]);
    scenario
        .neighbours
        .insert("east".to_string(), "quarry".to_string());
    let mut session = Session::from_scenario(&scenario).unwrap();

    session.advance(Some(Command::walk(1, 0))).unwrap();
    assert_eq!(
        session.take_signals(),
        vec![SessionSignal::SwitchMap {
            direction: "east".to_string(),
            map_id: "quarry".to_string(),
        }]
    );
    assert!(!session.is_over());
}

#[test]
fn queued_symbol_drives_the_turn() {
    let scenario = scenario(3, 3, vec![(1, 1, Piece::Player)]);
    let mut session = Session::from_scenario(&scenario).unwrap();
    let bindings = Bindings::default();

    assert!(!session.queue_symbol('?', &bindings).unwrap());
    assert!(session.queue_symbol('l', &bindings).unwrap());
    let report = session.advance(None).unwrap();
    assert!(report.player_acted);

    let player = session.player().unwrap();
    assert_eq!(
        session.world().position_of(player),
        Some(Position::new(2, 1))
    );
}

#[test]
fn same_seed_and_commands_replay_the_same_events() {
    let build = || {
        scenario(
            5,
            5,
            vec![
                (1, 1, Piece::Player),
                (3, 3, Piece::Thug),
                (3, 1, Piece::Gunner),
                (2, 2, Piece::Bottle),
            ],
        )
    };
    let commands = [
        Command::walk(1, 1),
        Command::Grab,
        Command::use_item(0, None),
        Command::Wait,
        Command::walk(0, 1),
    ];

    let run = |scenario: &Scenario| -> Vec<GameEvent> {
        let mut session = Session::from_scenario(scenario).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        session.add_listener(Box::new(Recorder(Rc::clone(&events))));
        for command in commands {
            if session.is_over() {
                break;
            }
            session.advance(Some(command)).unwrap();
        }
        let log = events.borrow().clone();
        log
    };

    let first = run(&build());
    let second = run(&build());
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn mine_arms_after_one_turn_and_fires_underfoot() {
    let scenario = scenario(4, 4, vec![(0, 2, Piece::Player), (2, 2, Piece::Mine)]);
    let mut session = Session::from_scenario(&scenario).unwrap();
    let player = session.player().unwrap();

    // Turn 1: step next to the mine; the trap primes at end of turn.
    session.advance(Some(Command::walk(1, 0))).unwrap();
    // Turn 2: step onto the mine; the trap fires at end of turn.
    session.advance(Some(Command::walk(1, 0))).unwrap();

    let world = session.world();
    let fighter = world.entity(player).unwrap().fighter.unwrap();
    assert_eq!(fighter.hp.current, fighter.hp.maximum - Depot::MINE_DAMAGE);
    // The mine is spent and the blast left a hole.
    let crater = world
        .occupant_or_empty(Layer::Constructions, Position::new(2, 2))
        .unwrap();
    assert_eq!(world.entity(crater).unwrap().name, "Hole");
}

#[test]
fn spawner_releases_an_actor_on_schedule() {
    let scenario = scenario(
        5,
        5,
        vec![
            (0, 0, Piece::Player),
            (
                4,
                4,
                Piece::Spawner {
                    frequency: 2,
                    spawns: Box::new(Piece::Thug),
                },
            ),
        ],
    );
    let mut session = Session::from_scenario(&scenario).unwrap();

    session.advance(Some(Command::Wait)).unwrap();
    assert_eq!(session.world().roster().len(), 1);

    session.advance(Some(Command::Wait)).unwrap();
    assert_eq!(session.world().roster().len(), 2);
    let newborn = session.world().roster()[1];
    assert_eq!(session.world().entity(newborn).unwrap().name, "Thug");
}

#[test]
fn drinking_a_bottle_overheals_by_default() {
    let scenario = scenario(3, 3, vec![(1, 1, Piece::Player)]);
    let mut session = Session::from_scenario(&scenario).unwrap();
    let player = session.player().unwrap();
    session
        .world_mut()
        .give_item(player, &Depot::bottle())
        .unwrap();

    session.advance(Some(Command::use_item(0, None))).unwrap();

    let fighter = session.world().entity(player).unwrap().fighter.unwrap();
    let gained = fighter.hp.current - fighter.hp.maximum;
    assert!(
        (Depot::BOTTLE_HEAL_MIN..=Depot::BOTTLE_HEAL_MAX).contains(&gained),
        "unexpected overheal {gained}"
    );
}

#[test]
fn scenario_files_load_from_disk() {
    let scenario = scenario(3, 3, vec![(1, 1, Piece::Player), (2, 2, Piece::Landmine)]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.scenario.json");
    std::fs::write(&path, serde_json::to_string_pretty(&scenario).unwrap()).unwrap();

    let loaded = Scenario::from_path(&path).unwrap();
    assert_eq!(loaded, scenario);
    let world = loaded.build().unwrap();
    assert!(world
        .occupant_or_empty(Layer::Items, Position::new(2, 2))
        .is_some());
}
