//! A playable session: world, listeners, input plumbing.

use outpost_core::{Command, Controller, EntityId, GameEngine, TurnReport, World};

use crate::bindings::Bindings;
use crate::error::{Result, RuntimeError};
use crate::listeners::{BorderWalkListener, DeathListener, Listener, SessionSignal};
use crate::scenario::Scenario;

/// Owns a world and drives it one player command at a time.
///
/// After every consumed turn the pending events are drained through the
/// listeners; their signals accumulate until the host collects them with
/// [`Session::take_signals`]. A `GameOver` signal latches the session shut.
pub struct Session {
    world: World,
    listeners: Vec<Box<dyn Listener>>,
    signals: Vec<SessionSignal>,
    over: bool,
}

impl Session {
    pub fn new(world: World) -> Self {
        Self {
            world,
            listeners: Vec::new(),
            signals: Vec::new(),
            over: false,
        }
    }

    /// Builds the scenario and wires the stock listeners on the player.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let world = scenario.build()?;
        let mut session = Self::new(world);
        if let Some(player) = session.world.player() {
            session.add_listener(Box::new(DeathListener::new(player)));
            session.add_listener(Box::new(BorderWalkListener::new(player)));
        }
        if let Some(message) = session.world.entrance_message() {
            tracing::info!(message, "entering map");
        }
        Ok(session)
    }

    pub fn add_listener(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> Option<EntityId> {
        self.world.player()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Maps an input symbol through the bindings and queues it on the player
    /// controller. Unrecognized symbols report `false` and change nothing.
    pub fn queue_symbol(&mut self, symbol: char, bindings: &Bindings) -> Result<bool> {
        let Some(player) = self.world.player() else {
            return Err(outpost_core::TurnError::NoPlayer.into());
        };
        let Some(mut controller) = self.world.take_controller(player) else {
            return Err(outpost_core::TurnError::from(
                outpost_core::ControllerError::NotAttached { actor: player },
            )
            .into());
        };
        let recognized = match &mut controller {
            Controller::Player(player_controller) => {
                player_controller.take_command(symbol, bindings.as_map())
            }
            _ => false,
        };
        self.world.put_back_controller(player, controller);
        Ok(recognized)
    }

    /// Advances one turn. `command` may be `None` when a symbol was queued
    /// through [`Session::queue_symbol`] beforehand.
    pub fn advance(&mut self, command: Option<Command>) -> Result<TurnReport> {
        if self.over {
            return Err(RuntimeError::SessionOver);
        }
        let report = GameEngine::new(&mut self.world).process_turn(command)?;
        tracing::debug!(
            turn = report.turn,
            player_acted = report.player_acted,
            "turn processed"
        );
        self.dispatch_events();
        Ok(report)
    }

    fn dispatch_events(&mut self) {
        for event in self.world.drain_events() {
            tracing::trace!(kind = %event.kind, "event");
            for listener in &mut self.listeners {
                if let Some(signal) = listener.on_event(&self.world, &event) {
                    if signal == SessionSignal::GameOver {
                        self.over = true;
                    }
                    self.signals.push(signal);
                }
            }
        }
    }

    /// Signals collected since the last call, oldest first.
    pub fn take_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }
}
