//! Host-facing runtime around the simulation core.
//!
//! The core crate is pure state and rules; this crate adds everything a
//! front end needs to actually run a game:
//! - [`bindings`] maps raw input symbols to commands
//! - [`depot`] and [`scenario`] build populated worlds from serde data
//! - [`listeners`] turns simulation events into session signals
//! - [`session`] owns the world and drives turns

pub mod bindings;
pub mod depot;
pub mod error;
pub mod listeners;
pub mod scenario;
pub mod session;

pub use bindings::Bindings;
pub use depot::{Depot, Piece};
pub use error::{Result, RuntimeError};
pub use listeners::{BorderWalkListener, DeathListener, Listener, SessionSignal};
pub use scenario::{Scenario, ScenarioPlacement};
pub use session::Session;
