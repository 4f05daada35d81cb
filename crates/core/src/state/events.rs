use super::{EntityId, Position};

/// Kinds of notable occurrences recorded in the event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Moved,
    Attacked,
    Shot,
    WasDestroyed,
    PickedUp,
    Dropped,
    ActorSpawned,
    ConstructionSpawned,
    Exploded,
    LogUpdated,
}

/// Immutable record of something that happened in the simulation.
///
/// Not an event in the IO sense: a plain data record with an optional actor
/// and an optional location, appended once and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEvent {
    pub kind: EventKind,
    pub actor: Option<EntityId>,
    pub location: Option<Position>,
}

impl GameEvent {
    pub fn new(kind: EventKind, actor: Option<EntityId>, location: Option<Position>) -> Self {
        Self {
            kind,
            actor,
            location,
        }
    }

    /// Event with neither subject nor place, e.g. `LogUpdated`.
    pub fn bare(kind: EventKind) -> Self {
        Self::new(kind, None, None)
    }
}

/// Append-only event queue plus the human-readable game log.
///
/// The core only appends; the runtime drains accumulated events after each
/// turn and hands them to listeners one at a time.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    log: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Adds a display-log line and the matching `LogUpdated` event.
    pub fn extend_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        self.append(GameEvent::bare(EventKind::LogUpdated));
    }

    /// Takes all accumulated events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }
}
