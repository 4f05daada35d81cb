use outpost_core::TurnError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The simulation rejected a turn (missing command, bad target, ...).
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// A scenario cannot be instantiated as written.
    #[error("scenario '{name}': {message}")]
    InvalidScenario { name: String, message: String },

    /// Scenario or binding data failed to parse.
    #[error("failed to parse {what}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Scenario or binding file could not be read.
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The session already ended; no further turns are accepted.
    #[error("the session is over")]
    SessionOver,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
