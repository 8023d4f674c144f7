//! Error types for the ink engine.

use thiserror::Error;

/// Engine errors.
///
/// Gesture handling never fails: malformed pointer input is ignored and an
/// unrecognized stroke is kept as ink. Errors only surface at the API edges
/// (flattened point lists handed in by a collaborator) and when loading
/// configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed point list: expected an even number of coordinates, got {0}")]
    MalformedPoints(usize),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
