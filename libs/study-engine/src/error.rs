//! Error handling for the study engine.

use thiserror::Error;
use vocab_core::ScheduleError;

/// Domain errors surfaced to the caller.
///
/// Each variant carries enough information for a transport layer to map it
/// to a response code; none are swallowed inside the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<ScheduleError> for EngineError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::LevelOutOfRange { .. } => Self::OutOfRange(err.to_string()),
            ScheduleError::Unschedulable(_) => Self::InvalidInput(err.to_string()),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
