//! Error types for vocab-core.

use thiserror::Error;

use crate::types::Answer;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors that can occur while scheduling a flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The computed interval-table index fell outside the table. Cannot
    /// happen for levels within [-1, 5]; indicates a configuration bug.
    #[error("interval index {index} is out of range")]
    LevelOutOfRange { index: i32 },

    /// Terminal answers remove a card from rotation instead of
    /// rescheduling it and must be handled by the caller.
    #[error("answer {0:?} cannot be scheduled")]
    Unschedulable(Answer),
}
