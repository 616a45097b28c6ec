//! Core vocabulary-study library shared by the study engine.
//!
//! Provides:
//! - Spaced repetition scheduler (level transitions + interval table)
//! - Answer, interval modifier and card ordering enums
//! - Study configuration with per-field overrides

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::{Result, ScheduleError};
pub use scheduler::{advance, Progress, MAX_LEVEL, MIN_LEVEL, OPTIMAL_INTERVALS};
pub use types::{Answer, CardOrdering, IntervalModifier, StudyConfig, StudyConfigUpdate};
