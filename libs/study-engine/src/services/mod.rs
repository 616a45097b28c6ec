//! Engine operations, grouped by concern.

pub mod coverage;
pub mod deck;
pub mod study;
