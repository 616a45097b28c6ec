//! Shared types for the study domain.

use serde::{Deserialize, Serialize};

/// Answer given for a flashcard during a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Answer {
    Forgot,
    Hard,
    Good,
    Easy,
    Perfected,
    Blacklist,
}

impl Answer {
    /// Terminal answers take a card out of active rotation instead of
    /// rescheduling it.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Perfected | Self::Blacklist)
    }
}

/// Named multiplier scaling the base interval table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalModifier {
    Shortest,
    Shorter,
    Standard,
    Longer,
    Longest,
}

impl Default for IntervalModifier {
    fn default() -> Self {
        Self::Standard
    }
}

impl IntervalModifier {
    pub fn factor(self) -> f64 {
        match self {
            Self::Shortest => 0.5,
            Self::Shorter => 0.75,
            Self::Standard => 1.0,
            Self::Longer => 1.5,
            Self::Longest => 2.0,
        }
    }
}

/// Ordering applied when drawing new cards from the extraction deck.
///
/// A closed set; unknown values are rejected when the configuration is
/// deserialized, never at sort time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardOrdering {
    MostFrequentWithinDeck,
    MostFrequentWithinCorpus,
    LeastFrequentWithinDeck,
    LeastFrequentWithinCorpus,
}

impl Default for CardOrdering {
    fn default() -> Self {
        Self::MostFrequentWithinDeck
    }
}

/// Per-profile study configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    pub new_cards_per_session: u32,
    pub max_review_cards_per_session: u32,
    pub interval_modifier: IntervalModifier,
    pub card_ordering: CardOrdering,
    pub session_duration_secs: u32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            new_cards_per_session: 10,
            max_review_cards_per_session: 20,
            interval_modifier: IntervalModifier::Standard,
            card_ordering: CardOrdering::MostFrequentWithinDeck,
            session_duration_secs: 3600,
        }
    }
}

/// Minimum allowed session duration in seconds.
pub const MIN_SESSION_DURATION_SECS: u32 = 30;

/// Partial configuration update (all fields optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cards_per_session: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_review_cards_per_session: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_modifier: Option<IntervalModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_ordering: Option<CardOrdering>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration_secs: Option<u32>,
}

impl StudyConfigUpdate {
    /// Merge the update onto an existing configuration.
    pub fn apply(&self, config: &StudyConfig) -> StudyConfig {
        StudyConfig {
            new_cards_per_session: self
                .new_cards_per_session
                .unwrap_or(config.new_cards_per_session),
            max_review_cards_per_session: self
                .max_review_cards_per_session
                .unwrap_or(config.max_review_cards_per_session),
            interval_modifier: self.interval_modifier.unwrap_or(config.interval_modifier),
            card_ordering: self.card_ordering.unwrap_or(config.card_ordering),
            session_duration_secs: self
                .session_duration_secs
                .unwrap_or(config.session_duration_secs),
        }
    }
}
