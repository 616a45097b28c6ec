//! Study engine for vocabulary acquisition.
//!
//! Owns the per-user study state: flashcard buckets, deck associations,
//! the ephemeral study session and derived coverage statistics. Invoked as
//! a library by request handlers; persistence is behind [`StudyStore`].
//!
//! Every operation acquires the user's profile lock for its duration, so
//! bucket and session mutations for one user never interleave.

pub mod buckets;
pub mod error;
pub mod lock;
pub mod models;
pub mod services;
pub mod store;

use uuid::Uuid;

pub use buckets::{Bucket, CardPools, SessionPool};
pub use error::{EngineError, Result};
pub use models::{
    Book, CoverageStats, Deck, DeckLink, DeckType, Flashcard, FlashcardBuckets, PartOfSpeech,
    SessionSummary, StudyProfile, StudySession, StudyStats, StudyStep, VocabEntry,
};
pub use services::coverage::COVERAGE_MIN_STUDY_LEVEL;
pub use store::{MemoryStore, StudyStore};
pub use vocab_core::{Answer, CardOrdering, IntervalModifier, StudyConfig, StudyConfigUpdate};

use crate::lock::ProfileLocks;
use crate::models::StudyProfile as Profile;

/// The engine facade. One instance serves all users.
pub struct StudyEngine<S: StudyStore> {
    store: S,
    locks: ProfileLocks,
}

impl<S: StudyStore> StudyEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: ProfileLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn load_profile(&self, user_id: Uuid) -> Result<Profile> {
        self.store
            .profile_for_user(user_id)?
            .ok_or_else(|| EngineError::NotFound(format!("study profile for user {user_id}")))
    }

    pub(crate) fn load_flashcard(&self, id: Uuid) -> Result<models::Flashcard> {
        self.store
            .flashcard(id)?
            .ok_or_else(|| EngineError::NotFound(format!("flashcard {id}")))
    }

    pub(crate) fn load_deck(&self, id: Uuid) -> Result<models::Deck> {
        self.store
            .deck(id)?
            .ok_or_else(|| EngineError::NotFound(format!("deck {id}")))
    }

    pub(crate) fn load_book(&self, id: Uuid) -> Result<models::Book> {
        self.store
            .book(id)?
            .ok_or_else(|| EngineError::NotFound(format!("book {id}")))
    }
}
