//! Deck association management.
//!
//! Keeps flashcards, decks and bucket membership mutually consistent:
//! deck creation and type changes drive flashcard creation and linking,
//! deck deletion drops links and removes orphaned cards everywhere.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vocab_core::types::MIN_SESSION_DURATION_SECS;
use vocab_core::{StudyConfig, StudyConfigUpdate};

use crate::buckets::CardPools;
use crate::error::{EngineError, Result};
use crate::models::{Book, Deck, DeckType, Flashcard, StudyProfile};
use crate::store::StudyStore;
use crate::StudyEngine;

impl<S: StudyStore> StudyEngine<S> {
    /// Create the study profile for a user. Each user owns exactly one.
    pub async fn create_profile(&self, user_id: Uuid) -> Result<StudyProfile> {
        let _guard = self.locks.lock_user(user_id).await;
        if self.store.profile_for_user(user_id)?.is_some() {
            return Err(EngineError::Conflict(format!(
                "study profile for user {user_id} already exists"
            )));
        }
        let profile = StudyProfile::new(user_id, Utc::now());
        self.store.save_profile(&profile)?;
        Ok(profile)
    }

    pub async fn create_studying_deck(&self, user_id: Uuid, book_id: Uuid) -> Result<Deck> {
        self.create_deck(user_id, book_id, DeckType::Studying).await
    }

    pub async fn create_deck(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        deck_type: DeckType,
    ) -> Result<Deck> {
        let _guard = self.locks.lock_user(user_id).await;
        self.create_deck_locked(user_id, book_id, deck_type, Utc::now())
    }

    fn create_deck_locked(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        deck_type: DeckType,
        now: DateTime<Utc>,
    ) -> Result<Deck> {
        let mut profile = self.load_profile(user_id)?;
        let book = self.load_book(book_id)?;

        if let Some(existing) = self.store.deck_for_book(user_id, book_id)? {
            return Err(EngineError::Conflict(format!(
                "deck {} already exists for book {book_id}",
                existing.id
            )));
        }

        let mut deck = Deck::for_book(&book, user_id, deck_type, now);
        profile.decks.push(deck.id);

        if deck_type == DeckType::Studying {
            self.attach_book_vocabulary(&book, &deck, &mut profile, now)?;
            if profile.extraction_deck.is_none() {
                profile.extraction_deck = Some(deck.id);
            }
        }

        let stats = self.book_coverage(&book.vocab_list, &profile.buckets)?;
        deck.vocab_learned = stats.vocab_learned;
        deck.coverage = stats.coverage;

        self.store.save_deck(&deck)?;
        self.store.save_profile(&profile)?;
        tracing::info!(deck_id = %deck.id, book_id = %book_id, ?deck_type, "deck created");
        Ok(deck)
    }

    /// Create flashcards for vocabulary not yet backed by one and link
    /// existing cards to the deck. New card ids land in the `new` bucket.
    fn attach_book_vocabulary(
        &self,
        book: &Book,
        deck: &Deck,
        profile: &mut StudyProfile,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut existing = self.store.flashcards(&profile.buckets.all_ids())?;
        let mut created = 0usize;

        for vocab in &book.vocab_list {
            match existing.iter_mut().find(|card| card.matches(vocab)) {
                Some(card) => {
                    if card.link_for(deck.id).is_none() {
                        card.add_link(deck, vocab.freq);
                        self.store.save_flashcard(card)?;
                    }
                }
                None => {
                    let card = Flashcard::new(vocab, deck, now);
                    profile.buckets.new.push(card.id);
                    self.store.save_flashcard(&card)?;
                    created += 1;
                }
            }
        }

        tracing::debug!(
            deck_id = %deck.id,
            created,
            linked = book.vocab_list.len() - created,
            "book vocabulary attached"
        );
        Ok(())
    }

    /// Change a deck's type. No-op when unchanged. Transitioning into
    /// studying runs the flashcard creation step; transitioning away
    /// clears the extraction reference when it pointed here.
    pub async fn reassign_deck_type(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        new_type: DeckType,
    ) -> Result<Deck> {
        let _guard = self.locks.lock_user(user_id).await;
        let now = Utc::now();

        let mut profile = self.load_profile(user_id)?;
        let mut deck = self.load_deck(deck_id)?;
        self.check_owner(&deck, user_id)?;

        if deck.deck_type == new_type {
            return Ok(deck);
        }

        let was_studying = deck.deck_type == DeckType::Studying;
        if new_type == DeckType::Studying {
            let book = self.load_book(deck.book_id)?;
            self.attach_book_vocabulary(&book, &deck, &mut profile, now)?;
        }
        if was_studying && profile.extraction_deck == Some(deck.id) {
            profile.extraction_deck = None;
        }

        deck.deck_type = new_type;
        self.store.save_deck(&deck)?;
        self.store.save_profile(&profile)?;
        Ok(deck)
    }

    /// Mark a deck as the source of new cards. Only studying decks qualify.
    pub async fn set_extraction_deck(&self, user_id: Uuid, deck_id: Uuid) -> Result<()> {
        let _guard = self.locks.lock_user(user_id).await;

        let mut profile = self.load_profile(user_id)?;
        let deck = self.load_deck(deck_id)?;
        self.check_owner(&deck, user_id)?;

        if profile.extraction_deck == Some(deck.id) {
            return Ok(());
        }
        if deck.deck_type != DeckType::Studying {
            return Err(EngineError::InvalidState(
                "unable to set a non-studying deck as extraction deck".to_string(),
            ));
        }
        profile.extraction_deck = Some(deck.id);
        self.store.save_profile(&profile)
    }

    /// Delete a deck. Flashcards linked only to this deck are removed
    /// from every bucket and any active session, then deleted; cards with
    /// remaining links elsewhere just drop this deck's link.
    pub async fn delete_deck(&self, user_id: Uuid, deck_id: Uuid) -> Result<Deck> {
        let _guard = self.locks.lock_user(user_id).await;

        let mut profile = self.load_profile(user_id)?;
        let deck = self.load_deck(deck_id)?;
        self.check_owner(&deck, user_id)?;

        let linked = self.store.flashcards_linked_to_deck(deck_id)?;
        let mut orphaned = Vec::new();
        for mut card in linked {
            if card.remove_link(deck_id) {
                profile.buckets.remove(card.id);
                if let Some(session) = profile.session.as_mut() {
                    session.remove(card.id);
                }
                orphaned.push(card.id);
            } else {
                self.store.save_flashcard(&card)?;
            }
        }
        self.store.delete_flashcards(&orphaned)?;

        profile.decks.retain(|id| *id != deck_id);
        if profile.extraction_deck == Some(deck_id) {
            profile.extraction_deck = None;
        }

        self.store.delete_deck(deck_id)?;
        self.store.save_profile(&profile)?;
        tracing::info!(deck_id = %deck_id, deleted_cards = orphaned.len(), "deck deleted");
        Ok(deck)
    }

    /// Credit a mastered card to every deck it is linked to: each deck's
    /// coverage grows by the link frequency, vocab_learned by one.
    pub fn record_mastery(&self, card: &Flashcard) -> Result<()> {
        for link in &card.decks {
            let mut deck = self.load_deck(link.deck_id)?;
            deck.coverage += u64::from(link.freq);
            deck.vocab_learned += 1;
            self.store.save_deck(&deck)?;
        }
        Ok(())
    }

    /// Record how far the user has read the deck's book.
    pub async fn update_book_progress(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        pages_read: u32,
    ) -> Result<()> {
        let _guard = self.locks.lock_user(user_id).await;

        let _profile = self.load_profile(user_id)?;
        let mut deck = self.load_deck(deck_id)?;
        self.check_owner(&deck, user_id)?;
        let book = self.load_book(deck.book_id)?;

        if pages_read > book.pages {
            return Err(EngineError::InvalidInput(format!(
                "invalid page progress {pages_read}: book has {} pages",
                book.pages
            )));
        }
        deck.book_progress = pages_read;
        self.store.save_deck(&deck)
    }

    /// Apply a partial configuration update. Fields absent from the
    /// update keep their current value.
    pub async fn update_config(
        &self,
        user_id: Uuid,
        update: StudyConfigUpdate,
    ) -> Result<StudyConfig> {
        let _guard = self.locks.lock_user(user_id).await;

        if let Some(secs) = update.session_duration_secs {
            if secs < MIN_SESSION_DURATION_SECS {
                return Err(EngineError::InvalidInput(format!(
                    "session duration {secs}s is below the {MIN_SESSION_DURATION_SECS}s minimum"
                )));
            }
        }

        let mut profile = self.load_profile(user_id)?;
        profile.config = update.apply(&profile.config);
        self.store.save_profile(&profile)?;
        Ok(profile.config)
    }

    fn check_owner(&self, deck: &Deck, user_id: Uuid) -> Result<()> {
        if deck.user_id != user_id {
            return Err(EngineError::InvalidState(format!(
                "deck {} does not belong to user {user_id}",
                deck.id
            )));
        }
        Ok(())
    }
}
