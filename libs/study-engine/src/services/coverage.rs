//! Coverage calculator: how much of a book's vocabulary is learned.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{CoverageStats, FlashcardBuckets, VocabEntry};
use crate::store::StudyStore;
use crate::StudyEngine;

/// Minimum study level at which a card counts as learned.
pub const COVERAGE_MIN_STUDY_LEVEL: i8 = 0;

impl<S: StudyStore> StudyEngine<S> {
    /// Coverage metrics for a book. Uses the deck's incrementally
    /// maintained counters when a deck exists for (user, book); otherwise
    /// computes them from the profile's flashcards.
    pub async fn get_coverage(&self, user_id: Uuid, book_id: Uuid) -> Result<CoverageStats> {
        let _guard = self.locks.lock_user(user_id).await;

        let profile = self.load_profile(user_id)?;
        let book = self.load_book(book_id)?;

        if let Some(deck) = self.store.deck_for_book(user_id, book_id)? {
            return Ok(CoverageStats {
                vocab_learned: deck.vocab_learned,
                coverage: deck.coverage,
            });
        }
        tracing::debug!(book_id = %book_id, "no deck for book, computing coverage");
        self.book_coverage(&book.vocab_list, &profile.buckets)
    }

    /// Match the book's vocabulary against the flashcards in all four
    /// buckets. A vocab entry is learned when a card with the same
    /// lexical entry and part of speech has reached the minimum level;
    /// coverage weights each learned entry by its in-book frequency.
    pub(crate) fn book_coverage(
        &self,
        vocab_list: &[VocabEntry],
        buckets: &FlashcardBuckets,
    ) -> Result<CoverageStats> {
        let cards = self.store.flashcards(&buckets.all_ids())?;

        let mut vocab_learned = 0u32;
        let mut coverage = 0u64;
        for vocab in vocab_list {
            let learned = cards
                .iter()
                .any(|card| card.matches(vocab) && card.study_level >= COVERAGE_MIN_STUDY_LEVEL);
            if learned {
                vocab_learned += 1;
                coverage += u64::from(vocab.freq);
            }
        }
        Ok(CoverageStats {
            vocab_learned,
            coverage,
        })
    }
}
