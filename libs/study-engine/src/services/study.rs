//! Study session lifecycle: card selection, pacing and completion.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;
use vocab_core::{advance, Answer, CardOrdering, StudyConfig};

use crate::buckets::{Bucket, CardPools, SessionPool};
use crate::error::{EngineError, Result};
use crate::models::{Flashcard, SessionSummary, StudySession, StudyProfile, StudyStep};
use crate::store::StudyStore;
use crate::StudyEngine;

impl<S: StudyStore> StudyEngine<S> {
    /// Return the next card to study, creating a session if none is
    /// active. When the session has completed (timed out or run out of
    /// cards) its summary is returned instead and the session is cleared.
    pub async fn start_or_get_next_card(&self, user_id: Uuid) -> Result<StudyStep> {
        self.start_or_get_next_card_at(user_id, Utc::now()).await
    }

    /// Same as [`start_or_get_next_card`](Self::start_or_get_next_card)
    /// with an explicit clock.
    pub async fn start_or_get_next_card_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StudyStep> {
        let _guard = self.locks.lock_user(user_id).await;

        let mut profile = self.load_profile(user_id)?;
        if profile.decks.is_empty() {
            return Err(EngineError::PreconditionFailed(
                "no decks in library; add a book deck before studying".to_string(),
            ));
        }
        let extraction_deck = profile.extraction_deck.ok_or_else(|| {
            EngineError::PreconditionFailed("no extraction deck selected".to_string())
        })?;

        // Reuse an active session; only create one when absent.
        if profile.session.is_none() {
            let session = self.build_session(&profile, extraction_deck, now)?;
            tracing::info!(
                user_id = %user_id,
                new = session.new_cards.len(),
                review = session.review_cards.len(),
                "study session created"
            );
            profile.session = Some(session);
            self.store.save_profile(&profile)?;
        }

        let session = profile.session.as_ref().expect("session just ensured");
        if let Some(summary) = session_summary(session, &profile.config, now) {
            profile.session = None;
            self.store.save_profile(&profile)?;
            tracing::info!(user_id = %user_id, ?summary, "study session complete");
            return Ok(StudyStep::Complete(summary));
        }

        let card = self.pick_next_card(session, now)?;
        Ok(StudyStep::Card(card))
    }

    /// Draw the session's pools from the profile buckets.
    fn build_session(
        &self,
        profile: &StudyProfile,
        extraction_deck: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StudySession> {
        let config = &profile.config;

        // New cards: restricted to the extraction deck, ordered by the
        // configured frequency policy.
        let mut candidates: Vec<Flashcard> = self
            .store
            .flashcards(&profile.buckets.new)?
            .into_iter()
            .filter(|card| card.link_for(extraction_deck).is_some())
            .collect();
        sort_by_ordering(&mut candidates, extraction_deck, config.card_ordering);
        candidates.truncate(config.new_cards_per_session as usize);
        let new_cards = candidates.into_iter().map(|card| card.id).collect();

        // Review cards: due ones from the to-study bucket, earliest first.
        let mut due: Vec<Flashcard> = self
            .store
            .flashcards(&profile.buckets.to_study)?
            .into_iter()
            .filter(|card| card.due_date <= now)
            .collect();
        due.sort_by_key(|card| card.due_date);
        due.truncate(config.max_review_cards_per_session as usize);
        let review_cards = due.into_iter().map(|card| card.id).collect();

        Ok(StudySession::new(
            new_cards,
            review_cards,
            config.session_duration_secs,
            now,
        ))
    }

    /// A due repeat card (any repeat card once the new pool is empty) is
    /// served first; the match among several eligible repeats is
    /// deliberately arbitrary. Otherwise one card is drawn uniformly at
    /// random from the merged review and new pools.
    fn pick_next_card(&self, session: &StudySession, now: DateTime<Utc>) -> Result<Flashcard> {
        let repeats = self.store.flashcards(&session.repeat_cards)?;
        if let Some(card) = repeats
            .into_iter()
            .find(|card| card.due_date <= now || session.new_cards.is_empty())
        {
            return Ok(card);
        }

        let merged: Vec<Uuid> = session
            .review_cards
            .iter()
            .chain(session.new_cards.iter())
            .copied()
            .collect();
        if merged.is_empty() {
            return Err(EngineError::NotFound(
                "no eligible card in session".to_string(),
            ));
        }
        let chosen = merged[rand::rng().random_range(0..merged.len())];
        self.load_flashcard(chosen)
    }

    /// Record an answer for a card of the active session.
    pub async fn answer_card(
        &self,
        user_id: Uuid,
        flashcard_id: Uuid,
        answer: Answer,
    ) -> Result<()> {
        self.answer_card_at(user_id, flashcard_id, answer, Utc::now())
            .await
    }

    /// Same as [`answer_card`](Self::answer_card) with an explicit clock.
    pub async fn answer_card_at(
        &self,
        user_id: Uuid,
        flashcard_id: Uuid,
        answer: Answer,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let _guard = self.locks.lock_user(user_id).await;

        let mut profile = self.load_profile(user_id)?;
        if profile.session.is_none() {
            return Err(EngineError::PreconditionFailed(
                "study session has not been started".to_string(),
            ));
        }
        let mut card = self.load_flashcard(flashcard_id)?;

        // Terminal answers take the card out of rotation without touching
        // the scheduler: no new due date is computed.
        if answer.is_terminal() {
            let session = profile.session.as_mut().expect("session checked above");
            session.remove(flashcard_id);
            let bucket = match answer {
                Answer::Perfected => Bucket::Perfected,
                _ => Bucket::Blacklist,
            };
            profile.buckets.reassign(flashcard_id, bucket);
            self.store.save_profile(&profile)?;
            if answer == Answer::Perfected {
                self.record_mastery(&card)?;
            }
            tracing::debug!(card = %flashcard_id, ?answer, "card retired from rotation");
            return Ok(());
        }

        let progress = advance(
            card.study_level,
            answer,
            profile.config.interval_modifier,
            &card.study_history,
            now,
        )?;
        card.study_level = progress.new_level;
        card.due_date = progress.due_date;
        card.study_history = progress.history;
        self.store.save_flashcard(&card)?;

        let session = profile.session.as_mut().expect("session checked above");
        if card.study_history.len() == 1 {
            // First exposure: graduate out of the new bucket and always
            // queue an in-session repeat, whatever the computed level.
            profile.buckets.reassign(flashcard_id, Bucket::ToStudy);
            session.reassign(flashcard_id, SessionPool::Repeat);
        } else if card.study_level >= 0 {
            session.remove(flashcard_id);
        } else {
            session.reassign(flashcard_id, SessionPool::Repeat);
        }
        self.store.save_profile(&profile)?;
        tracing::debug!(
            card = %flashcard_id,
            ?answer,
            level = card.study_level,
            "card answered"
        );
        Ok(())
    }

    /// Aggregate statistics over the user's study state.
    pub async fn get_study_stats(&self, user_id: Uuid) -> Result<crate::models::StudyStats> {
        let _guard = self.locks.lock_user(user_id).await;
        let now = Utc::now();

        let profile = self.load_profile(user_id)?;
        let to_study = self.store.flashcards(&profile.buckets.to_study)?;

        let cards_due = to_study.iter().filter(|card| card.due_date <= now).count();
        let mut cards_by_level = std::collections::BTreeMap::new();
        for card in &to_study {
            *cards_by_level.entry(card.study_level).or_insert(0) += 1;
        }

        let new_cards = profile.buckets.new.len();
        let perfected = profile.buckets.perfected.len();
        let learned_cards = to_study.len() + perfected;
        Ok(crate::models::StudyStats {
            new_cards,
            learned_cards,
            cards_due,
            total_cards: learned_cards + new_cards,
            perfected,
            cards_by_level,
        })
    }
}

/// Completion check: a session is over when its end time has passed or
/// every pool is empty. Returns the summary to emit, or `None` while the
/// session is still running.
pub fn session_summary(
    session: &StudySession,
    config: &StudyConfig,
    now: DateTime<Utc>,
) -> Option<SessionSummary> {
    let timed_out = now > session.end_time;
    if !timed_out && !session.is_exhausted() {
        return None;
    }

    let elapsed = (now - session.start_time).num_seconds().max(0) as u32;
    Some(SessionSummary {
        new_cards_completed: config
            .new_cards_per_session
            .saturating_sub(session.new_cards.len() as u32),
        review_cards_completed: config
            .max_review_cards_per_session
            .saturating_sub(session.review_cards.len() as u32),
        study_time_secs: elapsed.min(config.session_duration_secs),
    })
}

fn sort_by_ordering(cards: &mut [Flashcard], deck_id: Uuid, ordering: CardOrdering) {
    let deck_freq = |card: &Flashcard| card.link_for(deck_id).map_or(0, |link| link.freq);
    match ordering {
        CardOrdering::MostFrequentWithinDeck => {
            cards.sort_by(|a, b| deck_freq(b).cmp(&deck_freq(a)))
        }
        CardOrdering::LeastFrequentWithinDeck => {
            cards.sort_by(|a, b| deck_freq(a).cmp(&deck_freq(b)))
        }
        CardOrdering::MostFrequentWithinCorpus => {
            cards.sort_by(|a, b| b.freq_corpus.cmp(&a.freq_corpus))
        }
        CardOrdering::LeastFrequentWithinCorpus => {
            cards.sort_by(|a, b| a.freq_corpus.cmp(&b.freq_corpus))
        }
    }
}
