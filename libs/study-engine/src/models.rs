//! Domain entities owned by the study engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vocab_core::{Answer, StudyConfig, MIN_LEVEL};

/// Part of speech of a lexical entry.
///
/// Satellite adjectives are a WordNet-specific class that behaves like a
/// regular adjective for matching purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    AdjectiveSatellite,
    Adverb,
}

/// One vocabulary item of a book, with its in-book frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
    pub lexical_entry_id: Uuid,
    pub pos: PartOfSpeech,
    pub freq: u32,
}

/// A book and its vocabulary list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub cover_image: String,
    pub pages: u32,
    pub unique_words: u32,
    pub total_words: u32,
    pub vocab_list: Vec<VocabEntry>,
}

/// Link from a flashcard to one deck, with the frequency of the word
/// within that deck's book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckLink {
    pub deck_id: Uuid,
    pub deck_title: String,
    pub freq: u32,
}

/// One flashcard per (lexical entry, part of speech) pair ever studied by
/// a user. Deleted only when its last deck link is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub lexical_entry_id: Uuid,
    pub pos: PartOfSpeech,
    pub study_level: i8,
    pub due_date: DateTime<Utc>,
    pub study_history: Vec<Answer>,
    pub decks: Vec<DeckLink>,
    /// Aggregate frequency across every deck the card has ever been
    /// linked to; never decremented when a link is dropped.
    pub freq_corpus: u32,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    /// Create a brand-new card linked to a single deck.
    pub fn new(vocab: &VocabEntry, deck: &Deck, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            lexical_entry_id: vocab.lexical_entry_id,
            pos: vocab.pos,
            study_level: MIN_LEVEL,
            due_date: now,
            study_history: Vec::new(),
            decks: vec![DeckLink {
                deck_id: deck.id,
                deck_title: deck.title.clone(),
                freq: vocab.freq,
            }],
            freq_corpus: vocab.freq,
            created_at: now,
        }
    }

    pub fn matches(&self, vocab: &VocabEntry) -> bool {
        self.lexical_entry_id == vocab.lexical_entry_id && self.pos == vocab.pos
    }

    pub fn link_for(&self, deck_id: Uuid) -> Option<&DeckLink> {
        self.decks.iter().find(|link| link.deck_id == deck_id)
    }

    /// Add a deck link and fold the frequency into the corpus aggregate.
    pub fn add_link(&mut self, deck: &Deck, freq: u32) {
        self.decks.push(DeckLink {
            deck_id: deck.id,
            deck_title: deck.title.clone(),
            freq,
        });
        self.freq_corpus += freq;
    }

    /// Drop the link to a deck. Returns true if the card has no links left
    /// and should be deleted.
    pub fn remove_link(&mut self, deck_id: Uuid) -> bool {
        self.decks.retain(|link| link.deck_id != deck_id);
        self.decks.is_empty()
    }
}

/// Deck lifecycle type. Only studying decks drive flashcard creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckType {
    Studying,
    Finished,
    Wishlist,
}

/// Per-user, per-book container of flashcards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub cover_image: String,
    pub user_id: Uuid,
    pub deck_type: DeckType,
    pub vocab_learned: u32,
    pub coverage: u64,
    pub unique_words: u32,
    pub total_words: u32,
    pub book_progress: u32,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    /// Build a deck from book metadata. Coverage counters start at zero
    /// and are seeded by the coverage calculator afterwards.
    pub fn for_book(book: &Book, user_id: Uuid, deck_type: DeckType, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id: book.id,
            title: book.title.clone(),
            cover_image: book.cover_image.clone(),
            user_id,
            deck_type,
            vocab_learned: 0,
            coverage: 0,
            unique_words: book.unique_words,
            total_words: book.total_words,
            book_progress: 0,
            created_at: now,
        }
    }
}

/// Four disjoint membership sets for a user's flashcards. A card id is in
/// at most one bucket at any time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardBuckets {
    pub new: Vec<Uuid>,
    pub to_study: Vec<Uuid>,
    pub perfected: Vec<Uuid>,
    pub blacklist: Vec<Uuid>,
}

impl FlashcardBuckets {
    /// All ids across the four buckets.
    pub fn all_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(
            self.new.len() + self.to_study.len() + self.perfected.len() + self.blacklist.len(),
        );
        ids.extend_from_slice(&self.new);
        ids.extend_from_slice(&self.to_study);
        ids.extend_from_slice(&self.perfected);
        ids.extend_from_slice(&self.blacklist);
        ids
    }
}

/// Ephemeral working set of cards for one sitting. Replaced, never
/// merged, on creation; destroyed on completion or timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub new_cards: Vec<Uuid>,
    pub review_cards: Vec<Uuid>,
    pub repeat_cards: Vec<Uuid>,
}

impl StudySession {
    pub fn new(
        new_cards: Vec<Uuid>,
        review_cards: Vec<Uuid>,
        duration_secs: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            start_time: now,
            end_time: now + Duration::seconds(i64::from(duration_secs)),
            new_cards,
            review_cards,
            repeat_cards: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.new_cards.is_empty() && self.review_cards.is_empty() && self.repeat_cards.is_empty()
    }
}

/// The one study profile a user owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub buckets: FlashcardBuckets,
    pub decks: Vec<Uuid>,
    pub extraction_deck: Option<Uuid>,
    pub session: Option<StudySession>,
    pub config: StudyConfig,
    pub created_at: DateTime<Utc>,
}

impl StudyProfile {
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            buckets: FlashcardBuckets::default(),
            decks: Vec::new(),
            extraction_deck: None,
            session: None,
            config: StudyConfig::default(),
            created_at: now,
        }
    }
}

/// Emitted when a session completes or times out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub new_cards_completed: u32,
    pub review_cards_completed: u32,
    pub study_time_secs: u32,
}

/// Result of asking for the next card: either a card to show or the
/// summary of a just-completed session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyStep {
    Card(Flashcard),
    Complete(SessionSummary),
}

/// Derived "how much of this book is learned" metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub vocab_learned: u32,
    pub coverage: u64,
}

/// Aggregate statistics over a user's study state.
#[derive(Debug, Clone, Serialize)]
pub struct StudyStats {
    pub new_cards: usize,
    pub learned_cards: usize,
    pub cards_due: usize,
    pub total_cards: usize,
    pub perfected: usize,
    pub cards_by_level: BTreeMap<i8, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn session_replaces_are_seeded_empty_of_repeats() {
        let session = StudySession::new(vec![Uuid::new_v4()], vec![], 3600, Utc::now());
        assert!(session.repeat_cards.is_empty());
        assert!(!session.is_exhausted());
    }

    #[test]
    fn dropping_the_last_link_flags_the_card_for_deletion() {
        let now = Utc::now();
        let vocab = VocabEntry {
            lexical_entry_id: Uuid::new_v4(),
            pos: PartOfSpeech::Verb,
            freq: 2,
        };
        let book = Book {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            cover_image: "t.jpg".to_string(),
            pages: 10,
            unique_words: 1,
            total_words: 2,
            vocab_list: vec![vocab.clone()],
        };
        let deck = Deck::for_book(&book, Uuid::new_v4(), DeckType::Studying, now);
        let mut card = Flashcard::new(&vocab, &deck, now);

        assert_eq!(card.freq_corpus, 2);
        assert!(card.remove_link(deck.id));
    }

    #[test]
    fn study_step_tags_its_variant() {
        let step = StudyStep::Complete(SessionSummary {
            new_cards_completed: 1,
            review_cards_completed: 0,
            study_time_secs: 42,
        });
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["kind"], "complete");
        assert_eq!(json["study_time_secs"], 42);
    }
}
