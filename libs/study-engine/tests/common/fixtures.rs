//! Factory functions for test data.

use chrono::{DateTime, TimeZone, Utc};
use study_engine::{Book, PartOfSpeech, VocabEntry};
use uuid::Uuid;

/// Fixed reference instant for time-controlled tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// A noun vocab entry with a fresh lexical entry id.
pub fn vocab(freq: u32) -> VocabEntry {
    VocabEntry {
        lexical_entry_id: Uuid::new_v4(),
        pos: PartOfSpeech::Noun,
        freq,
    }
}

pub fn book_with_vocab(title: &str, vocab_list: Vec<VocabEntry>) -> Book {
    Book {
        id: Uuid::new_v4(),
        title: title.to_string(),
        cover_image: format!("{title}.jpg"),
        pages: 300,
        unique_words: vocab_list.len() as u32,
        total_words: vocab_list.iter().map(|v| v.freq).sum(),
        vocab_list,
    }
}
