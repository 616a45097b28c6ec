//! Persistence collaborator consumed by the engine.
//!
//! The engine only needs load-by-id, find-by-ids, one find-by-field and
//! whole-entity saves; anything implementing [`StudyStore`] can back it.

pub mod memory;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Book, Deck, Flashcard, StudyProfile};

pub use memory::MemoryStore;

/// Entity store for profiles, flashcards, decks and books.
///
/// Saves replace the whole entity, so one `save_profile` call applies a
/// profile's bucket and session mutations as a single atomic write.
pub trait StudyStore: Send + Sync {
    fn profile_for_user(&self, user_id: Uuid) -> Result<Option<StudyProfile>>;
    fn save_profile(&self, profile: &StudyProfile) -> Result<()>;

    fn flashcard(&self, id: Uuid) -> Result<Option<Flashcard>>;
    fn flashcards(&self, ids: &[Uuid]) -> Result<Vec<Flashcard>>;
    /// All flashcards carrying a link to the deck.
    fn flashcards_linked_to_deck(&self, deck_id: Uuid) -> Result<Vec<Flashcard>>;
    fn save_flashcard(&self, card: &Flashcard) -> Result<()>;
    fn delete_flashcards(&self, ids: &[Uuid]) -> Result<()>;

    fn deck(&self, id: Uuid) -> Result<Option<Deck>>;
    fn deck_for_book(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<Deck>>;
    fn save_deck(&self, deck: &Deck) -> Result<()>;
    fn delete_deck(&self, id: Uuid) -> Result<()>;

    fn book(&self, id: Uuid) -> Result<Option<Book>>;
    fn save_book(&self, book: &Book) -> Result<()>;
}
