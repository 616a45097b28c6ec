//! In-memory store used by tests and embedders.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{Book, Deck, Flashcard, StudyProfile};
use crate::store::StudyStore;

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, StudyProfile>,
    flashcards: HashMap<Uuid, Flashcard>,
    decks: HashMap<Uuid, Deck>,
    books: HashMap<Uuid, Book>,
}

/// HashMap-backed [`StudyStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| EngineError::Store("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| EngineError::Store("store lock poisoned".to_string()))
    }
}

impl StudyStore for MemoryStore {
    fn profile_for_user(&self, user_id: Uuid) -> Result<Option<StudyProfile>> {
        let tables = self.read()?;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    fn save_profile(&self, profile: &StudyProfile) -> Result<()> {
        self.write()?.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    fn flashcard(&self, id: Uuid) -> Result<Option<Flashcard>> {
        Ok(self.read()?.flashcards.get(&id).cloned())
    }

    fn flashcards(&self, ids: &[Uuid]) -> Result<Vec<Flashcard>> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.flashcards.get(id).cloned())
            .collect())
    }

    fn flashcards_linked_to_deck(&self, deck_id: Uuid) -> Result<Vec<Flashcard>> {
        let tables = self.read()?;
        Ok(tables
            .flashcards
            .values()
            .filter(|card| card.link_for(deck_id).is_some())
            .cloned()
            .collect())
    }

    fn save_flashcard(&self, card: &Flashcard) -> Result<()> {
        self.write()?.flashcards.insert(card.id, card.clone());
        Ok(())
    }

    fn delete_flashcards(&self, ids: &[Uuid]) -> Result<()> {
        let mut tables = self.write()?;
        for id in ids {
            tables.flashcards.remove(id);
        }
        Ok(())
    }

    fn deck(&self, id: Uuid) -> Result<Option<Deck>> {
        Ok(self.read()?.decks.get(&id).cloned())
    }

    fn deck_for_book(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<Deck>> {
        let tables = self.read()?;
        Ok(tables
            .decks
            .values()
            .find(|d| d.user_id == user_id && d.book_id == book_id)
            .cloned())
    }

    fn save_deck(&self, deck: &Deck) -> Result<()> {
        self.write()?.decks.insert(deck.id, deck.clone());
        Ok(())
    }

    fn delete_deck(&self, id: Uuid) -> Result<()> {
        self.write()?.decks.remove(&id);
        Ok(())
    }

    fn book(&self, id: Uuid) -> Result<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    fn save_book(&self, book: &Book) -> Result<()> {
        self.write()?.books.insert(book.id, book.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn profile_roundtrip_by_user() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let profile = StudyProfile::new(user_id, Utc::now());

        store.save_profile(&profile).unwrap();
        let loaded = store.profile_for_user(user_id).unwrap().unwrap();
        assert_eq!(loaded.id, profile.id);

        assert!(store.profile_for_user(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn flashcards_skips_missing_ids() {
        let store = MemoryStore::new();
        let found = store.flashcards(&[Uuid::new_v4()]).unwrap();
        assert!(found.is_empty());
    }
}
