//! Shared test context for engine integration tests.

#![allow(dead_code)]

pub mod fixtures;

use study_engine::{Book, MemoryStore, StudyEngine, StudyStore};
use uuid::Uuid;

pub struct TestContext {
    pub engine: StudyEngine<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            engine: StudyEngine::new(MemoryStore::new()),
        }
    }

    /// Create a fresh user with an empty study profile.
    pub async fn user_with_profile(&self) -> Uuid {
        let user_id = Uuid::new_v4();
        self.engine.create_profile(user_id).await.unwrap();
        user_id
    }

    pub fn add_book(&self, book: &Book) {
        self.engine.store().save_book(book).unwrap();
    }
}
