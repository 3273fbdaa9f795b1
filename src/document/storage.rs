//! Single-slot document persistence.
//!
//! The embedding application supplies the actual key-value backend
//! (browser local storage, a file, ...); the core only ever uses one
//! fixed slot, overwritten on every import, create, or marker mutation
//! and read once at session start.

use crate::core::constants::STORAGE_SLOT_KEY;
use crate::document::{codec, model::MapDocument};
use crate::Result;

/// Narrow persistent key-value interface consumed by the session
pub trait DocumentStorage: Send {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reads the persisted document slot, if any
pub fn load_slot(storage: &dyn DocumentStorage) -> Result<Option<MapDocument>> {
    match storage.load(STORAGE_SLOT_KEY)? {
        Some(text) => codec::deserialize(&text).map(Some),
        None => Ok(None),
    }
}

/// Overwrites the persisted document slot
pub fn store_slot(storage: &mut dyn DocumentStorage, document: &MapDocument) -> Result<()> {
    let text = codec::serialize(document)?;
    storage.store(STORAGE_SLOT_KEY, &text)
}

/// In-memory backend for tests and headless embedding
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: std::collections::HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
