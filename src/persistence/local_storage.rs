//! Browser LocalStorage store (wasm)

use web_sys::Storage;

use super::{PersistError, RecordStore, decode};
use crate::highscores::PersistedRecord;

fn storage() -> Result<Storage, PersistError> {
    web_sys::window()
        .ok_or_else(|| PersistError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| PersistError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| PersistError::Storage("localStorage disabled".into()))
}

/// Raw string under `key`, `None` when never written
pub fn read_item(key: &str) -> Result<Option<String>, PersistError> {
    storage()?
        .get_item(key)
        .map_err(|e| PersistError::Storage(format!("{:?}", e)))
}

pub fn write_item(key: &str, value: &str) -> Result<(), PersistError> {
    storage()?
        .set_item(key, value)
        .map_err(|e| PersistError::Storage(format!("{:?}", e)))
}

/// Record kept as JSON under one LocalStorage key
pub struct LocalStorageStore {
    key: &'static str,
}

impl LocalStorageStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl RecordStore for LocalStorageStore {
    fn load(&self) -> Result<Option<PersistedRecord>, PersistError> {
        read_item(self.key)?.as_deref().map(decode).transpose()
    }

    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError> {
        write_item(self.key, &serde_json::to_string(record)?)
    }
}
