//! Score record persistence
//!
//! Features:
//! - `RecordStore` seam, one flat record per store
//! - In-memory store for tests and headless runs
//! - Atomic JSON file store on native (tmp → rename)
//! - LocalStorage store on wasm
//! - Corrupt data is reported, callers treat it as no record

use std::fmt;

use crate::highscores::PersistedRecord;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::{LocalStorageStore, read_item, write_item};

/// Why a load or save failed
#[derive(Debug)]
pub enum PersistError {
    /// Backing storage unavailable or refused the operation
    Storage(String),
    /// Stored data exists but does not decode
    Corrupt(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Corrupt(msg) => write!(f, "stored record is corrupt: {msg}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Flat key-value storage for the score record
pub trait RecordStore {
    fn load(&self) -> Result<Option<PersistedRecord>, PersistError>;
    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError>;
}

/// Decode a stored record; anything unreadable is `Corrupt`
pub(crate) fn decode(json: &str) -> Result<PersistedRecord, PersistError> {
    serde_json::from_str(json).map_err(|e| PersistError::Corrupt(e.to_string()))
}

/// Load the record, degrading every failure to "no record"
pub fn load_or_default(store: &dyn RecordStore) -> Option<PersistedRecord> {
    match store.load() {
        Ok(Some(record)) => {
            log::info!("Loaded record (best {})", record.highest_score);
            Some(record)
        }
        Ok(None) => {
            log::info!("No record found, starting fresh");
            None
        }
        Err(err) => {
            log::warn!("Ignoring stored record: {}", err);
            None
        }
    }
}

/// Fold `score` into the stored record and write it back.
/// Returns the record that was written.
pub fn save_score(store: &mut dyn RecordStore, score: u64) -> Result<PersistedRecord, PersistError> {
    let prior = load_or_default(store);
    let record = PersistedRecord::record(prior, score);
    store.save(&record)?;
    log::info!(
        "Record saved (best {}, last {})",
        record.highest_score,
        record.last_score
    );
    Ok(record)
}

/// Store kept in memory only
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Raw JSON as it would sit in storage
    pub raw: Option<String>,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            saves: 0,
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedRecord>, PersistError> {
        self.raw.as_deref().map(decode).transpose()
    }

    fn save(&mut self, record: &PersistedRecord) -> Result<(), PersistError> {
        self.raw = Some(serde_json::to_string(record)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_score_sequence() {
        let mut store = MemoryStore::new();
        let first = save_score(&mut store, 250).unwrap();
        assert_eq!(first, PersistedRecord { highest_score: 250, last_score: 250 });

        let second = save_score(&mut store, 100).unwrap();
        assert_eq!(second, PersistedRecord { highest_score: 250, last_score: 100 });
        assert_eq!(store.load().unwrap(), Some(second));
        assert_eq!(store.saves, 2);
    }

    #[test]
    fn test_corrupt_record_is_treated_as_absent() {
        let store = MemoryStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(PersistError::Corrupt(_))));
        assert_eq!(load_or_default(&store), None);

        let mut store = store;
        let record = save_score(&mut store, 40).unwrap();
        assert_eq!(record.highest_score, 40);
    }

    #[test]
    fn test_reads_browser_layout() {
        let store = MemoryStore::with_raw(r#"{"highestScore":900,"score":12}"#);
        assert_eq!(
            store.load().unwrap(),
            Some(PersistedRecord { highest_score: 900, last_score: 12 })
        );
    }
}
