//! Persistence adapter for high scores
//!
//! Features:
//! - Typed JSON `get`/`set` over a pluggable string store
//! - Never fails outward: unreadable data yields the default, failed writes
//!   are logged and dropped
//! - High-score lists are rewritten in a single write

pub mod store;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::highscores::HighScores;
pub use store::{KeyValueStore, MemoryStore, StorageError, UnavailableStore};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;

/// A store shared between several engines on one page
impl<S: KeyValueStore> KeyValueStore for Rc<RefCell<S>> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.try_borrow()
            .map_err(|_| StorageError::Unavailable)?
            .read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.try_borrow_mut()
            .map_err(|_| StorageError::Unavailable)?
            .write(key, value)
    }
}

/// Storage access that degrades instead of failing
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    date_source: Box<dyn Fn() -> String>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            date_source: Box::new(crate::platform::today_iso),
        }
    }

    /// Process-local storage
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Browser LocalStorage, or in-memory when the browser refuses it
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match LocalStorage::open() {
            Some(storage) => Self::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, high scores will not persist");
                Self::in_memory()
            }
        }
    }

    /// Replace the date stamp used for new high-score entries
    pub fn with_date_source(mut self, source: impl Fn() -> String + 'static) -> Self {
        self.date_source = Box::new(source);
        self
    }

    /// Read and decode `key`, falling back to `default` on any failure
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.read(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Discarding unreadable {}: {}", key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::warn!("{}", e);
                default
            }
        }
    }

    /// Encode and write `value`; returns whether the write landed
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(|e| StorageError::Encode {
                key: key.to_string(),
                reason: e.to_string(),
            })
            .and_then(|json| self.store.write(key, &json));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Current high-score list under `key`
    pub fn highscores(&self, key: &str, max_entries: usize) -> HighScores {
        self.get(key, HighScores::new()).normalized(max_entries)
    }

    /// Append a score, sort, truncate, and write the list back in one write
    pub fn add_highscore(&mut self, key: &str, score: u64, max_entries: usize) -> HighScores {
        let mut scores = self.highscores(key, max_entries);
        let date = (self.date_source)();
        if let Some(rank) = scores.add_score(score, date, max_entries) {
            log::info!("High score #{} under {}: {}", rank, key, score);
            self.set(key, &scores);
        }
        scores
    }
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_date() -> String {
        "2026-10-19".to_string()
    }

    #[test]
    fn test_get_and_set() {
        let mut p = Persistence::in_memory();
        assert_eq!(p.get("missing", 7u64), 7);
        assert!(p.set("best", &42u64));
        assert_eq!(p.get("best", 0u64), 42);
    }

    #[test]
    fn test_corrupt_data_yields_default() {
        let mut store = MemoryStore::new();
        store.write("scores", "{not json").unwrap();
        let p = Persistence::new(store);
        assert!(p.highscores("scores", 4).is_empty());
    }

    #[test]
    fn test_add_highscore_writes_whole_list() {
        let shared = Rc::new(RefCell::new(MemoryStore::new()));
        let mut p = Persistence::new(shared.clone()).with_date_source(fixed_date);

        p.add_highscore("scores", 30, 2);
        p.add_highscore("scores", 50, 2);
        let list = p.add_highscore("scores", 40, 2);

        let scores: Vec<u64> = list.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 40]);

        let raw = shared.borrow().read("scores").unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"score":50,"date":"2026-10-19"},{"score":40,"date":"2026-10-19"}]"#
        );
    }

    #[test]
    fn test_unavailable_storage_never_fails() {
        let mut p = Persistence::new(UnavailableStore).with_date_source(fixed_date);
        assert!(p.highscores("scores", 4).is_empty());
        assert!(!p.set("best", &1u64));
        // The in-memory result still reflects the score even though nothing was stored
        let list = p.add_highscore("scores", 10, 4);
        assert_eq!(list.top_score(), Some(10));
        assert!(p.highscores("scores", 4).is_empty());
    }
}
