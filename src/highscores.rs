//! Best score persistence
//!
//! A single high-water mark stored as a plain integer string.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys};

/// Persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished run. Returns true if it set a new record.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        true
    }

    /// Load from the store; missing or malformed values read as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(keys::BEST_SCORE) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("Loaded best score {}", score);
                    Self { score }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed best score {:?}", raw);
                    Self::default()
                }
            },
            None => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Save to the store. Failure only costs persistence across sessions.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match store.set(keys::BEST_SCORE, &self.score.to_string()) {
            Ok(()) => log::info!("Best score saved ({})", self.score),
            Err(e) => log::warn!("Best score not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_record_only_higher() {
        let mut best = BestScore::new(10);
        assert!(!best.record(5));
        assert!(!best.record(10));
        assert_eq!(best.score, 10);
        assert!(best.record(11));
        assert_eq!(best.score, 11);
    }

    #[test]
    fn test_load_save_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).score, 0);
        BestScore::new(27).save(&mut store);
        assert_eq!(BestScore::load(&store).score, 27);
    }

    #[test]
    fn test_malformed_value_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(keys::BEST_SCORE, "lots").unwrap();
        assert_eq!(BestScore::load(&store), BestScore::default());
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let mut store = BrokenStore;
        BestScore::new(3).save(&mut store);
        assert_eq!(BestScore::load(&store).score, 0);
    }
}
