//! Player preferences
//!
//! Persisted separately from the best score, one key per value:
//! difficulty as its lowercase name, sound as "true"/"false".

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys};
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty used for the next session
    pub difficulty: Difficulty,
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0), scales every effect's own volume
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            master_volume: 1.0,
        }
    }
}

impl Settings {
    /// Effective volume for an effect (0 when muted)
    pub fn effective_volume(&self, volume: f32) -> f32 {
        if self.sound_enabled {
            (volume * self.master_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load from the store. Bad difficulty falls back to the default;
    /// sound is on unless explicitly stored as "false".
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = store.get(keys::DIFFICULTY) {
            match raw.parse::<Difficulty>() {
                Ok(difficulty) => settings.difficulty = difficulty,
                Err(e) => log::warn!("{}; using {}", e, settings.difficulty),
            }
        }

        if let Some(raw) = store.get(keys::SOUND) {
            settings.sound_enabled = raw.trim() != "false";
        }

        log::info!("Settings loaded: {}", settings.to_json());
        settings
    }

    /// Save to the store (failures are logged and ignored)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let writes = [
            (keys::DIFFICULTY, self.difficulty.as_str().to_string()),
            (keys::SOUND, self.sound_enabled.to_string()),
        ];
        for (key, value) in writes {
            if let Err(e) = store.set(key, &value) {
                log::warn!("Settings not saved: {}", e);
                return;
            }
        }
        log::debug!("Settings saved");
    }

    /// JSON snapshot (debug overlay / logs)
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_round_trip_semantic_types() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Insane,
            sound_enabled: false,
            master_volume: 1.0,
        };
        settings.save(&mut store);
        assert_eq!(store.get(keys::DIFFICULTY).as_deref(), Some("insane"));
        assert_eq!(store.get(keys::SOUND).as_deref(), Some("false"));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_bad_difficulty_falls_back() {
        let mut store = MemoryStore::new();
        store.set(keys::DIFFICULTY, "nightmare").unwrap();
        assert_eq!(Settings::load(&store).difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(0.12), 0.12);
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effective_volume(0.12), 0.0);
    }

    #[test]
    fn test_json_snapshot() {
        let json = Settings::default().to_json();
        assert!(json.contains("\"difficulty\":\"normal\""));
    }

    #[test]
    fn test_loaded_snapshot_reflects_store() {
        let mut store = MemoryStore::new();
        store.set(keys::DIFFICULTY, "hard").unwrap();
        store.set(keys::SOUND, "false").unwrap();
        let json = Settings::load(&store).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["difficulty"], "hard");
        assert_eq!(value["sound_enabled"], false);
    }
}
