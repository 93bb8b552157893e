//! Settings and statistics persistence
//!
//! The simulation never touches storage directly; it calls a [`GameStore`]
//! once per finished run. [`KeyValueStore`] implements the store as JSON
//! documents over any string key/value [`Backend`]: LocalStorage in the
//! browser, a map in memory elsewhere.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{GameSettings, GameStats};

pub const SETTINGS_KEY: &str = "boba-game-settings";
pub const STATS_KEY: &str = "boba-game-stats";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage backend rejected `{key}`")]
    Backend { key: String },
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings/statistics collaborator invoked by the game at run end
pub trait GameStore {
    /// Stored settings, or defaults when missing/unreadable
    fn settings(&self) -> GameSettings;
    fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StoreError>;
    /// Stored statistics, or defaults when missing/unreadable
    fn stats(&self) -> GameStats;
    fn record_result(&mut self, boba_count: u32, game_time_ms: f64) -> Result<(), StoreError>;

    /// Save `score` as the high score if it beats the stored one
    fn update_high_score(&mut self, score: u32) -> Result<bool, StoreError> {
        let mut settings = self.settings();
        if score > settings.high_score {
            settings.high_score = score;
            self.save_settings(&settings)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// A string key/value storage backend
pub trait Backend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl Backend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Backend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?.get_item(key).map_err(|_| StoreError::Backend { key: key.to_string() })
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::Backend { key: key.to_string() })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| StoreError::Backend { key: key.to_string() })
    }
}

/// Everything the store holds, for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub settings: GameSettings,
    pub stats: GameStats,
}

/// [`GameStore`] over a key/value backend, one JSON document per key
#[derive(Debug, Clone, Default)]
pub struct KeyValueStore<B: Backend> {
    backend: B,
}

impl<B: Backend> KeyValueStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn load<T: Default + for<'de> Deserialize<'de>>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Failed to load `{}`, using defaults: {}", key, e);
                T::default()
            }
        }
    }

    fn try_load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set_item(key, &json)
    }

    /// Serialize settings and stats into one document
    pub fn export_data(&self) -> Result<String, StoreError> {
        let data = GameData {
            settings: self.settings(),
            stats: self.stats(),
        };
        Ok(serde_json::to_string(&data)?)
    }

    /// Replace settings and stats from an exported document
    pub fn import_data(&mut self, json: &str) -> Result<(), StoreError> {
        let data: GameData = serde_json::from_str(json)?;
        self.save(SETTINGS_KEY, &data.settings)?;
        self.save(STATS_KEY, &data.stats)?;
        log::info!("Imported game data ({} games played)", data.stats.games_played);
        Ok(())
    }

    /// Forget everything
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.backend.remove_item(SETTINGS_KEY)?;
        self.backend.remove_item(STATS_KEY)
    }
}

impl<B: Backend> GameStore for KeyValueStore<B> {
    fn settings(&self) -> GameSettings {
        self.load(SETTINGS_KEY)
    }

    fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StoreError> {
        self.save(SETTINGS_KEY, settings)
    }

    fn stats(&self) -> GameStats {
        self.load(STATS_KEY)
    }

    fn record_result(&mut self, boba_count: u32, game_time_ms: f64) -> Result<(), StoreError> {
        let mut stats = self.stats();
        stats.record(boba_count, game_time_ms);
        self.save(STATS_KEY, &stats)?;
        log::info!(
            "Recorded run: {} boba in {:.1}s ({} games played)",
            boba_count,
            game_time_ms / 1000.0,
            stats.games_played
        );
        Ok(())
    }
}

/// Store kept in memory for the session
pub type MemoryStore = KeyValueStore<MemoryBackend>;

/// Store persisted to browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub type LocalStore = KeyValueStore<LocalStorageBackend>;
