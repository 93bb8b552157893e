//! Player settings and lifetime statistics
//!
//! Persisted through [`crate::persistence::GameStore`]. Both types fill
//! missing fields from their defaults, so older stored documents still load.

use serde::{Deserialize, Serialize};

/// Preferred difficulty (shown on the start screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Best boba count in a single run
    pub high_score: u32,
    pub sound_enabled: bool,
    pub difficulty: Difficulty,
    /// Show FPS counter
    pub show_fps: bool,
    pub particle_effects: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            high_score: 0,
            sound_enabled: true,
            difficulty: Difficulty::Normal,
            show_fps: false,
            particle_effects: true,
        }
    }
}

/// Lifetime statistics across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub games_played: u32,
    pub total_boba_collected: u64,
    /// Most boba collected in one run
    pub best_streak: u32,
    pub average_game_time_ms: f64,
}

impl GameStats {
    /// Fold one finished run into the totals
    pub fn record(&mut self, boba_count: u32, game_time_ms: f64) {
        let played = f64::from(self.games_played);
        let game_time_ms = if game_time_ms.is_finite() { game_time_ms.max(0.0) } else { 0.0 };
        self.average_game_time_ms = (self.average_game_time_ms * played + game_time_ms) / (played + 1.0);
        self.games_played += 1;
        self.total_boba_collected += u64::from(boba_count);
        self.best_streak = self.best_streak.max(boba_count);
    }
}
