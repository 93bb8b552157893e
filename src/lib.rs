//! Boba Drop - A falling-pearl catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (object pool, physics, game logic)
//! - `platform`: Browser/native play-field and clock abstraction
//! - `persistence`: Settings and statistics storage collaborator
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, GameSettings, GameStats};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Falling speed before multipliers (pixels per second)
    pub const BASE_FALLING_SPEED: f32 = 150.0;
    /// Time between spawns before the frequency multiplier (milliseconds)
    pub const SPAWN_INTERVAL_MS: f32 = 1000.0;
    /// Chance a spawn is a heart (checked first)
    pub const HEART_CHANCE: f32 = 0.05;
    /// Chance a spawn is a bomb (checked after hearts, same roll)
    pub const BOMB_CHANCE: f32 = 0.2;

    /// Active catch zone: fraction of cup width, centered
    pub const CUP_ACTIVE_WIDTH_FRACTION: f32 = 0.6;
    /// Active catch zone: fraction of cup height, anchored at the rim
    pub const CUP_ACTIVE_HEIGHT_FRACTION: f32 = 0.15;

    /// Objects further than this below the play field are culled
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Falling objects are square sprites (32px art at 2x)
    pub const OBJECT_SIZE: f32 = 64.0;
    /// Cup sprite size (64x80 art at 2x)
    pub const CUP_WIDTH: f32 = 128.0;
    pub const CUP_HEIGHT: f32 = 160.0;
    /// Gap between the cup and the bottom of the play field
    pub const CUP_BOTTOM_MARGIN: f32 = 20.0;
    /// Keyboard cup speed (pixels per second)
    pub const CUP_SPEED: f32 = 400.0;
    /// Frame time assumed for keyboard movement when none is supplied
    pub const REFERENCE_FRAME_MS: f32 = 16.67;

    /// Lives at run start
    pub const STARTING_LIVES: u32 = 3;
    /// Hearts cannot push lives above this
    pub const MAX_LIVES: u32 = 5;

    /// Records created ahead of the first spawns
    pub const POOL_CAPACITY: usize = 20;
    /// Largest pool reservation a tuning document may ask for
    pub const MAX_POOL_CAPACITY: usize = 4096;

    /// Progressive boost increments per stage
    pub const BOOST_SPEED_STEP: f32 = 0.2;
    pub const BOOST_SPAWN_STEP: f32 = 0.15;
}

/// Play-field size used when the host cannot report one
pub const FALLBACK_PLAY_FIELD: Vec2 = Vec2::new(1024.0, 768.0);

/// Replace a missing or degenerate play-field size with [`FALLBACK_PLAY_FIELD`]
#[inline]
pub fn sanitize_play_field(size: Option<Vec2>) -> Vec2 {
    match size {
        Some(s) if s.is_finite() && s.x > 0.0 && s.y > 0.0 => s,
        _ => FALLBACK_PLAY_FIELD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_play_field() {
        assert_eq!(sanitize_play_field(Some(Vec2::new(640.0, 480.0))), Vec2::new(640.0, 480.0));
        assert_eq!(sanitize_play_field(None), FALLBACK_PLAY_FIELD);
        assert_eq!(sanitize_play_field(Some(Vec2::new(0.0, 480.0))), FALLBACK_PLAY_FIELD);
        assert_eq!(sanitize_play_field(Some(Vec2::new(f32::NAN, 480.0))), FALLBACK_PLAY_FIELD);
    }
}
