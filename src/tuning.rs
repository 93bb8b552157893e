//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. The
//! defaults come from [`crate::consts`]; a JSON document may override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay balance knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Falling speed before multipliers (pixels per second)
    pub base_falling_speed: f32,
    /// Spawn interval before the frequency multiplier (milliseconds)
    pub spawn_interval_ms: f32,
    pub heart_chance: f32,
    pub bomb_chance: f32,
    pub catch_width_fraction: f32,
    pub catch_height_fraction: f32,
    /// Distance below the play field after which objects are culled
    pub offscreen_margin: f32,
    pub object_size: f32,
    pub cup_width: f32,
    pub cup_height: f32,
    pub cup_bottom_margin: f32,
    /// Keyboard cup speed (pixels per second)
    pub cup_speed: f32,
    pub reference_frame_ms: f32,
    pub starting_lives: u32,
    pub max_lives: u32,
    pub pool_capacity: usize,
    pub boost_speed_step: f32,
    pub boost_spawn_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_falling_speed: BASE_FALLING_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            heart_chance: HEART_CHANCE,
            bomb_chance: BOMB_CHANCE,
            catch_width_fraction: CUP_ACTIVE_WIDTH_FRACTION,
            catch_height_fraction: CUP_ACTIVE_HEIGHT_FRACTION,
            offscreen_margin: OFFSCREEN_MARGIN,
            object_size: OBJECT_SIZE,
            cup_width: CUP_WIDTH,
            cup_height: CUP_HEIGHT,
            cup_bottom_margin: CUP_BOTTOM_MARGIN,
            cup_speed: CUP_SPEED,
            reference_frame_ms: REFERENCE_FRAME_MS,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
            pool_capacity: POOL_CAPACITY,
            boost_speed_step: BOOST_SPEED_STEP,
            boost_spawn_step: BOOST_SPAWN_STEP,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Like [`Tuning::from_json`], but logs and falls back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning document, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let positive = [
            ("base_falling_speed", self.base_falling_speed),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("object_size", self.object_size),
            ("cup_width", self.cup_width),
            ("cup_height", self.cup_height),
            ("cup_speed", self.cup_speed),
            ("reference_frame_ms", self.reference_frame_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let fractions = [
            ("heart_chance", self.heart_chance),
            ("bomb_chance", self.bomb_chance),
            ("catch_width_fraction", self.catch_width_fraction),
            ("catch_height_fraction", self.catch_height_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }
        if self.heart_chance + self.bomb_chance > 1.0 {
            return Err(invalid("bomb_chance", "heart_chance + bomb_chance exceeds 1"));
        }

        if !self.offscreen_margin.is_finite() || self.offscreen_margin < 0.0 {
            return Err(invalid("offscreen_margin", "must be a non-negative number"));
        }
        if self.starting_lives == 0 {
            return Err(invalid("starting_lives", "must be at least 1"));
        }
        if self.max_lives < self.starting_lives {
            return Err(invalid("max_lives", "must not be below starting_lives"));
        }
        if self.pool_capacity > MAX_POOL_CAPACITY {
            return Err(invalid(
                "pool_capacity",
                format!("must be at most {MAX_POOL_CAPACITY}, got {}", self.pool_capacity),
            ));
        }
        if self.boost_speed_step < 0.0 || self.boost_spawn_step < 0.0 {
            return Err(invalid("boost_speed_step", "boost steps must not be negative"));
        }
        Ok(())
    }
}
