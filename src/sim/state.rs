//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run started yet (or torn down)
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Outcome emitted, waiting for start/restart
    Ended,
}

/// How a run finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Lose,
}

impl GameOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::Win => "win",
            GameOutcome::Lose => "lose",
        }
    }
}

/// Falling object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Collectible pearl
    #[default]
    Boba,
    /// Ends the run on contact
    Bomb,
    /// Restores a life
    Heart,
}

impl ObjectKind {
    /// Map a uniform roll in [0, 1) to a kind. Hearts are checked first,
    /// then bombs, against the same roll.
    pub fn from_roll(roll: f32, heart_chance: f32, bomb_chance: f32) -> Self {
        if roll < heart_chance {
            ObjectKind::Heart
        } else if roll < heart_chance + bomb_chance {
            ObjectKind::Bomb
        } else {
            ObjectKind::Boba
        }
    }
}

/// Stable handle to a pooled record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A falling object record. Owned by the pool and reused across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: ObjectId,
    /// Top-left corner (pixels)
    pub pos: Vec2,
    /// Pixels per second; `x` is unused by current kinds
    pub vel: Vec2,
    pub size: Vec2,
    pub kind: ObjectKind,
}

impl FallingObject {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::splat(OBJECT_SIZE),
            kind: ObjectKind::Boba,
        }
    }

    /// Restore every field except the id to its default
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
    }

    /// Copy a spawn decision into this record
    pub fn apply(&mut self, spec: &SpawnSpec) {
        self.pos = spec.pos;
        self.vel = spec.vel;
        self.size = Vec2::splat(spec.size);
        self.kind = spec.kind;
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Where and what to spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub kind: ObjectKind,
}

/// The player's cup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cup {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    pub size: Vec2,
}

impl Cup {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Cup centered horizontally, resting just above the bottom of the field
    pub fn centered(field: Vec2, tuning: &Tuning) -> Self {
        Self::new(
            (field.x - tuning.cup_width) / 2.0,
            field.y - tuning.cup_height - tuning.cup_bottom_margin,
            tuning.cup_width,
            tuning.cup_height,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// The rim region that actually catches objects
    pub fn catch_zone(&self, width_fraction: f32, height_fraction: f32) -> Rect {
        self.bounds().top_band(width_fraction, height_fraction)
    }

    /// Keep the cup's box inside `[0, field_width]`
    pub fn clamp_to(&mut self, field_width: f32) {
        let max_x = (field_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }
}

/// Cup movement input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CupInput {
    pub left: bool,
    pub right: bool,
    /// Absolute pointer x within the play field (mouse/touch)
    pub pointer_x: Option<f32>,
    /// Elapsed frame time; the reference frame time is used when absent
    pub frame_ms: Option<f32>,
}

/// Difficulty tier, named after the drink being filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkKind {
    #[default]
    Taro,
    MilkTea,
    Matcha,
}

impl DrinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkKind::Taro => "taro",
            DrinkKind::MilkTea => "milk_tea",
            DrinkKind::Matcha => "matcha",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "taro" => Some(DrinkKind::Taro),
            "milk_tea" | "milktea" | "milk-tea" => Some(DrinkKind::MilkTea),
            "matcha" => Some(DrinkKind::Matcha),
            _ => None,
        }
    }

    /// Boba needed to win
    pub fn target_boba_count(&self) -> u32 {
        match self {
            DrinkKind::Taro => 10,
            DrinkKind::MilkTea => 20,
            DrinkKind::Matcha => 40,
        }
    }

    /// Number of progressive boosts earned at `boba_count`
    pub fn boost_stages_due(&self, boba_count: u32) -> u32 {
        match self {
            DrinkKind::Taro => 0,
            DrinkKind::MilkTea => u32::from(boba_count >= 10),
            // Every +10 boba, stopping before the winning count
            DrinkKind::Matcha => (boba_count / 10).min(3),
        }
    }
}

/// Observable state changes, delivered synchronously to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    BobaCountChanged { count: u32 },
    LivesChanged { lives: u32 },
    MaxLivesReached,
    GameEnded { outcome: GameOutcome },
    TargetBobaCountChanged { count: u32 },
}
