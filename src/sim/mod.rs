//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! input capture and storage:
//! - Frame deltas come from the caller
//! - Seeded RNG only
//! - Play-field size and time arrive through platform traits

pub mod logic;
pub mod physics;
pub mod pool;
pub mod rect;
pub mod state;

pub use logic::GameLogic;
pub use physics::PhysicsEngine;
pub use pool::ObjectPool;
pub use rect::Rect;
pub use state::{
    Cup, CupInput, DrinkKind, FallingObject, GameEvent, GameOutcome, GamePhase, ObjectId, ObjectKind,
    SpawnSpec,
};
