//! Falling motion, spawn timing and cup collision
//!
//! Objects fall straight down at a speed scaled by a run-wide multiplier.
//! Collision is two-phase: a cheap bounding-box rejection against the whole
//! cup, then an overlap test against the cup's rim (the active catch zone),
//! so objects grazing the sides are never caught.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Cup, FallingObject, ObjectKind, SpawnSpec};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    tuning: Tuning,
    spawn_timer_ms: f32,
    speed_multiplier: f32,
    spawn_frequency_multiplier: f32,
    rng: Pcg32,
}

impl PhysicsEngine {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            spawn_timer_ms: 0.0,
            speed_multiplier: 1.0,
            spawn_frequency_multiplier: 1.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Distance fallen over `delta_ms` at the current speed
    pub fn falling_distance(&self, delta_ms: f32) -> f32 {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0.0;
        }
        self.tuning.base_falling_speed * self.speed_multiplier * delta_ms / 1000.0
    }

    /// Move every object down by the distance fallen over `delta_ms`
    pub fn advance<'a>(&self, delta_ms: f32, objects: impl IntoIterator<Item = &'a mut FallingObject>) {
        let dy = self.falling_distance(delta_ms);
        for obj in objects {
            obj.pos.y += dy;
        }
    }

    /// Accumulate spawn time; true once the adjusted interval has elapsed.
    /// The timer restarts from zero, dropping any overshoot.
    pub fn should_spawn(&mut self, delta_ms: f32) -> bool {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.spawn_timer_ms += delta_ms;
        }
        if self.spawn_frequency_multiplier <= 0.0 {
            return false;
        }
        let interval = self.tuning.spawn_interval_ms / self.spawn_frequency_multiplier;
        if self.spawn_timer_ms >= interval {
            self.spawn_timer_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset_spawn_timer(&mut self) {
        self.spawn_timer_ms = 0.0;
    }

    /// Pick a spawn position just above the field and a weighted-random kind
    pub fn spawn_spec(&mut self, canvas_width: f32, object_size: f32) -> SpawnSpec {
        let span = canvas_width - object_size;
        let x = if span.is_finite() && span > 0.0 {
            self.rng.random::<f32>() * span
        } else {
            0.0
        };
        let roll = self.rng.random::<f32>();
        let kind = ObjectKind::from_roll(roll, self.tuning.heart_chance, self.tuning.bomb_chance);

        SpawnSpec {
            pos: Vec2::new(x.max(0.0), -object_size),
            vel: Vec2::new(0.0, self.tuning.base_falling_speed * self.speed_multiplier),
            size: object_size,
            kind,
        }
    }

    /// True when `obj` overlaps the cup's active catch zone.
    /// Non-finite geometry never collides.
    pub fn is_colliding(&self, obj: &FallingObject, cup: &Cup) -> bool {
        let obj_box = obj.bounds();
        let cup_box = cup.bounds();
        if !obj_box.is_valid() || !cup_box.is_valid() {
            return false;
        }

        // Broad phase: whole cup
        if !obj_box.touches(&cup_box) {
            return false;
        }

        // Narrow phase: rim only
        let zone = cup.catch_zone(
            self.tuning.catch_width_fraction,
            self.tuning.catch_height_fraction,
        );
        obj_box.overlaps(&zone)
    }

    /// Lowest `y` an object may reach before it counts as off-screen
    pub fn offscreen_threshold(&self, canvas_height: f32) -> f32 {
        canvas_height + self.tuning.offscreen_margin
    }

    pub fn is_offscreen(&self, obj: &FallingObject, canvas_height: f32) -> bool {
        obj.pos.y > self.offscreen_threshold(canvas_height)
    }

    /// Swap-remove every item whose `y` is past the off-screen threshold and
    /// hand the removed items back. Survivor order is not preserved.
    pub fn split_offscreen<T>(
        &self,
        items: &mut Vec<T>,
        canvas_height: f32,
        mut y_of: impl FnMut(&T) -> f32,
    ) -> Vec<T> {
        let threshold = self.offscreen_threshold(canvas_height);
        let mut removed = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if y_of(&items[i]) > threshold {
                removed.push(items.swap_remove(i));
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Compact `objects` in place, dropping off-screen ones; returns how many were removed
    pub fn cull_offscreen(&self, objects: &mut Vec<FallingObject>, canvas_height: f32) -> usize {
        self.split_offscreen(objects, canvas_height, |obj| obj.pos.y).len()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn spawn_frequency_multiplier(&self) -> f32 {
        self.spawn_frequency_multiplier
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
    }

    pub fn increase_speed_multiplier(&mut self, delta: f32) {
        self.speed_multiplier += delta;
    }

    pub fn set_spawn_frequency_multiplier(&mut self, multiplier: f32) {
        self.spawn_frequency_multiplier = multiplier;
    }

    pub fn increase_spawn_frequency_multiplier(&mut self, delta: f32) {
        self.spawn_frequency_multiplier += delta;
    }

    /// Both multipliers back to 1.0
    pub fn reset_multipliers(&mut self) {
        self.speed_multiplier = 1.0;
        self.spawn_frequency_multiplier = 1.0;
    }
}
