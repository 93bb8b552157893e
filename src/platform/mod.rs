//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Play-field size (canvas bounds on web)
//! - Monotonic time

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Reports the drawable play-field size in pixels
pub trait PlayField {
    /// `None` when the host cannot tell (no canvas, zero-sized layout, ...)
    fn size(&self) -> Option<Vec2>;
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// A play field of fixed size (headless runs, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedPlayField(pub Vec2);

impl PlayField for FixedPlayField {
    fn size(&self) -> Option<Vec2> {
        Some(self.0)
    }
}

/// A clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Wall-clock time since construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// `performance.now()`, falling back to `Date.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

/// Canvas bounding rect, then the window's inner size
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct CanvasPlayField {
    canvas: Option<web_sys::HtmlCanvasElement>,
}

#[cfg(target_arch = "wasm32")]
impl CanvasPlayField {
    pub fn new(canvas: Option<web_sys::HtmlCanvasElement>) -> Self {
        Self { canvas }
    }

    fn window_size() -> Option<Vec2> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some(Vec2::new(w as f32, h as f32))
    }
}

#[cfg(target_arch = "wasm32")]
impl PlayField for CanvasPlayField {
    fn size(&self) -> Option<Vec2> {
        if let Some(canvas) = &self.canvas {
            let rect = canvas.get_bounding_client_rect();
            if rect.width() > 0.0 && rect.height() > 0.0 {
                return Some(Vec2::new(rect.width() as f32, rect.height() as f32));
            }
        }
        log::warn!("Canvas bounds unavailable, using window size");
        Self::window_size()
    }
}

/// The platform's default monotonic clock
pub fn default_clock() -> Box<dyn Clock> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(PerformanceClock)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(InstantClock::new())
    }
}
