// Core value types shared by the engine, the host boundary and the canvas.

/// A position in surface pixel coordinates (same space as the pointer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One timestamped pointer position.
/// Visual: each sample becomes one joint of the trail polyline until it expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    x: f64,
    y: f64,
    captured_at: f64, // clock milliseconds when the pointer was here
}

impl Sample {
    pub fn new(x: f64, y: f64, captured_at: f64) -> Self {
        Self { x, y, captured_at }
    }

    pub fn captured_at(&self) -> f64 {
        self.captured_at
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Milliseconds elapsed between capture and `now`.
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.captured_at
    }
}

/// Size of the visible area the overlay must cover, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
