// Color math for the trail: age-based fade and the time-cycling rainbow.
// Visual: newer points are fully opaque, older ones fade a little; with the
// rainbow on, the whole trail slowly sweeps through red → green → blue.

use std::f64::consts::PI;

/// Divisor turning `now + age` (ms) into the sine phase of the rainbow.
const RAINBOW_PERIOD_MS: f64 = 500.0;

/// Fade stretches over five trail lifetimes, so a sample still at the edge of
/// the trail is drawn at alpha 0.8.
const FADE_SPAN: f64 = 5.0;

/// An 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }
}

/// Stroke color with a fractional alpha, as a 2D canvas takes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// Opacity of a sample of the given age: `1 - age / (trail_duration * 5)`.
/// Visual: 1.0 for a fresh point, 0.8 for one about to expire.
#[inline]
pub fn fade_alpha(age: f64, trail_duration: f64) -> f64 {
    1.0 - age / (trail_duration * FADE_SPAN)
}

/// Rainbow color for a sample of `age` ms painted at clock time `now`.
/// Three sine waves, 120° apart, each mapped from [-1,1] to [0,255].
pub fn rainbow(now: f64, age: f64) -> Rgb {
    let time_factor = (now + age) / RAINBOW_PERIOD_MS;
    Rgb::new(
        sine_channel(time_factor),
        sine_channel(time_factor + 2.0 * PI / 3.0),
        sine_channel(time_factor + 4.0 * PI / 3.0),
    )
}

/// Stroke color for one sample: rainbow when enabled, otherwise white.
pub fn stroke_color(rainbow_effect: bool, now: f64, age: f64) -> Rgb {
    if rainbow_effect {
        rainbow(now, age)
    } else {
        Rgb::WHITE
    }
}

#[inline]
fn sine_channel(phase: f64) -> u8 {
    // NaN phases (non-finite clock) saturate to 0 on the cast
    ((phase.sin() + 1.0) * 127.5).floor().clamp(0.0, 255.0) as u8
}
