// Trail configuration and the shallow-merge rule used by start/update_config.
// Visual: these four knobs decide how long the trail lingers, how thick it is,
// how much it glows, and whether it cycles through the rainbow.

use serde::Deserialize;
use std::path::Path;

use crate::error::Error;

pub const DEFAULT_TRAIL_DURATION_MS: f64 = 300.0;
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;
pub const DEFAULT_SHADOW_BLUR: f64 = 9.0;

/// Live configuration of a trail engine.
///
/// Values are not range-checked: a zero or negative duration simply makes every
/// sample expire immediately, a negative blur disables the glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    /// Maximum age (ms) a sample stays on screen
    pub trail_duration: f64,
    /// Stroke width in pixels
    pub line_width: f64,
    /// Glow radius in pixels
    pub shadow_blur: f64,
    /// Cycle colors over time instead of drawing white
    pub rainbow_effect: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            trail_duration: DEFAULT_TRAIL_DURATION_MS,
            line_width: DEFAULT_LINE_WIDTH,
            shadow_blur: DEFAULT_SHADOW_BLUR,
            rainbow_effect: true,
        }
    }
}

impl TrailConfig {
    /// Shallow merge: every field set in `patch` overrides, the rest is kept.
    pub fn merge(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.trail_duration {
            self.trail_duration = v;
        }
        if let Some(v) = patch.line_width {
            self.line_width = v;
        }
        if let Some(v) = patch.shadow_blur {
            self.shadow_blur = v;
        }
        if let Some(v) = patch.rainbow_effect {
            self.rainbow_effect = v;
        }
    }
}

/// Partial configuration. Unknown JSON keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub trail_duration: Option<f64>,
    pub line_width: Option<f64>,
    pub shadow_blur: Option<f64>,
    pub rainbow_effect: Option<bool>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trail_duration(mut self, ms: f64) -> Self {
        self.trail_duration = Some(ms);
        self
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn shadow_blur(mut self, blur: f64) -> Self {
        self.shadow_blur = Some(blur);
        self
    }

    pub fn rainbow_effect(mut self, enabled: bool) -> Self {
        self.rainbow_effect = Some(enabled);
        self
    }

    /// Layer `other` on top of `self` (fields set in `other` win).
    pub fn overlay(self, other: &ConfigPatch) -> Self {
        Self {
            trail_duration: other.trail_duration.or(self.trail_duration),
            line_width: other.line_width.or(self.line_width),
            shadow_blur: other.shadow_blur.or(self.shadow_blur),
            rainbow_effect: other.rainbow_effect.or(self.rainbow_effect),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::ConfigParse)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
