//! Generator configuration and difficulty presets
//!
//! Every tuned threshold lives here as a named field so it can be adjusted
//! without touching the algorithms.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::timing::TimingConfig;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "medium" | "med" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Slider velocity multiplier
    pub fn slider_multiplier(&self) -> f64 {
        match self {
            Difficulty::Medium => 1.6,
            Difficulty::Hard => 1.8,
        }
    }

    /// Hit window strictness (passed through to the beatmap header)
    pub fn overall_difficulty(&self) -> u8 {
        match self {
            Difficulty::Medium => 6,
            Difficulty::Hard => 7,
        }
    }

    /// How early objects fade in (passed through to the beatmap header)
    pub fn approach_rate(&self) -> u8 {
        match self {
            Difficulty::Medium => 7,
            Difficulty::Hard => 8,
        }
    }

    /// Health drain (passed through to the beatmap header)
    pub fn hp_drain_rate(&self) -> u8 {
        match self {
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }
}

/// Relative weights of the two path shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathShapeWeights {
    pub line: f64,
    pub arc: f64,
}

impl Default for PathShapeWeights {
    fn default() -> Self {
        Self { line: 0.2, arc: 0.8 }
    }
}

/// Generator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // === Planning ===
    /// Frames between waypoints, also the section window size
    pub interval_frames: usize,
    /// Search radius around interval boundaries when sampling positions
    pub leniency_frames: usize,

    // === Sections ===
    /// Hits closer than this may not be split across sections
    pub stack_threshold_frames: usize,
    /// Minimum gap for two hits to become a slider
    pub min_slider_gap_frames: usize,
    /// Dense runs at least this long are thinned out
    pub min_declump_run: usize,
    /// Chance that a two-hit section becomes a slider instead of two circles
    pub slider_pair_probability: f64,
    /// Every n-th section starts a new combo
    pub combo_every_sections: usize,

    // === Paths ===
    pub path_shape_weights: PathShapeWeights,
    /// Chord length divided by this gives the arc control point's offset
    pub arc_offset_divisor: f64,
    /// Offset widenings tried per next stop
    pub arc_offset_attempts: usize,
    /// Fresh next stops drawn before giving up on an arc
    pub arc_redraw_attempts: usize,

    // === Timing ===
    pub timing: TimingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interval_frames: INTERVAL_FRAMES,
            leniency_frames: LENIENCY_FRAMES,

            stack_threshold_frames: STACK_THRESHOLD_FRAMES,
            min_slider_gap_frames: MIN_SLIDER_GAP_FRAMES,
            min_declump_run: MIN_DECLUMP_RUN,
            slider_pair_probability: 0.6,
            combo_every_sections: COMBO_EVERY_SECTIONS,

            path_shape_weights: PathShapeWeights::default(),
            arc_offset_divisor: 4.0,
            arc_offset_attempts: 3,
            arc_redraw_attempts: 5,

            timing: TimingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("interval_frames", self.interval_frames),
            ("stack_threshold_frames", self.stack_threshold_frames),
            ("min_slider_gap_frames", self.min_slider_gap_frames),
            ("combo_every_sections", self.combo_every_sections),
            ("arc_offset_attempts", self.arc_offset_attempts),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(invalid(name, "must be at least 1"));
            }
        }

        // A window's first hit must always be a legal cut
        if self.stack_threshold_frames >= self.interval_frames {
            return Err(invalid(
                "stack_threshold_frames",
                "must be smaller than interval_frames",
            ));
        }
        if self.min_declump_run < 2 {
            return Err(invalid("min_declump_run", "must be at least 2"));
        }
        if !(0.0..=1.0).contains(&self.slider_pair_probability) {
            return Err(invalid("slider_pair_probability", "must be within 0..=1"));
        }
        if !(self.arc_offset_divisor > 0.0 && self.arc_offset_divisor.is_finite()) {
            return Err(invalid("arc_offset_divisor", "must be positive"));
        }

        let PathShapeWeights { line, arc } = self.path_shape_weights;
        let valid_weight = |w: f64| w >= 0.0 && w.is_finite();
        if !valid_weight(line) || !valid_weight(arc) || line + arc <= 0.0 {
            return Err(invalid(
                "path_shape_weights",
                "weights must be non-negative and not both zero",
            ));
        }

        self.timing.validate()
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidTuning {
        name,
        reason: reason.to_string(),
    }
}
