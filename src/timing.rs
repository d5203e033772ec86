//! Frame timing
//!
//! Frames come from an STFT over the song: frame `n` is centred on sample
//! `n * hop + n_fft / 2`.

use serde::{Deserialize, Serialize};

use crate::consts::BASE_SLIDER_VELOCITY;
use crate::error::{ConfigError, InputError};

/// Audio-analysis constants that define what a frame is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Samples per second
    pub sample_rate: f64,
    /// Samples between consecutive frames
    pub hop_length: f64,
    /// FFT window size in samples
    pub fft_window: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050.0,
            hop_length: 256.0,
            fft_window: 512.0,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("sample_rate", self.sample_rate),
            ("hop_length", self.hop_length),
            ("fft_window", self.fft_window),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositiveTiming { name, value });
            }
        }
        Ok(())
    }

    /// Timestamp in milliseconds of a frame index
    pub fn frames_to_ms(&self, frames: f64) -> Result<f64, InputError> {
        check_frames(frames)?;
        let samples = (frames * self.hop_length + (self.fft_window / 2.0).floor()).floor();
        Ok(samples / self.sample_rate * 1000.0)
    }

    /// Length in milliseconds of a span of frames
    pub fn span_to_ms(&self, frames: f64) -> Result<f64, InputError> {
        check_frames(frames)?;
        Ok(frames * self.hop_length / self.sample_rate * 1000.0)
    }
}

fn check_frames(frames: f64) -> Result<(), InputError> {
    if frames.is_finite() && frames >= 0.0 {
        Ok(())
    } else {
        Err(InputError::MalformedFrame(frames))
    }
}

/// Duration of one beat in milliseconds
pub fn bpm_to_beat_duration_ms(bpm: f64) -> Result<f64, InputError> {
    if bpm > 0.0 && bpm.is_finite() {
        Ok(60_000.0 / bpm)
    } else {
        Err(InputError::NonPositiveBpm(bpm))
    }
}

/// How fast sliders travel, in playfield pixels per beat scaled by the
/// difficulty's slider multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderVelocity {
    pub beat_duration_ms: f64,
    pub slider_multiplier: f64,
}

impl SliderVelocity {
    pub fn new(beat_duration_ms: f64, slider_multiplier: f64) -> Result<Self, ConfigError> {
        if !(beat_duration_ms > 0.0 && beat_duration_ms.is_finite()) {
            return Err(ConfigError::NonPositiveTiming {
                name: "beat_duration_ms",
                value: beat_duration_ms,
            });
        }
        if !(slider_multiplier > 0.0 && slider_multiplier.is_finite()) {
            return Err(ConfigError::InvalidTuning {
                name: "slider_multiplier",
                reason: format!("must be positive, got {slider_multiplier}"),
            });
        }
        Ok(Self {
            beat_duration_ms,
            slider_multiplier,
        })
    }

    /// Pixel length a slider covers over `frames` frames
    pub fn pixel_length(&self, frames: usize, timing: &TimingConfig) -> Result<f64, InputError> {
        let ms = timing.span_to_ms(frames as f64)?;
        Ok(ms / self.beat_duration_ms * BASE_SLIDER_VELOCITY * self.slider_multiplier)
    }
}
