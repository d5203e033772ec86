//! Error types
//!
//! Configuration problems are fatal, geometric failures are recovered by the
//! path synthesizer where possible, and invariant violations are surfaced as
//! defects with the offending values attached.

use glam::DVec2;
use thiserror::Error;

/// Malformed configuration or transition table. Never retried.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("transition table has no usable entries")]
    EmptyTransitionTable,

    #[error("no transition candidate other than area {previous} (last key tried: {key})")]
    NoCandidates { key: String, previous: u8 },

    #[error("timing constant `{name}` must be positive, got {value}")]
    NonPositiveTiming { name: &'static str, value: f64 },

    #[error("invalid tuning value `{name}`: {reason}")]
    InvalidTuning { name: &'static str, reason: String },

    #[error("failed to parse JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Degenerate geometric input.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    #[error("points {a:?}, {b:?}, {c:?} are collinear; no circle passes through them")]
    Collinear { a: DVec2, b: DVec2, c: DVec2 },

    #[error("angle of {point:?} around {origin:?} is undefined (leg ratio {ratio})")]
    DegenerateAngle {
        origin: DVec2,
        point: DVec2,
        ratio: f64,
    },
}

/// Path construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    #[error("every direction from {start:?} to {end:?} crosses the playfield boundary")]
    NoClearDirection { start: DVec2, end: DVec2 },

    #[error("path point {point:?} at step {step} leaves the playfield")]
    OutOfBounds { step: usize, point: DVec2 },

    #[error("unable to find a valid arc from {start:?} to {end:?} in {duration} frames")]
    Exhausted {
        start: DVec2,
        end: DVec2,
        duration: usize,
    },

    #[error("path duration must be at least one frame")]
    ZeroDuration,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Rejected input values at the crate boundary.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InputError {
    #[error("timeline value {value} at frame {frame} is not 0 or 1")]
    NonBinaryTimeline { frame: usize, value: u8 },

    #[error("frame argument must be a finite non-negative number, got {0}")]
    MalformedFrame(f64),

    #[error("beats per minute must be positive, got {0}")]
    NonPositiveBpm(f64),
}

/// Top-level generation error. A failed run never yields a partial map.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("section starting at frame {start} contains no hits")]
    EmptySection { start: usize },

    #[error("section starting at frame {start} has no computed path")]
    MissingPath { start: usize },

    #[error("path for section at frame {start} has {len} points, needed index {index}")]
    PathTooShort {
        start: usize,
        len: usize,
        index: usize,
    },

    #[error("finalized path for section at frame {start} leaves the playfield at {point:?}")]
    PathOutOfBounds { start: usize, point: DVec2 },

    #[error("hit object at {time_ms} ms references out-of-bounds position {point:?}")]
    ObjectOutOfBounds { time_ms: u32, point: DVec2 },

    #[error("hit object at {time_ms} ms follows one at {previous_ms} ms")]
    ObjectOrder { time_ms: u32, previous_ms: u32 },

    #[error("section starting at frame {start} begins before the previous hit at {last_hit}")]
    SectionOrder { start: usize, last_hit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
