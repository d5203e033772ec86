//! hitmap-gen - procedural hit-object placement for rhythm-game beatmaps
//!
//! Turns a per-frame binary "hit here" timeline into circles and sliders whose
//! positions follow a Markov-planned, spatially coherent route.
//!
//! Core modules:
//! - `geom`: Geometry kernel (circles, angles, playfield bounds)
//! - `grid`: Area grid over the playfield
//! - `markov`: Transition table and waypoint planner
//! - `timing`: Frame to millisecond conversion
//! - `pipeline`: Sections, path synthesis, hit-object assembly, prediction
//! - `config`: Tuning constants and difficulty presets

pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod markov;
pub mod pipeline;
pub mod timing;

pub use config::{Difficulty, GeneratorConfig};
pub use error::{ConfigError, Error, GeometryError, InputError, PathError, Result};
pub use grid::Area;
pub use markov::TransitionTable;
pub use pipeline::{HitObject, Prediction, Predictor, Timeline};

use glam::DVec2;

/// Playfield and tuning constants
pub mod consts {
    /// Logical playfield (beatmap coordinate space)
    pub const PLAYFIELD_WIDTH: f64 = 512.0;
    pub const PLAYFIELD_HEIGHT: f64 = 384.0;

    /// Padding added around the playfield when dividing it into areas
    pub const PADDING_X: f64 = 64.0;
    pub const PADDING_Y: f64 = 48.0;

    /// Area grid shape (5 x 2 = 10 areas)
    pub const GRID_COLUMNS: u8 = 5;
    pub const GRID_ROWS: u8 = 2;
    pub const AREA_COUNT: u8 = GRID_COLUMNS * GRID_ROWS;

    /// Coordinate bounds every finalized path point must respect
    /// (full-resolution, includes the rendering margin)
    pub const X_LOWER_BOUND: f64 = 0.0;
    pub const X_UPPER_BOUND: f64 = 640.0;
    pub const Y_LOWER_BOUND: f64 = 48.0;
    pub const Y_UPPER_BOUND: f64 = 334.0;

    /// Far edges used when measuring the reach of a next stop
    pub const REACH_EDGE_X: f64 = 584.0;
    pub const REACH_EDGE_Y: f64 = 364.0;
    /// Fraction of the furthest edge distance a next stop may travel
    pub const NEXT_STOP_REACH: f64 = 0.75;

    /// Slider pixels per beat at multiplier 1.0
    pub const BASE_SLIDER_VELOCITY: f64 = 100.0;

    /// Frames between two waypoints
    pub const INTERVAL_FRAMES: usize = 85;
    /// Frames around an interval boundary searched for a known position
    pub const LENIENCY_FRAMES: usize = 16;
    /// Hits closer than this are one burst and must not be split
    pub const STACK_THRESHOLD_FRAMES: usize = 20;
    /// Minimum gap between two hits for them to form a slider
    pub const MIN_SLIDER_GAP_FRAMES: usize = 15;
    /// Minimum dense run length that gets thinned out
    pub const MIN_DECLUMP_RUN: usize = 4;
    /// Every n-th section starts a new combo
    pub const COMBO_EVERY_SECTIONS: usize = 3;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU { 0.0 } else { wrapped }
}

/// Point on a circle at `angle` radians, screen convention (Y grows downward,
/// so positive angles turn "up" the screen)
#[inline]
pub fn point_on_circle(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    DVec2::new(center.x + radius * angle.cos(), center.y - radius * angle.sin())
}
