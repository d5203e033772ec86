//! Geometry kernel
//!
//! Pure functions over playfield points. Everything here is stateless:
//! - Screen coordinates (Y grows downward)
//! - Angles in radians, normalized to [0, 2π)
//! - Degenerate inputs surface as `GeometryError`, never as NaN

pub mod bounds;
pub mod circle;
pub mod point;

pub use bounds::{SAFE_MAX, SAFE_MIN, clamp_to_safe, in_bounds, max_reach};
pub use circle::Circle;
pub use point::{angle_radians, distance, is_between, is_left, quadrant};
