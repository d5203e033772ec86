//! Playfield bounds checks
//!
//! Two rectangles matter: the coordinate bounds every finalized path point
//! must satisfy, and the narrower "safe" rectangle (bounds ∩ logical
//! playfield) that waypoints and next stops are drawn from.

use glam::DVec2;

use crate::consts::*;

/// Lower-left and upper-right corners of the safe rectangle
pub const SAFE_MIN: DVec2 = DVec2::new(X_LOWER_BOUND, Y_LOWER_BOUND);
pub const SAFE_MAX: DVec2 = DVec2::new(PLAYFIELD_WIDTH - 1.0, Y_UPPER_BOUND);

/// Whether a point lies within the full-resolution coordinate bounds
#[inline]
pub fn in_bounds(point: DVec2) -> bool {
    (X_LOWER_BOUND..=X_UPPER_BOUND).contains(&point.x)
        && (Y_LOWER_BOUND..=Y_UPPER_BOUND).contains(&point.y)
}

/// Clamp a point into the safe rectangle
#[inline]
pub fn clamp_to_safe(point: DVec2) -> DVec2 {
    point.clamp(SAFE_MIN, SAFE_MAX)
}

/// How far a cursor at `position` may travel for its next stop: a fraction of
/// the distance to the furthest playfield edge.
pub fn max_reach(position: DVec2) -> f64 {
    let furthest = [
        position.x.abs(),
        position.y.abs(),
        (REACH_EDGE_X - position.x).abs(),
        (REACH_EDGE_Y - position.y).abs(),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);

    (furthest * NEXT_STOP_REACH).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        assert!(in_bounds(DVec2::new(0.0, 48.0)));
        assert!(in_bounds(DVec2::new(640.0, 334.0)));
        assert!(in_bounds(DVec2::new(256.0, 192.0)));
        assert!(!in_bounds(DVec2::new(-0.1, 100.0)));
        assert!(!in_bounds(DVec2::new(100.0, 20.0)));
        assert!(!in_bounds(DVec2::new(100.0, 340.0)));
        assert!(!in_bounds(DVec2::new(f64::NAN, 100.0)));
    }

    #[test]
    fn test_clamp_to_safe() {
        let clamped = clamp_to_safe(DVec2::new(-20.0, 400.0));
        assert_eq!(clamped, DVec2::new(0.0, 334.0));
        assert!(in_bounds(clamped));

        let inside = DVec2::new(100.0, 100.0);
        assert_eq!(clamp_to_safe(inside), inside);
    }

    #[test]
    fn test_max_reach() {
        // Furthest edge from the left side is the right edge at 584
        assert_eq!(max_reach(DVec2::new(0.0, 182.0)), 438.0);
        // Centre: right edge at 584 - 256 = 328
        assert_eq!(max_reach(DVec2::new(256.0, 192.0)), 246.0);
    }
}
