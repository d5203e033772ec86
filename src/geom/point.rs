//! Point-level geometry in screen coordinates
//!
//! The Y axis is INVERTED (grows downward), so quadrant 1 is up-left and
//! quadrant 3 is down-right.

use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

use crate::error::GeometryError;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Quadrant (0..=3) that `point` occupies around `origin`.
///
/// A point exactly to the right of the origin is quadrant 0. Straight up
/// belongs to quadrant 1, straight down to quadrant 3, straight left to 2.
pub fn quadrant(origin: DVec2, point: DVec2) -> u8 {
    if origin.x < point.x && origin.y == point.y {
        return 0;
    }

    if origin.x >= point.x && origin.y > point.y {
        1
    } else if origin.x <= point.x && origin.y < point.y {
        3
    } else if origin.x <= point.x {
        0
    } else {
        2
    }
}

/// Angle in radians ([0, 2π)) of the ray from `origin` to `point`.
///
/// Solved from the right triangle inside the point's quadrant: the leg
/// opposite the quadrant's start axis over the hypotenuse gives the sine of
/// the angle within the quadrant.
pub fn angle_radians(origin: DVec2, point: DVec2) -> Result<f64, GeometryError> {
    let q = quadrant(origin, point);
    let delta = point - origin;

    let opposite = if q == 1 || q == 3 {
        delta.x.abs()
    } else {
        delta.y.abs()
    };
    let hypotenuse = delta.length();
    let ratio = opposite / hypotenuse;

    // NaN (zero hypotenuse) fails the range check as well
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(GeometryError::DegenerateAngle {
            origin,
            point,
            ratio,
        });
    }

    Ok(ratio.asin() + q as f64 * FRAC_PI_2)
}

/// Cross-product side test.
///
/// Returns true if `end` lies on the left of the ray `start -> pass_through`
/// as seen on screen.
#[inline]
pub fn is_left(start: DVec2, pass_through: DVec2, end: DVec2) -> bool {
    (pass_through.x - start.x) * (end.y - start.y) - (pass_through.y - start.y) * (end.x - start.x)
        < 0.0
}

/// Whether `c` lies on the counter-clockwise arc running from `a` to `b`,
/// for three points on a common circle.
#[inline]
pub fn is_between(a: DVec2, b: DVec2, c: DVec2) -> bool {
    is_left(a, c, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, SQRT_2};

    #[test]
    fn test_quadrant_unit_circle() {
        let origin = DVec2::ZERO;
        let h = SQRT_2 / 2.0;

        assert_eq!(quadrant(origin, DVec2::new(1.0, 0.0)), 0);
        assert_eq!(quadrant(origin, DVec2::new(h, -h)), 0);
        assert_eq!(quadrant(origin, DVec2::new(0.0, -1.0)), 1);
        assert_eq!(quadrant(origin, DVec2::new(-h, -h)), 1);
        assert_eq!(quadrant(origin, DVec2::new(-1.0, 0.0)), 2);
        assert_eq!(quadrant(origin, DVec2::new(-h, h)), 2);
        assert_eq!(quadrant(origin, DVec2::new(0.0, 1.0)), 3);
        assert_eq!(quadrant(origin, DVec2::new(h, h)), 3);
    }

    #[test]
    fn test_angle_radians() {
        let origin = DVec2::ZERO;
        let cases = [
            (DVec2::new(90.0, 0.0), 0.0),
            (DVec2::new(0.0, 90.0), 3.0 * PI / 2.0),
            (DVec2::new(-90.0, 90.0), 5.0 * PI / 4.0),
            (DVec2::new(-90.0, 0.0), PI),
            (DVec2::new(90.0, 90.0), 7.0 * PI / 4.0),
            (DVec2::new(0.0, -90.0), PI / 2.0),
        ];

        for (point, expected) in cases {
            let actual = angle_radians(origin, point).unwrap();
            assert!(
                (actual - expected).abs() < 1e-9,
                "angle of {point:?}: expected {expected}, got {actual}"
            );
        }

        let shallow = angle_radians(origin, DVec2::new(90.0, 45.0)).unwrap();
        assert!((shallow - 15.0 * PI / 8.0).abs() < 0.1);
    }

    #[test]
    fn test_angle_of_coincident_points_is_error() {
        let p = DVec2::new(10.0, 10.0);
        assert!(matches!(
            angle_radians(p, p),
            Err(GeometryError::DegenerateAngle { .. })
        ));
    }

    #[test]
    fn test_is_between() {
        // Counter-clockwise from right to left passes over the top
        assert!(is_between(
            DVec2::new(1.0, 0.0),
            DVec2::new(-1.0, 0.0),
            DVec2::new(0.0, -1.0)
        ));
        assert!(is_between(
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, -1.0)
        ));
        // ...and not underneath
        assert!(!is_between(
            DVec2::new(1.0, 0.0),
            DVec2::new(-1.0, 0.0),
            DVec2::new(0.0, 1.0)
        ));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)), 5.0);
    }
}
