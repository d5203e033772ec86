//! Circle geometry for curved slider paths
//!
//! Angles follow the screen convention used throughout the crate: measured
//! counter-clockwise from +X with the Y axis pointing down, normalized to
//! [0, 2π).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::bounds::in_bounds;
use super::point::angle_radians;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::error::GeometryError;
use crate::{normalize_angle, point_on_circle};

/// Below this the three-point determinant is treated as zero
const COLLINEAR_EPSILON: f64 = 1e-9;
/// Intersection points closer than this are the same point (corners, tangents)
const SAME_POINT_EPSILON: f64 = 1e-6;

/// A circle in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The unique circle through three points.
    ///
    /// Fails when the points are collinear (the determinant vanishes).
    pub fn from_three_points(a: DVec2, b: DVec2, c: DVec2) -> Result<Self, GeometryError> {
        let bc_y = b.y - c.y;
        let ca_y = c.y - a.y;
        let ab_y = a.y - b.y;

        let cb_x = c.x - b.x;
        let ac_x = a.x - c.x;
        let ba_x = b.x - a.x;

        let d = 2.0 * (a.x * bc_y + b.x * ca_y + c.x * ab_y);
        if d.abs() < COLLINEAR_EPSILON {
            return Err(GeometryError::Collinear { a, b, c });
        }

        let (a_sq, b_sq, c_sq) = (a.length_squared(), b.length_squared(), c.length_squared());
        let center = DVec2::new(
            (a_sq * bc_y + b_sq * ca_y + c_sq * ab_y) / d,
            (a_sq * cb_x + b_sq * ac_x + c_sq * ba_x) / d,
        );

        Ok(Self {
            center,
            radius: center.distance(a),
        })
    }

    /// Point on the circle at the given angle
    #[inline]
    pub fn point_at(&self, angle: f64) -> DVec2 {
        point_on_circle(self.center, self.radius, angle)
    }

    /// Angle of `point` as seen from the center
    #[inline]
    pub fn angle_of(&self, point: DVec2) -> Result<f64, GeometryError> {
        angle_radians(self.center, point)
    }

    /// Counter-clockwise sweep (radians, [0, 2π)) from one angle to another
    #[inline]
    pub fn ccw_sweep(from: f64, to: f64) -> f64 {
        normalize_angle(to - from)
    }

    /// Arc length between `a` and `b`: the angular difference times the
    /// radius, except that when `a`'s angle exceeds `b`'s by less than π the
    /// long way around (the reflex arc) is measured.
    pub fn arc_length(&self, a: DVec2, b: DVec2) -> Result<f64, GeometryError> {
        let start = self.angle_of(a)?;
        let end = self.angle_of(b)?;

        let diff = (start - end).abs();
        let reflex = start > end && start - end < PI;
        let angle = if reflex { TAU - diff } else { diff };
        Ok(angle * self.radius)
    }

    /// Arc length travelling counter-clockwise from `a` to `b`
    pub fn ccw_arc_length(&self, a: DVec2, b: DVec2) -> Result<f64, GeometryError> {
        let start = self.angle_of(a)?;
        let end = self.angle_of(b)?;
        Ok(Self::ccw_sweep(start, end) * self.radius)
    }

    /// Points where the circle crosses the edges of the 512x384 playfield.
    ///
    /// Solves the circle equation against x = 0, x = 512, y = 0 and y = 384
    /// and keeps the solutions lying on the rectangle's edges.
    pub fn boundary_intersections(&self) -> Vec<DVec2> {
        let Circle { center, radius } = *self;
        let mut points: Vec<DVec2> = Vec::with_capacity(8);

        for y in [0.0, PLAYFIELD_HEIGHT] {
            let v = radius * radius - (y - center.y).powi(2);
            if v < 0.0 {
                continue;
            }
            let half = v.sqrt();
            for x in [center.x - half, center.x + half] {
                if (0.0..=PLAYFIELD_WIDTH).contains(&x) {
                    points.push(DVec2::new(x, y));
                }
            }
        }

        for x in [0.0, PLAYFIELD_WIDTH] {
            let u = radius * radius - (x - center.x).powi(2);
            if u < 0.0 {
                continue;
            }
            let half = u.sqrt();
            for y in [center.y - half, center.y + half] {
                if (0.0..=PLAYFIELD_HEIGHT).contains(&y) {
                    points.push(DVec2::new(x, y));
                }
            }
        }

        let mut unique: Vec<DVec2> = Vec::with_capacity(points.len());
        for p in points {
            if !unique.iter().any(|q| q.distance(p) < SAME_POINT_EPSILON) {
                unique.push(p);
            }
        }
        unique
    }

    /// Widest counter-clockwise angular range of the circle that stays in
    /// bounds, as `(start, end)`.
    ///
    /// A circle touching the boundary fewer than twice is treated as fully
    /// available. If no range between crossings has an in-bounds midpoint,
    /// `start == end` is returned and callers treat it as the full circle.
    pub fn valid_angle_range(&self) -> Result<(f64, f64), GeometryError> {
        if self.radius <= 0.0 {
            return Ok((0.0, TAU));
        }

        let crossings = self.boundary_intersections();
        if crossings.len() < 2 {
            return Ok((0.0, TAU));
        }

        let mut angles = crossings
            .iter()
            .map(|&p| self.angle_of(p))
            .collect::<Result<Vec<_>, _>>()?;
        angles.sort_by(f64::total_cmp);

        let mut best: Option<(f64, f64, f64)> = None;
        for (i, &a) in angles.iter().enumerate() {
            let next = angles[(i + 1) % angles.len()];
            let sweep = Self::ccw_sweep(a, next);
            let mid = self.point_at(a + sweep / 2.0);

            if in_bounds(mid) && best.is_none_or(|(_, _, widest)| sweep > widest) {
                best = Some((a, next, sweep));
            }
        }

        match best {
            Some((start, end, _)) => Ok((start, end)),
            None => {
                log::warn!(
                    "no in-bounds arc on circle at {:?} r={:.1}",
                    self.center,
                    self.radius
                );
                Ok((angles[0], angles[0]))
            }
        }
    }

    /// Sample `num_points` points starting at `start_angle` and sweeping
    /// `sweep` radians (negative sweeps run clockwise). The last point lands
    /// exactly at the end of the sweep.
    pub fn sample_arc(&self, start_angle: f64, sweep: f64, num_points: usize) -> Vec<DVec2> {
        (0..num_points)
            .map(|i| {
                let t = i as f64 / (num_points - 1).max(1) as f64;
                self.point_at(start_angle + t * sweep)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

    #[test]
    fn test_circle_from_three_points() {
        let circle = Circle::from_three_points(
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 4.0),
            DVec2::new(5.0, 3.0),
        )
        .unwrap();

        assert_eq!(circle.center, DVec2::new(3.0, 2.0));
        assert!((circle.radius - 5.0_f64.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_collinear_points_fail() {
        let result = Circle::from_three_points(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        );
        assert!(matches!(result, Err(GeometryError::Collinear { .. })));
    }

    #[test]
    fn test_point_at_quarter_turns() {
        let circle = Circle::new(DVec2::new(256.0, 192.0), 128.0);
        let start = DVec2::new(384.0, 192.0);
        let start_angle = circle.angle_of(start).unwrap();

        let below = circle.point_at(start_angle - FRAC_PI_2);
        let above = circle.point_at(start_angle + FRAC_PI_2);
        assert!((below - DVec2::new(256.0, 320.0)).length() < 1e-9);
        assert!((above - DVec2::new(256.0, 64.0)).length() < 1e-9);
    }

    #[test]
    fn test_arc_length() {
        let circle = Circle::new(DVec2::ZERO, 1.0);
        let h = SQRT_2 / 2.0;
        let right = DVec2::new(1.0, 0.0);
        let upper_right = DVec2::new(h, -h);
        let upper_left = DVec2::new(-h, -h);

        let a = circle.arc_length(right, upper_right).unwrap();
        assert!((a - PI / 4.0).abs() < 0.001);

        let b = circle.arc_length(upper_right, upper_left).unwrap();
        assert!((b - PI / 2.0).abs() < 0.001);

        // Start angle exceeds end angle by less than π: long way around
        let c = circle.arc_length(upper_left, upper_right).unwrap();
        assert!((c - 3.0 * PI / 2.0).abs() < 0.001);
    }

    #[test]
    fn test_arc_length_start_far_past_end() {
        let circle = Circle::new(DVec2::new(256.0, 192.0), 100.0);
        let a = circle.point_at(7.0 * PI / 4.0);
        let b = circle.point_at(PI / 4.0);

        // Start exceeds end by more than π: plain angular difference
        let len = circle.arc_length(a, b).unwrap();
        assert!((len - 1.5 * PI * 100.0).abs() < 1e-6, "got {len}");

        // Counter-clockwise the same trip is a quarter turn each side of zero
        let ccw = circle.ccw_arc_length(a, b).unwrap();
        assert!((ccw - 0.5 * PI * 100.0).abs() < 1e-6, "got {ccw}");
    }

    #[test]
    fn test_ccw_arc_length_matches_reflex_rule() {
        let circle = Circle::new(DVec2::ZERO, 1.0);
        let h = SQRT_2 / 2.0;
        let upper_right = DVec2::new(h, -h);
        let upper_left = DVec2::new(-h, -h);

        let a = circle.arc_length(upper_left, upper_right).unwrap();
        let b = circle.ccw_arc_length(upper_left, upper_right).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_arc_length_scales_with_radius() {
        let circle = Circle::new(DVec2::new(100.0, 100.0), 50.0);
        let a = circle.point_at(0.0);
        let b = circle.point_at(PI);
        assert!((circle.arc_length(a, b).unwrap() - 50.0 * PI).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_intersections_counts() {
        // Well inside: no crossings
        let inner = Circle::new(DVec2::new(256.0, 192.0), 50.0);
        assert!(inner.boundary_intersections().is_empty());

        // Crosses the bottom edge only
        let bottom = Circle::new(DVec2::new(256.0, 360.0), 50.0);
        let pts = bottom.boundary_intersections();
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().all(|p| p.y == 384.0));

        // Near the bottom-left corner: one crossing on each of two edges,
        // the other solutions fall outside the rectangle
        let corner = Circle::new(DVec2::new(20.0, 370.0), 40.0);
        let pts = corner.boundary_intersections();
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| p.x == 0.0));
        assert!(pts.iter().any(|p| p.y == 384.0));

        // Around the top-left corner: two crossings on each edge
        let top_left = Circle::new(DVec2::new(30.0, 30.0), 40.0);
        assert_eq!(top_left.boundary_intersections().len(), 4);
    }

    #[test]
    fn test_valid_angle_range_bottom_edge() {
        let circle = Circle::new(DVec2::new(204.0, 355.0), 80.37616326530608);
        let (start, end) = circle.valid_angle_range().unwrap();

        let expected_start = circle.angle_of(DVec2::new(278.0, 384.0)).unwrap();
        let expected_end = circle.angle_of(DVec2::new(129.0, 384.0)).unwrap();
        assert!((start - expected_start).abs() < 0.1);
        assert!((end - expected_end).abs() < 0.1);
    }

    #[test]
    fn test_valid_angle_range_corner() {
        let circle = Circle::new(DVec2::new(60.0, 360.0), 80.0);
        let (start, end) = circle.valid_angle_range().unwrap();

        let expected_start = circle.angle_of(DVec2::new(136.0, 384.0)).unwrap();
        let expected_end = circle.angle_of(DVec2::new(0.0, 307.0)).unwrap();
        assert!((start - expected_start).abs() < 0.1);
        assert!((end - expected_end).abs() < 0.1);
    }

    #[test]
    fn test_valid_angle_range_free_circle() {
        let circle = Circle::new(DVec2::new(256.0, 192.0), 30.0);
        assert_eq!(circle.valid_angle_range().unwrap(), (0.0, TAU));
    }

    #[test]
    fn test_sample_arc_endpoints() {
        let circle = Circle::new(DVec2::new(256.0, 192.0), 64.0);
        let pts = circle.sample_arc(0.0, PI, 5);
        assert_eq!(pts.len(), 5);
        assert!((pts[0] - DVec2::new(320.0, 192.0)).length() < 1e-9);
        assert!((pts[2] - DVec2::new(256.0, 128.0)).length() < 1e-9);
        assert!((pts[4] - DVec2::new(192.0, 192.0)).length() < 1e-9);
    }
}
