//! Path synthesis: one cursor position per frame of a section
//!
//! Two shapes exist. Lines interpolate between two points and cannot leave a
//! convex playfield. Arcs follow the circle through the start, a bulge point
//! off the chord and the end, and must be searched for: the traversal
//! direction may cross the playfield edge, and the sampled points are checked
//! one by one.

use glam::DVec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::section::Section;
use crate::config::GeneratorConfig;
use crate::error::{ConfigError, Error, PathError, Result};
use crate::geom::{Circle, clamp_to_safe, in_bounds, is_between, max_reach};
use crate::timing::SliderVelocity;

/// Closed set of path shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathShape {
    Line,
    Arc,
}

/// Frame-indexed cursor positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub shape: PathShape,
    pub points: Vec<DVec2>,
}

impl Path {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn at(&self, index: usize) -> Option<DVec2> {
        self.points.get(index).copied()
    }

    #[inline]
    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Drop the first `prefix` points
    pub fn trimmed(mut self, prefix: usize) -> Self {
        self.points.drain(..prefix.min(self.points.len()));
        self
    }
}

/// Straight path of `duration` points from `start` to `end` inclusive
pub fn line_path(duration: usize, start: DVec2, end: DVec2) -> std::result::Result<Path, PathError> {
    if duration == 0 {
        return Err(PathError::ZeroDuration);
    }

    // Stay inside the segment's bounding box so endpoints on a playfield
    // edge never round past it
    let (lo, hi) = (start.min(end), start.max(end));
    let delta = end - start;
    let steps = (duration - 1).max(1) as f64;
    let points = (0..duration)
        .map(|i| (start + delta * (i as f64 / steps)).clamp(lo, hi))
        .collect();

    Ok(Path {
        shape: PathShape::Line,
        points,
    })
}

/// Circle through `start`, `end` and a point pushed off the chord midpoint.
///
/// The push is perpendicular to the chord with magnitude chord / `divisor`;
/// it flips to the other side when the first placement is out of bounds.
pub fn bulge_circle(start: DVec2, end: DVec2, divisor: f64) -> std::result::Result<Circle, PathError> {
    let chord = end - start;
    let mid = start + chord / 2.0;
    let offset = DVec2::new(chord.y, -chord.x) / divisor;

    let mut control = mid + offset;
    if !in_bounds(control) {
        control = mid - offset;
    }

    Ok(Circle::from_three_points(start, control, end)?)
}

/// Arc of `duration` points from `start` toward `end` around the bulge
/// circle.
///
/// Travels counter-clockwise unless a boundary crossing lies that way, in
/// which case clockwise. The travelled distance is the natural arc length,
/// or `min_distance` if that is longer.
pub fn arc_path(
    duration: usize,
    start: DVec2,
    end: DVec2,
    divisor: f64,
    min_distance: f64,
) -> std::result::Result<Path, PathError> {
    if duration == 0 {
        return Err(PathError::ZeroDuration);
    }

    let circle = bulge_circle(start, end, divisor)?;
    let crossings = circle.boundary_intersections();

    let (natural, clockwise) = if !crossings.iter().any(|&p| is_between(start, end, p)) {
        (circle.ccw_arc_length(start, end)?, false)
    } else if !crossings.iter().any(|&p| is_between(end, start, p)) {
        (circle.ccw_arc_length(end, start)?, true)
    } else {
        return Err(PathError::NoClearDirection { start, end });
    };

    let distance = natural.max(min_distance);
    let sweep = distance / circle.radius;
    let sweep = if clockwise { -sweep } else { sweep };

    let start_angle = circle.angle_of(start)?;
    let points = circle.sample_arc(start_angle, sweep, duration);

    if let Some((step, &point)) = points.iter().enumerate().find(|(_, p)| !in_bounds(**p)) {
        return Err(PathError::OutOfBounds { step, point });
    }

    Ok(Path {
        shape: PathShape::Arc,
        points,
    })
}

/// Everything path synthesis needs besides the section itself
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    pub config: &'a GeneratorConfig,
    pub velocity: SliderVelocity,
}

impl PathContext<'_> {
    /// Slider pixel length for a span of frames
    pub fn pixel_length(&self, frames: usize) -> Result<f64> {
        Ok(self.velocity.pixel_length(frames, &self.config.timing)?)
    }
}

/// Uniform angle on the counter-clockwise range `start..end`
fn random_angle<R: Rng + ?Sized>(start: f64, end: f64, rng: &mut R) -> f64 {
    let sweep = if start == end || end - start >= TAU {
        TAU
    } else {
        Circle::ccw_sweep(start, end)
    };
    start + rng.random::<f64>() * sweep
}

/// Where the cursor heads first after the previous hit.
///
/// A point on the circle around the previous position whose radius is the
/// distance a slider covers until this section's first hit (capped by the
/// playfield reach), in the widest in-bounds part of that circle.
pub fn random_next_stop<R: Rng + ?Sized>(
    section: &Section,
    ctx: &PathContext<'_>,
    rng: &mut R,
) -> Result<DVec2> {
    let first_hit = section
        .first_hit_frame()
        .ok_or(Error::EmptySection { start: section.start })?;
    let origin = section.last_hit_position;

    let travel = ctx.pixel_length(first_hit - section.last_hit_index)?;
    let circle = Circle::new(origin, travel.min(max_reach(origin)));
    let (start, end) = circle.valid_angle_range()?;

    let point = circle.point_at(random_angle(start, end, rng));
    let clamped = clamp_to_safe(point);
    if clamped != point {
        log::warn!("next stop {point:?} clamped to {clamped:?}");
    }
    Ok(clamped)
}

/// Search for an arc from a random next stop to `end`.
///
/// Each next stop gets `arc_offset_attempts` tries, doubling the bulge
/// divisor every time; then a fresh next stop is drawn, up to
/// `arc_redraw_attempts` times.
pub fn random_arc_path<R: Rng + ?Sized>(
    section: &Section,
    ctx: &PathContext<'_>,
    duration: usize,
    end: DVec2,
    rng: &mut R,
) -> Result<Path> {
    let config = ctx.config;
    let min_distance = ctx.pixel_length(duration)?;
    let mut start = random_next_stop(section, ctx, rng)?;

    for redraw in 0..=config.arc_redraw_attempts {
        if redraw > 0 {
            start = random_next_stop(section, ctx, rng)?;
        }

        let mut divisor = config.arc_offset_divisor;
        for _ in 0..config.arc_offset_attempts {
            match arc_path(duration, start, end, divisor, min_distance) {
                Ok(path) => return Ok(path),
                Err(err) => log::trace!("arc attempt failed: {err}"),
            }
            divisor *= 2.0;
        }
    }

    Err(PathError::Exhausted {
        start,
        end,
        duration,
    }
    .into())
}

/// Draw a shape according to the configured weights
pub fn pick_shape<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Result<PathShape> {
    let weights = config.path_shape_weights;
    let dist = WeightedIndex::new([weights.line, weights.arc]).map_err(|err| {
        ConfigError::InvalidTuning {
            name: "path_shape_weights",
            reason: err.to_string(),
        }
    })?;

    Ok(match dist.sample(rng) {
        0 => PathShape::Line,
        _ => PathShape::Arc,
    })
}

/// Compute a section's path: one in-bounds position per frame.
///
/// The raw path also covers the frames since the previous hit so that it
/// starts near the previous cursor position; that prefix is trimmed off.
/// Failed arc searches fall back to a line.
pub fn synthesize_path<R: Rng + ?Sized>(
    section: &Section,
    ctx: &PathContext<'_>,
    rng: &mut R,
) -> Result<Path> {
    let since_last = section.frames_since_last_hit();
    let duration = section.len_frames() + since_last;
    let end = section.destination;

    let path = match pick_shape(ctx.config, rng)? {
        PathShape::Line => line_path(duration, random_next_stop(section, ctx, rng)?, end)?,
        PathShape::Arc => match random_arc_path(section, ctx, duration, end, rng) {
            Ok(path) => path,
            Err(Error::Path(err)) => {
                log::warn!(
                    "section at frame {}: {err}; falling back to a line",
                    section.start
                );
                line_path(duration, random_next_stop(section, ctx, rng)?, end)?
            }
            Err(err) => return Err(err),
        },
    };

    let path = path.trimmed(since_last);
    if let Some(point) = path.points.iter().copied().find(|p| !in_bounds(*p)) {
        return Err(Error::PathOutOfBounds {
            start: section.start,
            point,
        });
    }
    Ok(path)
}
