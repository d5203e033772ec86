//! Hit-object assembly
//!
//! Turns a section's hits and path into circles and sliders. Hits far enough
//! apart pair up into sliders; dense runs become circles, thinned out when the
//! run is long enough to pile up on screen.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::path::{Path, PathContext};
use super::section::Section;
use crate::error::{Error, Result};

/// Slider curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Circular arc through the start and two control points
    PerfectCircle,
}

impl CurveKind {
    /// Single-letter code used by the beatmap format
    pub fn code(&self) -> char {
        match self {
            CurveKind::PerfectCircle => 'P',
        }
    }
}

/// A placed, timed hit object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitObject {
    Circle {
        position: DVec2,
        time_ms: u32,
        new_combo: bool,
    },
    Slider {
        position: DVec2,
        time_ms: u32,
        curve: CurveKind,
        control_points: Vec<DVec2>,
        repeats: u32,
        pixel_length: f64,
        new_combo: bool,
    },
}

impl HitObject {
    pub fn time_ms(&self) -> u32 {
        match self {
            HitObject::Circle { time_ms, .. } | HitObject::Slider { time_ms, .. } => *time_ms,
        }
    }

    pub fn position(&self) -> DVec2 {
        match self {
            HitObject::Circle { position, .. } | HitObject::Slider { position, .. } => *position,
        }
    }

    pub fn new_combo(&self) -> bool {
        match self {
            HitObject::Circle { new_combo, .. } | HitObject::Slider { new_combo, .. } => *new_combo,
        }
    }

    pub fn is_slider(&self) -> bool {
        matches!(self, HitObject::Slider { .. })
    }

    /// Beatmap type bits: 1 circle, 2 slider, plus 4 on a combo start
    pub fn type_flags(&self) -> u8 {
        let base = match self {
            HitObject::Circle { .. } => 1,
            HitObject::Slider { .. } => 2,
        };
        if self.new_combo() { base | 4 } else { base }
    }

    /// Every coordinate the object references
    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        let control: &[DVec2] = match self {
            HitObject::Circle { .. } => &[],
            HitObject::Slider { control_points, .. } => control_points,
        };
        std::iter::once(self.position()).chain(control.iter().copied())
    }
}

/// Spread `ceil(n / 2)` offsets evenly over the span of `offsets`, keeping
/// the first and last. Two or fewer offsets come back unchanged.
pub fn intersperse(offsets: &[usize]) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (offsets.first(), offsets.last()) else {
        return Vec::new();
    };
    if offsets.len() <= 2 {
        return offsets.to_vec();
    }

    let count = offsets.len().div_ceil(2);
    let span = (last - first) as f64;
    let stride = span / (count - 1) as f64;
    (0..count)
        .map(|j| first + (j as f64 * stride).round() as usize)
        .collect()
}

/// Circles for the dense run starting at `offsets[from]`.
///
/// The run continues while consecutive hits are closer than `min_gap`.
/// Returns the offsets to render and the index after the run.
pub fn declump(offsets: &[usize], from: usize, min_gap: usize, min_run: usize) -> (Vec<usize>, usize) {
    let mut end = from;
    while end + 1 < offsets.len() && offsets[end + 1] - offsets[end] < min_gap {
        end += 1;
    }

    let run = &offsets[from..=end];
    let kept = if run.len() < min_run {
        run.to_vec()
    } else {
        intersperse(run)
    };
    (kept, end + 1)
}

/// Builds objects for one section, handing out the combo flag once
struct Emitter<'a> {
    section: &'a Section,
    path: &'a Path,
    ctx: &'a PathContext<'a>,
    new_combo: bool,
    objects: Vec<HitObject>,
}

impl<'a> Emitter<'a> {
    fn new(section: &'a Section, ctx: &'a PathContext<'a>) -> Result<Self> {
        let path = section
            .path
            .as_ref()
            .ok_or(Error::MissingPath { start: section.start })?;
        Ok(Self {
            section,
            path,
            ctx,
            new_combo: section.new_combo,
            objects: Vec::new(),
        })
    }

    fn point(&self, offset: usize) -> Result<DVec2> {
        self.path.at(offset).ok_or(Error::PathTooShort {
            start: self.section.start,
            len: self.path.len(),
            index: offset,
        })
    }

    fn time_ms(&self, offset: usize) -> Result<u32> {
        let ms = self
            .ctx
            .config
            .timing
            .frames_to_ms((self.section.start + offset) as f64)?;
        Ok(ms.floor() as u32)
    }

    fn take_combo(&mut self) -> bool {
        std::mem::take(&mut self.new_combo)
    }

    fn circle(&mut self, offset: usize) -> Result<()> {
        let position = self.point(offset)?;
        let time_ms = self.time_ms(offset)?;
        let new_combo = self.take_combo();
        self.objects.push(HitObject::Circle {
            position,
            time_ms,
            new_combo,
        });
        Ok(())
    }

    /// Slider from one hit to another, bending through the path midpoint
    fn slider(&mut self, from: usize, to: usize) -> Result<()> {
        let mid = from + (to - from) / 2;
        let position = self.point(from)?;
        let control_points = vec![self.point(mid)?, self.point(to)?];
        let time_ms = self.time_ms(from)?;
        let pixel_length = self.ctx.pixel_length(to - from)?;
        let new_combo = self.take_combo();

        self.objects.push(HitObject::Slider {
            position,
            time_ms,
            curve: CurveKind::PerfectCircle,
            control_points,
            repeats: 1,
            pixel_length,
            new_combo,
        });
        Ok(())
    }

    fn finish(self) -> (Vec<HitObject>, bool) {
        (self.objects, self.new_combo)
    }
}

/// Emit the hit objects for a section whose path has been computed.
///
/// Clears the section's combo flag once an object carries it.
pub fn assemble_section<R: Rng + ?Sized>(
    section: &mut Section,
    ctx: &PathContext<'_>,
    rng: &mut R,
) -> Result<Vec<HitObject>> {
    let offsets = section.hit_offsets();
    let config = ctx.config;
    let mut emitter = Emitter::new(section, ctx)?;

    match offsets.as_slice() {
        [] => return Err(Error::EmptySection { start: section.start }),
        [only] => emitter.circle(*only)?,
        [first, second] => {
            if rng.random_bool(config.slider_pair_probability) {
                emitter.slider(*first, *second)?;
            } else {
                emitter.circle(*first)?;
                emitter.circle(*second)?;
            }
        }
        _ => {
            let mut i = 0;
            while i < offsets.len() {
                let pairs_up = i + 1 < offsets.len()
                    && offsets[i + 1] - offsets[i] >= config.min_slider_gap_frames;

                if pairs_up {
                    emitter.slider(offsets[i], offsets[i + 1])?;
                    i += 2;
                } else {
                    let (kept, next) = declump(
                        &offsets,
                        i,
                        config.min_slider_gap_frames,
                        config.min_declump_run,
                    );
                    for offset in kept {
                        emitter.circle(offset)?;
                    }
                    i = next;
                }
            }
        }
    }

    let (objects, new_combo) = emitter.finish();
    section.new_combo = new_combo;
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::pipeline::path::line_path;
    use crate::timing::SliderVelocity;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn section_with_hits(len: usize, hits: &[usize], new_combo: bool) -> Section {
        let mut flags = vec![false; len];
        for &h in hits {
            flags[h] = true;
        }
        let mut section = Section::new(
            200,
            flags,
            180,
            DVec2::new(100.0, 100.0),
            DVec2::new(300.0, 300.0),
            new_combo,
        )
        .unwrap();
        section.path =
            Some(line_path(len, DVec2::new(100.0, 100.0), DVec2::new(300.0, 300.0)).unwrap());
        section
    }

    fn assemble_with(config: &GeneratorConfig, section: &mut Section) -> Result<Vec<HitObject>> {
        let ctx = PathContext {
            config,
            velocity: SliderVelocity::new(500.0, 1.6).unwrap(),
        };
        let mut rng = Pcg32::seed_from_u64(9);
        assemble_section(section, &ctx, &mut rng)
    }

    #[test]
    fn test_intersperse() {
        assert_eq!(intersperse(&[0, 2, 4, 6, 8, 10]), vec![0, 5, 10]);
        assert_eq!(intersperse(&[3, 9]), vec![3, 9]);
        assert!(intersperse(&[]).is_empty());

        let spread = intersperse(&[10, 12, 14, 17, 19, 21, 24]);
        assert_eq!(spread.len(), 4);
        assert_eq!(spread.first(), Some(&10));
        assert_eq!(spread.last(), Some(&24));
    }

    #[test]
    fn test_declump() {
        // Run of six dense hits halves
        let offsets = [0, 2, 4, 6, 8, 10, 40];
        assert_eq!(declump(&offsets, 0, 15, 4), (vec![0, 5, 10], 6));

        // Run of three stays as is
        let offsets = [0, 4, 8, 40];
        assert_eq!(declump(&offsets, 0, 15, 4), (vec![0, 4, 8], 3));

        // Isolated last hit
        assert_eq!(declump(&offsets, 3, 15, 4), (vec![40], 4));
    }

    #[test]
    fn test_hit_object_flags() {
        let circle = HitObject::Circle {
            position: DVec2::new(10.0, 60.0),
            time_ms: 100,
            new_combo: true,
        };
        assert_eq!(circle.type_flags(), 5);
        assert_eq!(circle.positions().count(), 1);

        let slider = HitObject::Slider {
            position: DVec2::new(10.0, 60.0),
            time_ms: 100,
            curve: CurveKind::PerfectCircle,
            control_points: vec![DVec2::new(20.0, 70.0), DVec2::new(30.0, 60.0)],
            repeats: 1,
            pixel_length: 40.0,
            new_combo: false,
        };
        assert_eq!(slider.type_flags(), 2);
        assert_eq!(slider.positions().count(), 3);
        assert_eq!(CurveKind::PerfectCircle.code(), 'P');
    }

    #[test]
    fn test_single_hit_is_combo_circle() {
        let config = GeneratorConfig::default();
        let mut section = section_with_hits(30, &[10], true);
        let objects = assemble_with(&config, &mut section).unwrap();

        assert_eq!(objects.len(), 1);
        assert!(!objects[0].is_slider());
        assert!(objects[0].new_combo());
        assert_eq!(objects[0].position(), section.path.as_ref().unwrap().at(10).unwrap());
        assert!(!section.new_combo);
    }

    #[test]
    fn test_two_hits_follow_probability() {
        let always = GeneratorConfig {
            slider_pair_probability: 1.0,
            ..Default::default()
        };
        let mut section = section_with_hits(30, &[2, 20], false);
        let objects = assemble_with(&always, &mut section).unwrap();
        assert_eq!(objects.len(), 1);
        match &objects[0] {
            HitObject::Slider {
                control_points,
                repeats,
                ..
            } => {
                let path = section.path.as_ref().unwrap();
                assert_eq!(control_points, &vec![path.at(11).unwrap(), path.at(20).unwrap()]);
                assert_eq!(*repeats, 1);
            }
            other => panic!("expected slider, got {other:?}"),
        }

        let never = GeneratorConfig {
            slider_pair_probability: 0.0,
            ..Default::default()
        };
        let mut section = section_with_hits(30, &[2, 20], false);
        let objects = assemble_with(&never, &mut section).unwrap();
        assert_eq!(objects.len(), 2);
        assert!(objects.iter().all(|o| !o.is_slider()));
        assert!(objects[0].time_ms() < objects[1].time_ms());
    }

    #[test]
    fn test_many_hits_mix_sliders_and_circles() {
        let config = GeneratorConfig::default();
        // Slider pair (0, 20), then a dense run of six, then a lone hit
        let mut section = section_with_hits(80, &[0, 20, 40, 42, 44, 46, 48, 50, 79], true);
        let objects = assemble_with(&config, &mut section).unwrap();

        assert!(objects[0].is_slider());
        assert!(objects[0].new_combo());
        assert!(objects[1..].iter().all(|o| !o.new_combo()));

        let circles: Vec<_> = objects.iter().filter(|o| !o.is_slider()).collect();
        // Six dense hits thinned to three, plus the last hit
        assert_eq!(circles.len(), 4);
        for pair in objects.windows(2) {
            assert!(pair[0].time_ms() <= pair[1].time_ms());
        }
    }

    #[test]
    fn test_empty_and_pathless_sections() {
        let config = GeneratorConfig::default();
        let mut empty = section_with_hits(10, &[], false);
        assert_eq!(
            assemble_with(&config, &mut empty),
            Err(Error::EmptySection { start: 200 })
        );

        let mut pathless = section_with_hits(10, &[3], false);
        pathless.path = None;
        assert_eq!(
            assemble_with(&config, &mut pathless),
            Err(Error::MissingPath { start: 200 })
        );
    }
}
