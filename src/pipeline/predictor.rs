//! Whole-timeline prediction
//!
//! Plans waypoints, cuts the timeline into sections and walks them in order.
//! Each section starts from where the previous one left the cursor, so the
//! walk is strictly sequential.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::assemble::{HitObject, assemble_section};
use super::path::{PathContext, synthesize_path};
use super::section::{Section, split_sections};
use super::timeline::Timeline;
use crate::config::{Difficulty, GeneratorConfig};
use crate::error::{ConfigError, Error, Result};
use crate::geom::{SAFE_MAX, SAFE_MIN, in_bounds};
use crate::grid::Area;
use crate::markov::{TransitionTable, plan_waypoints};
use crate::timing::{SliderVelocity, bpm_to_beat_duration_ms};

/// Result of a prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Ordered hit objects, ready for serialization
    pub hit_objects: Vec<HitObject>,
    /// Planned route areas, one per interval
    pub areas: Vec<Area>,
    /// Concrete positions for `areas`
    pub waypoints: Vec<DVec2>,
    /// Seed that reproduces this run
    pub seed: u64,
}

/// Generates hit objects for timelines.
///
/// Every call to [`Predictor::predict`] reseeds from the same seed, so equal
/// timelines give equal predictions.
#[derive(Debug, Clone)]
pub struct Predictor<'a> {
    table: &'a TransitionTable,
    config: GeneratorConfig,
    velocity: SliderVelocity,
    seed: u64,
}

impl<'a> Predictor<'a> {
    /// Without a seed, one is drawn from system entropy and logged
    pub fn new(
        table: &'a TransitionTable,
        config: GeneratorConfig,
        velocity: SliderVelocity,
        seed: Option<u64>,
    ) -> Result<Self> {
        config.validate()?;
        if table.is_empty() {
            return Err(ConfigError::EmptyTransitionTable.into());
        }

        let seed = match seed {
            Some(seed) => seed,
            None => {
                let seed = rand::rng().random();
                log::info!("no seed given, using {seed}");
                seed
            }
        };

        Ok(Self {
            table,
            config,
            velocity,
            seed,
        })
    }

    /// Predictor with default tuning for a difficulty and tempo
    pub fn for_difficulty(
        table: &'a TransitionTable,
        difficulty: Difficulty,
        bpm: f64,
        seed: Option<u64>,
    ) -> Result<Self> {
        let beat = bpm_to_beat_duration_ms(bpm)?;
        let velocity = SliderVelocity::new(beat, difficulty.slider_multiplier())?;
        log::debug!(
            "{} at {bpm} bpm: {beat:.1} ms per beat",
            difficulty.as_str()
        );
        Self::new(table, GeneratorConfig::default(), velocity, seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Place hit objects for every hit in `timeline`.
    ///
    /// Runs of consecutive hit frames count as one hit. Fails as a whole:
    /// no partial list is returned.
    pub fn predict(&self, timeline: &Timeline) -> Result<Prediction> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let config = &self.config;
        let ctx = PathContext {
            config,
            velocity: self.velocity,
        };

        let timeline = timeline.sanitized();
        let start = DVec2::new(
            rng.random_range(SAFE_MIN.x..SAFE_MAX.x).floor(),
            rng.random_range(SAFE_MIN.y..SAFE_MAX.y).floor(),
        );

        let waypoints = plan_waypoints(
            self.table,
            start,
            timeline.len(),
            config.interval_frames,
            &mut rng,
        )?;
        let ranges = split_sections(&timeline, config.interval_frames, config.stack_threshold_frames);

        let mut hit_objects = Vec::new();
        let mut last_hit_index = 0;
        let mut last_hit_position = start;

        for (i, range) in ranges.into_iter().enumerate() {
            let destination = waypoints.for_frame(range.end, config.interval_frames);
            let mut section = Section::new(
                range.start,
                timeline.as_slice()[range].to_vec(),
                last_hit_index,
                last_hit_position,
                destination,
                i % config.combo_every_sections == 0,
            )?;

            section.path = Some(synthesize_path(&section, &ctx, &mut rng)?);
            hit_objects.extend(assemble_section(&mut section, &ctx, &mut rng)?);

            last_hit_index = section
                .last_hit_frame()
                .ok_or(Error::EmptySection { start: section.start })?;
            last_hit_position = section
                .end_position()
                .ok_or(Error::MissingPath { start: section.start })?;
        }

        validate(&hit_objects)?;
        log::info!(
            "placed {} hit objects over {} frames",
            hit_objects.len(),
            timeline.len()
        );

        Ok(Prediction {
            hit_objects,
            areas: waypoints.areas,
            waypoints: waypoints.positions,
            seed: self.seed,
        })
    }
}

/// Every referenced position in bounds, times non-decreasing
fn validate(objects: &[HitObject]) -> Result<()> {
    let mut previous_ms = 0;
    for object in objects {
        let time_ms = object.time_ms();
        if let Some(point) = object.positions().find(|p| !in_bounds(*p)) {
            return Err(Error::ObjectOutOfBounds { time_ms, point });
        }
        if time_ms < previous_ms {
            return Err(Error::ObjectOrder {
                time_ms,
                previous_ms,
            });
        }
        previous_ms = time_ms;
    }
    Ok(())
}
