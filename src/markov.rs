//! Markov waypoint planner
//!
//! A transition table maps a path of recent areas ("3_8") to the areas that
//! followed it in real beatmaps. Planning walks the table one interval at a
//! time, biased toward the last two areas, and never repeats an area twice in
//! a row.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::grid::{self, Area};

/// Marker that appears in keys built from unknown (-1) areas
const NO_DATA_MARKER: char = '-';

/// Area-path key -> candidate next areas. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    entries: BTreeMap<String, Vec<Area>>,
}

impl TransitionTable {
    /// Build a table from raw entries.
    ///
    /// Keys carrying a no-data marker and candidates off the grid are
    /// dropped; an empty result is a configuration error.
    pub fn new(raw: BTreeMap<String, Vec<i64>>) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, Vec<Area>> = raw
            .into_iter()
            .filter(|(key, _)| !key.contains(NO_DATA_MARKER))
            .map(|(key, candidates)| {
                let areas = candidates
                    .into_iter()
                    .filter_map(|c| Area::try_from(c).ok())
                    .collect::<Vec<_>>();
                (key, areas)
            })
            .filter(|(_, areas)| !areas.is_empty())
            .collect();

        if entries.is_empty() {
            return Err(ConfigError::EmptyTransitionTable);
        }

        log::debug!("transition table loaded with {} keys", entries.len());
        Ok(Self { entries })
    }

    /// Parse a JSON object of `"key": [areas...]`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, Vec<i64>> = serde_json::from_str(json)?;
        Self::new(raw)
    }

    /// Learn a table from observed area sequences: every consecutive triple
    /// `a, b, c` records `c` as a candidate after `"a_b"`. Unknown areas break
    /// the chain.
    pub fn learn<'a, I>(sequences: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a [Option<Area>]>,
    {
        let mut seen: BTreeMap<String, BTreeSet<Area>> = BTreeMap::new();

        for sequence in sequences {
            for window in sequence.windows(3) {
                if let [Some(a), Some(b), Some(c)] = *window {
                    seen.entry(grid::area_key(&[a, b])).or_default().insert(c);
                }
            }
        }

        let raw = seen
            .into_iter()
            .map(|(key, areas)| (key, areas.into_iter().map(|a| a.index() as i64).collect()))
            .collect();
        Self::new(raw)
    }

    /// Learn a table from raw per-frame cursor tracks.
    ///
    /// Each track is sampled at every `interval_frames` boundary, taking the
    /// nearest known position within `leniency_frames`, and the samples'
    /// areas feed [`TransitionTable::learn`].
    pub fn learn_from_tracks<'a, I>(tracks: I, config: &GeneratorConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a [Option<DVec2>]>,
    {
        let sequences: Vec<Vec<Option<Area>>> = tracks
            .into_iter()
            .map(|track| {
                let samples =
                    grid::interval_positions(track, config.interval_frames, config.leniency_frames);
                grid::positions_to_areas(&samples)
            })
            .collect();
        log::debug!("learning transitions from {} tracks", sequences.len());

        Self::learn(sequences.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[Area]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// The planner's only state: the two most recently chosen areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCursor {
    pub previous: [Area; 2],
}

impl AreaCursor {
    pub fn new(first: Area, second: Area) -> Self {
        Self {
            previous: [first, second],
        }
    }

    /// Cursor after moving to `next`
    #[inline]
    pub fn advance(self, next: Area) -> Self {
        Self {
            previous: [self.previous[1], next],
        }
    }

    /// Lookup keys in the order they are tried: the pair, the last area
    /// alone, then the pair reversed
    fn keys(&self) -> [String; 3] {
        let [a, b] = self.previous;
        [
            grid::area_key(&[a, b]),
            grid::area_key(&[b]),
            grid::area_key(&[b, a]),
        ]
    }
}

/// Choose the next area after `cursor`, returning it with the advanced cursor.
///
/// Candidates equal to the last area are never chosen. When none of the
/// cursor's keys yields a candidate, a random key is drawn from the whole
/// table; a table with no usable candidate anywhere is malformed.
pub fn next_area<R: Rng + ?Sized>(
    table: &TransitionTable,
    cursor: AreaCursor,
    rng: &mut R,
) -> Result<(Area, AreaCursor), ConfigError> {
    let previous = cursor.previous[1];
    let usable = |candidates: &[Area]| -> Vec<Area> {
        candidates.iter().copied().filter(|&c| c != previous).collect()
    };

    let keys = cursor.keys();
    for key in &keys {
        if let Some(candidates) = table.get(key) {
            let choices = usable(candidates);
            if !choices.is_empty() {
                let next = choices[rng.random_range(0..choices.len())];
                return Ok((next, cursor.advance(next)));
            }
        }
    }

    let fallback_keys: Vec<&str> = table
        .keys()
        .filter(|k| table.get(k).is_some_and(|c| !usable(c).is_empty()))
        .collect();
    if fallback_keys.is_empty() {
        return Err(ConfigError::NoCandidates {
            key: keys[0].clone(),
            previous: previous.index(),
        });
    }

    let key = fallback_keys[rng.random_range(0..fallback_keys.len())];
    log::debug!("no entry for {}, falling back to random key {key}", keys[0]);
    let choices = table.get(key).map(usable).unwrap_or_default();
    let next = choices[rng.random_range(0..choices.len())];
    Ok((next, cursor.advance(next)))
}

/// Planned route: one area per interval, and a concrete position for each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoints {
    pub areas: Vec<Area>,
    pub positions: Vec<DVec2>,
}

impl Waypoints {
    /// Waypoint targeted by a section ending at `frame`
    pub fn for_frame(&self, frame: usize, interval: usize) -> DVec2 {
        let index = (frame / interval.max(1)).min(self.positions.len().saturating_sub(1));
        self.positions[index]
    }
}

/// Plan a route covering `len_frames` frames at one area per `interval`.
///
/// The first area comes from `start`; the next two are nearby areas, after
/// which the transition table takes over.
pub fn plan_waypoints<R: Rng + ?Sized>(
    table: &TransitionTable,
    start: DVec2,
    len_frames: usize,
    interval: usize,
    rng: &mut R,
) -> Result<Waypoints, ConfigError> {
    let first = grid::position_to_area(start).ok_or_else(|| ConfigError::InvalidTuning {
        name: "start",
        reason: format!("start position {start:?} is off the area grid"),
    })?;
    let second = grid::nearby_area(first, rng);
    let third = grid::nearby_area(second, rng);

    let count = (len_frames / interval.max(1) + 2).max(3);
    let mut areas = Vec::with_capacity(count);
    areas.extend([first, second, third]);

    let mut cursor = AreaCursor::new(second, third);
    while areas.len() < count {
        let (next, advanced) = next_area(table, cursor, rng)?;
        areas.push(next);
        cursor = advanced;
    }

    let positions = areas.iter().map(|&a| grid::random_position(a, rng)).collect();
    log::info!("planned {} waypoints over {len_frames} frames", areas.len());

    Ok(Waypoints { areas, positions })
}
