//! Area grid
//!
//! The padded playfield (640x480) is split into a 5x2 grid of cells. Areas
//! are the discrete state space of the waypoint planner: index = row * 5 + col.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consts::*;
use crate::geom::{SAFE_MAX, SAFE_MIN};

/// Cell size in padded pixels
const CELL_WIDTH: f64 = (PLAYFIELD_WIDTH + 2.0 * PADDING_X) / GRID_COLUMNS as f64;
const CELL_HEIGHT: f64 = (PLAYFIELD_HEIGHT + 2.0 * PADDING_Y) / GRID_ROWS as f64;

/// Separator between area indices in a transition-table key
pub const KEY_SEPARATOR: &str = "_";

/// One of the ten playfield areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Area(u8);

impl Area {
    /// Area with the given index, if it is on the grid
    pub fn new(index: u8) -> Option<Self> {
        (index < AREA_COUNT).then_some(Self(index))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn column(self) -> u8 {
        self.0 % GRID_COLUMNS
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / GRID_COLUMNS
    }

    fn from_cell(column: u8, row: u8) -> Self {
        Self(row * GRID_COLUMNS + column)
    }

    /// Sampling region of this area in playfield coordinates: the padded
    /// cell shifted back by the padding, clipped to the safe rectangle.
    /// Returned as half-open integer ranges `(x_lo, x_hi, y_lo, y_hi)`.
    fn sampling_region(self) -> (i32, i32, i32, i32) {
        let x_lo = self.column() as f64 * CELL_WIDTH - PADDING_X;
        let y_lo = self.row() as f64 * CELL_HEIGHT - PADDING_Y;

        (
            x_lo.max(SAFE_MIN.x) as i32,
            (x_lo + CELL_WIDTH).min(SAFE_MAX.x + 1.0) as i32,
            y_lo.max(SAFE_MIN.y) as i32,
            (y_lo + CELL_HEIGHT).min(SAFE_MAX.y + 1.0) as i32,
        )
    }
}

impl TryFrom<i64> for Area {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Area::new)
            .ok_or_else(|| format!("area index {value} is outside 0..{AREA_COUNT}"))
    }
}

impl From<Area> for u8 {
    fn from(area: Area) -> u8 {
        area.0
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Area containing a playfield position, `None` if it falls off the grid
pub fn position_to_area(position: DVec2) -> Option<Area> {
    let column = ((position.x + PADDING_X) / CELL_WIDTH).floor();
    let row = ((position.y + PADDING_Y) / CELL_HEIGHT).floor();

    let on_grid = (0.0..GRID_COLUMNS as f64).contains(&column) && (0.0..GRID_ROWS as f64).contains(&row);
    on_grid.then(|| Area::from_cell(column as u8, row as u8))
}

/// Map a list of optional positions to their areas
pub fn positions_to_areas(positions: &[Option<DVec2>]) -> Vec<Option<Area>> {
    positions
        .iter()
        .map(|p| p.and_then(position_to_area))
        .collect()
}

/// Uniformly random whole-pixel position inside an area.
///
/// Always in bounds, and always maps back to the same area.
pub fn random_position<R: Rng + ?Sized>(area: Area, rng: &mut R) -> DVec2 {
    let (x_lo, x_hi, y_lo, y_hi) = area.sampling_region();
    DVec2::new(
        rng.random_range(x_lo..x_hi) as f64,
        rng.random_range(y_lo..y_hi) as f64,
    )
}

/// Random area near `area`: any row, a column within two of the current one
/// but never the current column itself.
pub fn nearby_area<R: Rng + ?Sized>(area: Area, rng: &mut R) -> Area {
    let column = area.column() as i16;
    let columns: Vec<u8> = (column - 2..=column + 2)
        .filter(|&c| c != column && (0..GRID_COLUMNS as i16).contains(&c))
        .map(|c| c as u8)
        .collect();

    let row = rng.random_range(0..GRID_ROWS);
    let new_column = columns[rng.random_range(0..columns.len())];
    Area::from_cell(new_column, row)
}

/// Transition-table key for a path of areas, e.g. `"0_1_2"`
pub fn area_key(areas: &[Area]) -> String {
    areas
        .iter()
        .map(Area::to_string)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Cursor position at each interval boundary.
///
/// For boundary frame `i * interval`, picks the known position closest in
/// time within `leniency` frames (earlier frame wins ties), or `None`.
pub fn interval_positions(
    positions: &[Option<DVec2>],
    interval: usize,
    leniency: usize,
) -> Vec<Option<DVec2>> {
    if interval == 0 {
        return Vec::new();
    }

    (0..positions.len() / interval)
        .map(|i| {
            let frame = i * interval;
            let window = frame.saturating_sub(leniency)..(frame + leniency).min(positions.len());

            window
                .filter_map(|f| positions[f].map(|p| (f.abs_diff(frame), p)))
                .min_by_key(|&(dist, _)| dist)
                .map(|(_, p)| p)
        })
        .collect()
}
