//! Sections: contiguous frame ranges rendered as one group of hit objects
//!
//! Sections are cut one waypoint interval at a time. A cut is never placed
//! inside a stack (a burst of hits closer together than the stack threshold);
//! the section instead ends at the last hit that can be cut after safely.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::path::Path;
use super::timeline::Timeline;
use crate::error::{Error, Result};

/// A planned section and, once computed, its cursor path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// First frame of the section
    pub start: usize,
    /// Hit flags for the frames covered, starting at `start`
    pub hits: Vec<bool>,
    /// Frame of the previous section's last hit
    pub last_hit_index: usize,
    /// Where the cursor was when the previous section ended
    pub last_hit_position: DVec2,
    /// Waypoint this section heads toward
    pub destination: DVec2,
    /// Next emitted object starts a new combo (cleared once used)
    pub new_combo: bool,
    /// One position per frame of the section, set once by the path synthesizer
    pub path: Option<Path>,
}

impl Section {
    pub fn new(
        start: usize,
        hits: Vec<bool>,
        last_hit_index: usize,
        last_hit_position: DVec2,
        destination: DVec2,
        new_combo: bool,
    ) -> Result<Self> {
        if last_hit_index > start {
            return Err(Error::SectionOrder {
                start,
                last_hit: last_hit_index,
            });
        }

        Ok(Self {
            start,
            hits,
            last_hit_index,
            last_hit_position,
            destination,
            new_combo,
            path: None,
        })
    }

    #[inline]
    pub fn len_frames(&self) -> usize {
        self.hits.len()
    }

    /// One past the last frame
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.hits.len()
    }

    /// Frames between the previous hit and this section's start
    #[inline]
    pub fn frames_since_last_hit(&self) -> usize {
        self.start - self.last_hit_index
    }

    /// Offsets (relative to `start`) of every hit in the section
    pub fn hit_offsets(&self) -> Vec<usize> {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, h)| **h)
            .map(|(i, _)| i)
            .collect()
    }

    /// Absolute frame of the first hit
    pub fn first_hit_frame(&self) -> Option<usize> {
        self.hits.iter().position(|h| *h).map(|i| self.start + i)
    }

    /// Absolute frame of the last hit
    pub fn last_hit_frame(&self) -> Option<usize> {
        self.hits.iter().rposition(|h| *h).map(|i| self.start + i)
    }

    /// Cursor position at the final frame, once the path is known
    pub fn end_position(&self) -> Option<DVec2> {
        self.path.as_ref().and_then(Path::last)
    }
}

/// Whether ending a section right after the hit at `index` would split a
/// stack: the hit lies within `stack_threshold` frames of the window end and
/// another hit follows less than `stack_threshold` frames later.
pub fn divides_stack(
    timeline: &Timeline,
    window_start: usize,
    index: usize,
    interval: usize,
    stack_threshold: usize,
) -> bool {
    if index + stack_threshold < window_start + interval {
        return false;
    }

    (index + 1..index + stack_threshold).any(|i| timeline.is_hit(i))
}

/// Cut the timeline into section frame ranges.
///
/// Each window of `interval` frames yields at most one section, running from
/// the window start to just past its last hit that does not divide a stack.
/// The next window starts where that section ended. A window without such a
/// hit moves forward by one frame.
pub fn split_sections(timeline: &Timeline, interval: usize, stack_threshold: usize) -> Vec<Range<usize>> {
    let len = timeline.len();
    let interval = interval.max(1);
    let mut sections = Vec::new();
    let mut window_start = 0;

    while window_start < len {
        let window_end = (window_start + interval).min(len);
        let section_end = (window_start..window_end)
            .filter(|&i| {
                timeline.is_hit(i) && !divides_stack(timeline, window_start, i, interval, stack_threshold)
            })
            .last()
            .map(|i| i + 1);

        match section_end {
            Some(end) => {
                sections.push(window_start..end);
                window_start = end;
            }
            None if (window_start..window_end).any(|i| timeline.is_hit(i)) => {
                window_start += 1;
            }
            None => {
                // Silent window: slide straight to the first start whose
                // window reaches the next hit
                match (window_end..len).find(|&i| timeline.is_hit(i)) {
                    Some(next_hit) => {
                        window_start = (window_start + 1).max(next_hit + 1 - interval);
                    }
                    None => break,
                }
            }
        }
    }

    log::debug!("split {len} frames into {} sections", sections.len());
    sections
}
