//! Hit-event timeline
//!
//! One flag per audio frame: is there a hit here?

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::InputError;

/// Per-frame hit flags, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeline {
    hits: Vec<bool>,
}

/// Kind of span produced by [`Timeline::hit_spans`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    /// Starts on a hit and must render as objects
    Hit,
    /// Starts on silence (may absorb isolated single hits)
    Gap,
}

/// Contiguous frame range with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub kind: SpanKind,
}

impl Timeline {
    pub fn new(hits: Vec<bool>) -> Self {
        Self { hits }
    }

    /// Build from 0/1 values, rejecting anything else
    pub fn from_binary(values: &[u8]) -> Result<Self, InputError> {
        let hits = values
            .iter()
            .enumerate()
            .map(|(frame, &value)| match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(InputError::NonBinaryTimeline { frame, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { hits })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Whether `frame` holds a hit (false past the end)
    #[inline]
    pub fn is_hit(&self, frame: usize) -> bool {
        self.hits.get(frame).copied().unwrap_or(false)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.hits
    }

    /// Frame indices holding hits
    pub fn hit_frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits.iter().enumerate().filter(|(_, h)| **h).map(|(i, _)| i)
    }

    /// Copy with every run of consecutive hits collapsed to its first frame
    pub fn sanitized(&self) -> Self {
        let hits = self
            .hits
            .iter()
            .enumerate()
            .map(|(i, &hit)| hit && (i == 0 || !self.hits[i - 1]))
            .collect();
        Self { hits }
    }

    /// Split into alternating hit and gap spans.
    ///
    /// A gap only ends when a hit is followed by another hit; a lone hit
    /// inside silence stays part of the gap so single-frame noise cannot
    /// fragment the timeline.
    pub fn hit_spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        if self.hits.is_empty() {
            return spans;
        }

        let mut start = 0;
        for index in 1..self.hits.len() {
            let opens_hit = !self.hits[start] && self.hits[index] && self.is_hit(index + 1);
            let closes_hit = self.hits[start] && !self.hits[index];

            if opens_hit || closes_hit {
                spans.push(self.span(start..index));
                start = index;
            }
        }
        spans.push(self.span(start..self.hits.len()));
        spans
    }

    fn span(&self, range: Range<usize>) -> Span {
        let kind = if self.hits[range.start] {
            SpanKind::Hit
        } else {
            SpanKind::Gap
        };
        Span { range, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(values: &[u8]) -> Timeline {
        Timeline::from_binary(values).unwrap()
    }

    #[test]
    fn test_from_binary_rejects_other_values() {
        assert_eq!(
            Timeline::from_binary(&[0, 1, 2]),
            Err(InputError::NonBinaryTimeline { frame: 2, value: 2 })
        );
    }

    #[test]
    fn test_sanitized_collapses_runs() {
        let t = timeline(&[1, 1, 1, 0, 1, 0, 1, 1]).sanitized();
        assert_eq!(t, timeline(&[1, 0, 0, 0, 1, 0, 1, 0]));
    }

    #[test]
    fn test_hit_spans() {
        let t = timeline(&[0, 0, 1, 1, 1, 0, 0, 1, 0, 0, 1, 1, 0]);
        let spans = t.hit_spans();

        let ranges: Vec<_> = spans.iter().map(|s| (s.range.clone(), s.kind)).collect();
        assert_eq!(
            ranges,
            vec![
                (0..2, SpanKind::Gap),
                (2..5, SpanKind::Hit),
                // The lone hit at 7 is absorbed into the gap
                (5..10, SpanKind::Gap),
                (10..12, SpanKind::Hit),
                (12..13, SpanKind::Gap),
            ]
        );
    }

    #[test]
    fn test_hit_spans_cover_timeline() {
        let t = timeline(&[1, 0, 1, 1, 0, 1]);
        let spans = t.hit_spans();
        assert_eq!(spans.first().map(|s| s.range.start), Some(0));
        assert_eq!(spans.last().map(|s| s.range.end), Some(t.len()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
    }
}
