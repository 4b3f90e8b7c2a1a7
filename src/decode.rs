//! The decoder-independent output of decoding, and the hard failures of decoding.

use std::ops::Range;

use thiserror::Error;

use crate::{
    model::{ChartFormat, TempoMarker, TimeSignatureMarker, TrackEvent, TrackKey},
    notes_data::ChartIssueType,
};

/// A failure which aborts the whole decode. No partial result is produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// A line break was found inside a `[...]` section header.
    #[error("section header starting at byte {start} is not closed before the line break at byte {line_break}")]
    UnterminatedSectionHeader {
        /// Byte offset of the opening `[`.
        start: usize,
        /// Byte offset of the offending line break.
        line_break: usize,
    },
    /// A `}` was found before any section header.
    #[error("closing brace at byte {at} does not belong to any section")]
    UnexpectedClosingBrace {
        /// Byte offset of the `}`.
        at: usize,
    },
    /// The binary container could not be read.
    #[error("invalid midi container: {0}")]
    InvalidMidi(String),
    /// The binary container uses time-code division, which has no tempo to integrate.
    #[error("time-code division is not supported")]
    UnsupportedTiming,
}

impl DecodeError {
    /// The chart issue which reports this failure to collaborators.
    #[must_use]
    pub const fn chart_issue(&self) -> ChartIssueType {
        ChartIssueType::UnparseableSectionsOrBadEncoding
    }

    /// The byte range in the text source this failure points at, if any.
    #[must_use]
    pub fn range(&self) -> Option<Range<usize>> {
        match *self {
            Self::UnterminatedSectionHeader { start, line_break } => Some(start..line_break + 1),
            Self::UnexpectedClosingBrace { at } => Some(at..at + 1),
            Self::InvalidMidi(_) | Self::UnsupportedTiming => None,
        }
    }
}

/// The events of one charted track, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTrack {
    /// Which track this is.
    pub key: TrackKey,
    /// The events, ordered by `(time, type, length)`.
    pub events: Vec<TrackEvent>,
}

/// A chart decoded into the unified event model, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedChart {
    /// Which decoder produced this.
    pub format: ChartFormat,
    /// Ticks per quarter note, zero when missing.
    pub resolution: u32,
    /// The tempo map, ascending by tick.
    pub tempo_markers: Vec<TempoMarker>,
    /// Number of tempo events in the source, before same-tick changes were merged.
    pub tempo_event_count: usize,
    /// The time signatures, ascending by tick.
    pub time_signatures: Vec<TimeSignatureMarker>,
    /// The charted tracks, one per `(instrument, difficulty)`, in canonical order.
    pub tracks: Vec<DecodedTrack>,
    /// Whether lyrics were seen.
    pub has_lyrics: bool,
    /// Whether section markers were seen.
    pub has_sections: bool,
    /// Soft issues found while decoding.
    pub chart_issues: Vec<ChartIssueType>,
}

impl DecodedChart {
    /// An empty chart of `format`.
    #[must_use]
    pub const fn new(format: ChartFormat) -> Self {
        Self {
            format,
            resolution: 0,
            tempo_markers: Vec::new(),
            tempo_event_count: 0,
            time_signatures: Vec::new(),
            tracks: Vec::new(),
            has_lyrics: false,
            has_sections: false,
            chart_issues: Vec::new(),
        }
    }

    /// Records `issue` once.
    pub fn push_issue(&mut self, issue: ChartIssueType) {
        if !self.chart_issues.contains(&issue) {
            self.chart_issues.push(issue);
        }
    }

    /// Whether decoding stopped before any note could be time-stamped.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.chart_issues.iter().any(|issue| issue.halts_analysis())
    }
}
