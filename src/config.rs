//! Detector thresholds.

use crate::model::{ChartFormat, Millis};

/// How close two notes may be before the later one is reported as broken.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BrokenNoteThreshold {
    /// The distance in milliseconds.
    pub distance_ms: f64,
    /// Whether a distance of exactly `distance_ms` is still broken.
    pub inclusive: bool,
}

impl BrokenNoteThreshold {
    /// Whether two notes `distance` apart are too close. Simultaneous notes never are.
    #[must_use]
    pub fn is_broken(&self, distance: Millis) -> bool {
        let distance = distance.as_f64();
        distance > 0.0
            && if self.inclusive {
                distance <= self.distance_ms
            } else {
                distance < self.distance_ms
            }
    }
}

/// Thresholds used by the track analyzer and the aggregator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScanConfig {
    /// A first note earlier than this is a small leading silence.
    pub leading_silence_ms: f64,
    /// Notes may not start within this long after a sustain ends.
    pub min_sustain_gap_ms: f64,
    /// Sustains shorter than this are baby sustains.
    pub min_sustain_ms: f64,
    /// Width of the sliding notes-per-second window.
    pub nps_window_ms: f64,
    /// How far around the peak the diagnostic context reaches.
    pub nps_context_ms: f64,
    /// Broken note threshold for text charts.
    pub chart_broken_note: BrokenNoteThreshold,
    /// Broken note threshold for binary charts.
    pub mid_broken_note: BrokenNoteThreshold,
    /// An open note right after a sustain longer than this is never broken.
    pub open_under_sustain_ms: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            leading_silence_ms: 1000.0,
            min_sustain_gap_ms: 40.0,
            min_sustain_ms: 100.0,
            nps_window_ms: 1000.0,
            nps_context_ms: 500.0,
            // The two formats historically disagree here; kept apart on purpose.
            chart_broken_note: BrokenNoteThreshold {
                distance_ms: 5.0,
                inclusive: false,
            },
            mid_broken_note: BrokenNoteThreshold {
                distance_ms: 15.0,
                inclusive: true,
            },
            open_under_sustain_ms: 5.0,
        }
    }
}

impl ScanConfig {
    /// The broken note threshold for charts of `format`.
    #[must_use]
    pub const fn broken_note(&self, format: ChartFormat) -> BrokenNoteThreshold {
        match format {
            ChartFormat::Chart => self.chart_broken_note,
            ChartFormat::Mid => self.mid_broken_note,
        }
    }
}
