//! Tempo and time signature markers.

use super::Millis;

/// A tempo change, anchored both in ticks and on the millisecond timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMarker {
    /// Where the tempo changes, in ticks.
    pub tick: u64,
    /// Where the tempo changes, in milliseconds.
    pub time: Millis,
    /// Beats per minute from this marker on, rounded to three decimal places.
    pub bpm: f64,
}

impl TempoMarker {
    /// Milliseconds per quarter note under this tempo.
    #[must_use]
    pub fn ms_per_beat(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

/// A time signature change.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignatureMarker {
    /// Where the signature changes, in ticks.
    pub tick: u64,
    /// `numerator / 2^denominator_exponent`, the length of a measure in whole notes.
    pub value: f64,
}

impl TimeSignatureMarker {
    /// Creates a marker from the raw numerator and denominator exponent.
    #[must_use]
    pub fn new(tick: u64, numerator: u32, denominator_exponent: u32) -> Self {
        let denominator = 2f64.powi(denominator_exponent.min(i32::MAX as u32) as i32);
        Self {
            tick,
            value: f64::from(numerator) / denominator,
        }
    }

    /// Ticks spanned by one measure under this signature.
    #[must_use]
    pub fn measure_ticks(&self, resolution: u32) -> f64 {
        f64::from(resolution) * self.value * 4.0
    }
}
