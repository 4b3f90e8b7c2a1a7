//! Conversion from tick positions to the millisecond timeline.
//!
//! Every tempo region contributes `Δtime_ms = (Δtick / resolution) * (60000 / bpm)`.
//! Queries are answered through a cursor which only moves forward while the
//! queried ticks do, so one top-to-bottom scan over a track costs O(1) amortized
//! per event. Call [`TempoTimeline::reset`] before starting the next scan.

use crate::model::{Millis, TempoMarker, millis::round_millis};

/// A tempo map resolved against a fixed resolution.
#[derive(Debug, Clone)]
pub struct TempoTimeline {
    resolution: u32,
    markers: Vec<TempoMarker>,
    /// Unrounded marker times, so that rounding never accumulates across regions.
    origins: Vec<f64>,
    cursor: usize,
}

impl TempoTimeline {
    /// Builds a timeline from `(tick, bpm)` changes and the ticks per quarter note.
    ///
    /// Changes are sorted by tick. When two changes share a tick the later one wins,
    /// and changes with a non-positive or non-finite tempo are discarded.
    #[must_use]
    pub fn new(changes: impl IntoIterator<Item = (u64, f64)>, resolution: u32) -> Self {
        let mut changes: Vec<(u64, f64)> = changes
            .into_iter()
            .filter(|&(tick, bpm)| {
                let valid = bpm.is_finite() && bpm > 0.0;
                if !valid {
                    log::debug!("dropping tempo change at tick {tick} with bpm {bpm}");
                }
                valid
            })
            .collect();
        changes.sort_by_key(|&(tick, _)| tick);
        let mut deduped: Vec<(u64, f64)> = Vec::with_capacity(changes.len());
        for change in changes {
            match deduped.last_mut() {
                Some(last) if last.0 == change.0 => *last = change,
                _ => deduped.push(change),
            }
        }

        let mut markers = Vec::with_capacity(deduped.len());
        let mut origins = Vec::with_capacity(deduped.len());
        let mut previous: Option<(u64, f64, f64)> = None;
        for (tick, bpm) in deduped {
            let bpm = round_millis(bpm);
            let origin = match previous {
                // The first tempo is assumed to hold from tick zero.
                None => region_ms(tick as f64, resolution, bpm),
                Some((prev_tick, prev_bpm, prev_origin)) => {
                    prev_origin + region_ms((tick - prev_tick) as f64, resolution, prev_bpm)
                }
            };
            markers.push(TempoMarker {
                tick,
                time: Millis::new(origin),
                bpm,
            });
            origins.push(origin);
            previous = Some((tick, bpm, origin));
        }

        Self {
            resolution,
            markers,
            origins,
            cursor: 0,
        }
    }

    /// Ticks per quarter note.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The resolved tempo markers, ascending by tick.
    #[must_use]
    pub fn markers(&self) -> &[TempoMarker] {
        &self.markers
    }

    /// Whether ticks can be converted at all. False without tempo markers or with
    /// a zero resolution.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        self.resolution > 0 && !self.markers.is_empty()
    }

    /// Rewinds the cursor for a new scan.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Converts `tick` to milliseconds, moving the cursor.
    ///
    /// Returns `None` when the timeline is not functional.
    pub fn tick_to_time(&mut self, tick: u64) -> Option<Millis> {
        if !self.is_functional() {
            return None;
        }
        self.cursor = self.locate(self.cursor, tick);
        Some(Millis::new(self.raw_time(self.cursor, tick)))
    }

    /// Milliseconds spanned by `length` ticks starting at `tick`, without moving the cursor.
    ///
    /// Integrates across every tempo change inside the span.
    #[must_use]
    pub fn span_ms(&self, tick: u64, length: u64) -> Option<Millis> {
        if !self.is_functional() {
            return None;
        }
        let start_index = self.locate(self.cursor, tick);
        let end_tick = tick.saturating_add(length);
        let end_index = self.locate(start_index, end_tick);
        let start = self.raw_time(start_index, tick);
        let end = self.raw_time(end_index, end_tick);
        Some(Millis::new(end - start))
    }

    /// The tempo governing the millisecond position `time`.
    #[must_use]
    pub fn tempo_at_time(&self, time: Millis) -> Option<&TempoMarker> {
        let index = self.markers.partition_point(|marker| marker.time <= time);
        self.markers.get(index.saturating_sub(1))
    }

    /// Index of the marker governing `tick`, searching forward from `from`.
    fn locate(&self, from: usize, tick: u64) -> usize {
        let mut index = from.min(self.markers.len().saturating_sub(1));
        if self.markers[index].tick > tick && index > 0 {
            // Queried backwards: fall back to a search from the start.
            index = self
                .markers
                .partition_point(|marker| marker.tick <= tick)
                .saturating_sub(1);
        }
        while self
            .markers
            .get(index + 1)
            .is_some_and(|next| next.tick <= tick)
        {
            index += 1;
        }
        index
    }

    fn raw_time(&self, index: usize, tick: u64) -> f64 {
        let marker = &self.markers[index];
        let delta = tick as f64 - marker.tick as f64;
        self.origins[index] + region_ms(delta, self.resolution, marker.bpm)
    }
}

fn region_ms(delta_ticks: f64, resolution: u32, bpm: f64) -> f64 {
    if resolution == 0 {
        return 0.0;
    }
    (delta_ticks / f64::from(resolution)) * (60_000.0 / bpm)
}
