//! Peak notes-per-second over a sliding window.

use std::collections::VecDeque;

use crate::model::{GroupedTrackEvent, Millis, TrackEvent, millis::round_millis};

/// Where a track is densest.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityPeak {
    /// The grouped note which first reached the peak count.
    pub time: Millis,
    /// Notes per second at the peak.
    pub nps: f64,
    /// Notes within the window ending at `time`, plus the context margin on both sides.
    pub context: Vec<TrackEvent>,
}

/// Finds the densest window over `groups`. `None` without notes.
///
/// A window ending at a note holds every grouped note after
/// `time - window_ms`, up to and including that note. Only a strictly greater
/// count replaces the peak, so the earliest densest window is reported.
#[must_use]
pub fn density_peak(
    groups: &[GroupedTrackEvent],
    notes: &[TrackEvent],
    window_ms: f64,
    context_ms: f64,
) -> Option<DensityPeak> {
    let first = groups.first()?;
    let window = Millis::new(window_ms);
    let mut recent: VecDeque<Millis> = VecDeque::new();
    let (mut peak_count, mut peak_time) = (1, first.time);
    for group in groups {
        while recent
            .front()
            .is_some_and(|&time| time <= group.time - window)
        {
            recent.pop_front();
        }
        recent.push_back(group.time);
        if recent.len() > peak_count {
            peak_count = recent.len();
            peak_time = group.time;
        }
    }

    let context_start = peak_time - window - Millis::new(context_ms);
    let context_end = peak_time + Millis::new(context_ms);
    let context = notes
        .iter()
        .filter(|note| context_start < note.time && note.time <= context_end)
        .copied()
        .collect();
    Some(DensityPeak {
        time: peak_time,
        nps: round_millis(peak_count as f64 * 1000.0 / window_ms),
        context,
    })
}
