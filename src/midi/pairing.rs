//! Rebuilding sustains from note-on/note-off pairs.

use std::collections::HashMap;

use crate::{
    model::{Difficulty, EventType, Millis, TrackEvent},
    timeline::TempoTimeline,
};

use super::classify::NoteMeaning;

/// Sustains shorter than a quarter note divided by this are not sustains.
const SUSTAIN_CUTOFF_DIVISOR: f64 = 3.0;

/// Whether an event of `event_type` only ever has an onset.
const fn is_instantaneous(event_type: EventType) -> bool {
    matches!(
        event_type,
        EventType::Force
            | EventType::SoloMarker
            | EventType::ActivationLane
            | EventType::Kick
            | EventType::Kick2x
    )
}

/// Pairs note-ons with the following note-off of the same meaning.
///
/// Feed edges in track order, then take the finished events per difficulty
/// with [`NotePairer::finish`]. Instrument-wide markers are kept under `None`.
#[derive(Debug, Default)]
pub struct NotePairer {
    pending: HashMap<NoteMeaning, Millis>,
    finished: Vec<(Option<Difficulty>, TrackEvent)>,
}

impl NotePairer {
    /// Creates an empty pairer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A note starts at `time`.
    pub fn note_on(&mut self, meaning: NoteMeaning, time: Millis) {
        if is_instantaneous(meaning.event_type) {
            self.finished.push((
                meaning.difficulty,
                TrackEvent {
                    time,
                    event_type: meaning.event_type,
                    length: Millis::ZERO,
                },
            ));
            return;
        }
        if let Some(dropped) = self.pending.insert(meaning, time) {
            log::debug!(
                "note-on of {:?} at {time} replaces the unterminated one at {dropped}",
                meaning.event_type
            );
        }
    }

    /// A note ends at `time`. Ends without a matching start are ignored.
    pub fn note_off(&mut self, meaning: NoteMeaning, time: Millis) {
        if is_instantaneous(meaning.event_type) {
            return;
        }
        let Some(start) = self.pending.remove(&meaning) else {
            log::debug!("unmatched note-off of {:?} at {time}", meaning.event_type);
            return;
        };
        self.finished.push((
            meaning.difficulty,
            TrackEvent {
                time: start,
                event_type: meaning.event_type,
                length: time - start,
            },
        ));
    }

    /// The paired events grouped by difficulty, each group sorted by time.
    ///
    /// Notes still held when the track ends are dropped.
    #[must_use]
    pub fn finish(self) -> HashMap<Option<Difficulty>, Vec<TrackEvent>> {
        if !self.pending.is_empty() {
            log::debug!("dropping {} notes without a note-off", self.pending.len());
        }
        let mut grouped: HashMap<Option<Difficulty>, Vec<TrackEvent>> = HashMap::new();
        for (difficulty, event) in self.finished {
            grouped.entry(difficulty).or_default().push(event);
        }
        for events in grouped.values_mut() {
            events.sort_by_key(|event| event.time);
        }
        grouped
    }
}

/// Zeroes sustains shorter than a twelfth note under the tempo in effect at their start.
///
/// Instrument-wide markers keep their length.
pub fn clamp_short_sustains(events: &mut [TrackEvent], timeline: &TempoTimeline) {
    for event in events {
        if event.length <= Millis::ZERO || event.event_type.is_instrument_marker() {
            continue;
        }
        let Some(tempo) = timeline.tempo_at_time(event.time) else {
            continue;
        };
        if event.length.as_f64() < tempo.ms_per_beat() / SUSTAIN_CUTOFF_DIVISOR {
            event.length = Millis::ZERO;
        }
    }
}
