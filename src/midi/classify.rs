//! Track names and note numbers of the binary format.
//!
//! Note numbers 55 to 102 form four contiguous 12-wide bands, one per
//! difficulty. Inside a band, the meaning of a note is its distance from a
//! start offset which depends on the instrument class. Notes above the bands
//! mark regions of the whole instrument.

use crate::model::{Difficulty, EventType, Instrument, InstrumentClass};

/// Track name of every instrument.
pub const INSTRUMENT_TRACKS: [(&str, Instrument); 7] = [
    ("PART GUITAR", Instrument::Guitar),
    ("PART RHYTHM", Instrument::Rhythm),
    ("PART BASS", Instrument::Bass),
    ("PART DRUMS", Instrument::Drums),
    ("PART KEYS", Instrument::Keys),
    ("PART GUITAR GHL", Instrument::GuitarGhl),
    ("PART BASS GHL", Instrument::BassGhl),
];

/// Track name of the vocals track.
pub const VOCALS_TRACK: &str = "PART VOCALS";
/// Track name of the chart-wide events track.
pub const EVENTS_TRACK: &str = "EVENTS";

const SOLO_MARKER_NOTE: u8 = 103;
const STAR_POWER_NOTE: u8 = 116;
const ACTIVATION_LANE_NOTES: std::ops::RangeInclusive<u8> = 120..=124;

/// A named track of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRole {
    /// Notes of one instrument.
    Instrument(Instrument),
    /// Vocals; only its presence matters.
    Vocals,
    /// Chart-wide text events.
    Events,
}

/// Identifies a track by its exact (trimmed) name.
#[must_use]
pub fn track_role(name: &str) -> Option<TrackRole> {
    match name {
        VOCALS_TRACK => Some(TrackRole::Vocals),
        EVENTS_TRACK => Some(TrackRole::Events),
        _ => INSTRUMENT_TRACKS
            .iter()
            .find(|(track, _)| *track == name)
            .map(|&(_, instrument)| TrackRole::Instrument(instrument)),
    }
}

/// What a note number means on a given instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteMeaning {
    /// The difficulty it belongs to, `None` for instrument-wide markers.
    pub difficulty: Option<Difficulty>,
    /// The event it stands for.
    pub event_type: EventType,
}

fn difficulty_band(note: u8) -> Option<Difficulty> {
    match note {
        55..=66 => Some(Difficulty::Easy),
        67..=78 => Some(Difficulty::Medium),
        79..=90 => Some(Difficulty::Hard),
        91..=102 => Some(Difficulty::Expert),
        _ => None,
    }
}

const fn band_start(class: InstrumentClass, difficulty: Difficulty) -> i16 {
    let base = match class {
        InstrumentClass::FiveFret => 59,
        InstrumentClass::SixFret => 58,
        InstrumentClass::Drums => 60,
    };
    let band = match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
        Difficulty::Expert => 3,
    };
    base + band * 12
}

const fn note_in_band(class: InstrumentClass, offset: i16) -> Option<EventType> {
    use EventType::*;
    let ty = match (class, offset) {
        (InstrumentClass::FiveFret, 1) => Green,
        (InstrumentClass::FiveFret, 2) => Red,
        (InstrumentClass::FiveFret, 3) => Yellow,
        (InstrumentClass::FiveFret, 4) => Blue,
        (InstrumentClass::FiveFret, 5) => Orange,
        (InstrumentClass::FiveFret, 6 | 7) => Force,
        (InstrumentClass::SixFret, 0) => Open,
        (InstrumentClass::SixFret, 1) => White1,
        (InstrumentClass::SixFret, 2) => White2,
        (InstrumentClass::SixFret, 3) => White3,
        (InstrumentClass::SixFret, 4) => Black1,
        (InstrumentClass::SixFret, 5) => Black2,
        (InstrumentClass::SixFret, 6) => Black3,
        (InstrumentClass::SixFret, 7 | 8) => Force,
        (InstrumentClass::Drums, -1) => Kick2x,
        (InstrumentClass::Drums, 0) => Kick,
        (InstrumentClass::Drums, 1) => Red,
        (InstrumentClass::Drums, 2) => Yellow,
        (InstrumentClass::Drums, 3) => Blue,
        (InstrumentClass::Drums, 4) => Orange,
        (InstrumentClass::Drums, 5) => Green,
        _ => return None,
    };
    Some(ty)
}

/// Classifies note number `note` on an instrument of `class`.
#[must_use]
pub fn classify_note(class: InstrumentClass, note: u8) -> Option<NoteMeaning> {
    let Some(difficulty) = difficulty_band(note) else {
        let event_type = match note {
            SOLO_MARKER_NOTE => EventType::SoloMarker,
            STAR_POWER_NOTE => EventType::StarPower,
            _ if ACTIVATION_LANE_NOTES.contains(&note) => EventType::ActivationLane,
            _ => return None,
        };
        return Some(NoteMeaning {
            difficulty: None,
            event_type,
        });
    };
    let offset = i16::from(note) - band_start(class, difficulty);
    note_in_band(class, offset).map(|event_type| NoteMeaning {
        difficulty: Some(difficulty),
        event_type,
    })
}
