//! The unified event model shared by both decoders and the analyzers.
//!
//! Decoders turn their native grammars into per-track lists of [`TrackEvent`],
//! stamped in [`Millis`] on one monotonic timeline. Everything downstream only
//! ever sees this model.

pub mod millis;
pub mod tempo;

pub use self::{
    millis::Millis,
    tempo::{TempoMarker, TimeSignatureMarker},
};

/// An instrument which a track can be charted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Instrument {
    /// Lead guitar.
    Guitar,
    /// Rhythm guitar.
    Rhythm,
    /// Bass guitar.
    Bass,
    /// Drums.
    Drums,
    /// Keys, charted on five frets.
    Keys,
    /// Six-fret lead guitar.
    GuitarGhl,
    /// Six-fret bass guitar.
    BassGhl,
}

impl Instrument {
    /// All instruments, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Guitar,
        Self::Rhythm,
        Self::Bass,
        Self::Drums,
        Self::Keys,
        Self::GuitarGhl,
        Self::BassGhl,
    ];

    /// The note layout family this instrument is charted with.
    #[must_use]
    pub const fn class(self) -> InstrumentClass {
        match self {
            Self::Guitar | Self::Rhythm | Self::Bass | Self::Keys => InstrumentClass::FiveFret,
            Self::GuitarGhl | Self::BassGhl => InstrumentClass::SixFret,
            Self::Drums => InstrumentClass::Drums,
        }
    }
}

/// The note layout family of an [`Instrument`]. Note ids are looked up per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentClass {
    /// Green, red, yellow, blue and orange frets.
    FiveFret,
    /// Three white and three black frets.
    SixFret,
    /// Kick plus pads.
    Drums,
}

/// A difficulty which a track can be charted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    /// Expert.
    Expert,
    /// Hard.
    Hard,
    /// Medium.
    Medium,
    /// Easy.
    Easy,
}

impl Difficulty {
    /// Difficulties ordered from the lowest note band upwards.
    pub const ASCENDING: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];
}

/// The source format a chart was decoded from.
///
/// A few detectors key their thresholds on this, see [`crate::config::ScanConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChartFormat {
    /// The bracketed text format (`.chart`).
    Chart,
    /// The binary event-track format (`.mid`).
    Mid,
}

/// The kind of a [`TrackEvent`].
///
/// The discriminants are part of the content hash contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum EventType {
    /// Star power phrase, applies to the whole instrument.
    StarPower = 0,
    /// Tap modifier.
    Tap = 1,
    /// Forced strum/hopo modifier.
    Force = 2,
    /// Orange fret or pad.
    Orange = 3,
    /// Blue fret or pad.
    Blue = 4,
    /// Yellow fret or pad.
    Yellow = 5,
    /// Red fret or pad.
    Red = 6,
    /// Green fret or pad.
    Green = 7,
    /// Open note.
    Open = 8,
    /// Solo section marker.
    SoloMarker = 9,
    /// Third black fret.
    Black3 = 10,
    /// Second black fret.
    Black2 = 11,
    /// First black fret.
    Black1 = 12,
    /// Third white fret.
    White3 = 13,
    /// Second white fret.
    White2 = 14,
    /// First white fret.
    White1 = 15,
    /// Drum activation lane.
    ActivationLane = 16,
    /// Kick drum.
    Kick = 17,
    /// Expert+ double kick.
    Kick2x = 18,
}

impl EventType {
    /// The stable ordinal used when hashing.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Whether this marks a region of the whole instrument rather than a note.
    #[must_use]
    pub const fn is_instrument_marker(self) -> bool {
        matches!(self, Self::StarPower | Self::SoloMarker | Self::ActivationLane)
    }

    /// Whether a tap/open modifier window may reclassify this note.
    #[must_use]
    pub const fn is_fret(self) -> bool {
        matches!(
            self,
            Self::Green
                | Self::Red
                | Self::Yellow
                | Self::Blue
                | Self::Orange
                | Self::Open
                | Self::White1
                | Self::White2
                | Self::White3
                | Self::Black1
                | Self::Black2
                | Self::Black3
        )
    }
}

/// One event on a track's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    /// Time of the event.
    pub time: Millis,
    /// What the event is. Field order keeps the derived ordering `(time, type, length)`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub event_type: EventType,
    /// Sustain or window duration, zero for instantaneous events.
    pub length: Millis,
}

impl TrackEvent {
    /// Creates an event from raw millisecond values.
    #[must_use]
    pub fn new(time: f64, event_type: EventType, length: f64) -> Self {
        Self {
            time: Millis::new(time),
            event_type,
            length: Millis::new(length),
        }
    }

    /// The time the sustain ends, equal to `time` for instantaneous events.
    #[must_use]
    pub fn end(&self) -> Millis {
        self.time + self.length
    }
}

/// All note events sharing one exact time, the unit of chord-shape analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupedTrackEvent {
    /// The shared time.
    pub time: Millis,
    /// The events at `time`, never empty.
    pub events: Vec<TrackEvent>,
}

impl GroupedTrackEvent {
    /// Whether any event of this group has `event_type`.
    #[must_use]
    pub fn contains(&self, event_type: EventType) -> bool {
        self.events.iter().any(|event| event.event_type == event_type)
    }

    /// Counts how many distinct types out of `types` appear in this group.
    #[must_use]
    pub fn count_of(&self, types: &[EventType]) -> usize {
        types.iter().filter(|&&ty| self.contains(ty)).count()
    }

    /// The longest sustain in this group.
    #[must_use]
    pub fn longest_sustain(&self) -> Millis {
        self.events
            .iter()
            .map(|event| event.length)
            .max()
            .unwrap_or(Millis::ZERO)
    }
}

/// Identifies one charted track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackKey {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
}

impl TrackKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(instrument: Instrument, difficulty: Difficulty) -> Self {
        Self {
            instrument,
            difficulty,
        }
    }
}

/// Puts track events into their canonical `(time, type, length)` order.
///
/// Both decoders finish with this, so hashing and analysis never depend on how
/// simultaneous events happened to be laid out in the source.
pub fn canonicalize_events(events: &mut [TrackEvent]) {
    events.sort_unstable();
}
