//! Section names and note ids of the text format.

use crate::model::{Difficulty, EventType, Instrument, InstrumentClass, TrackKey};

/// Section name of every charted track, in canonical order.
pub const TRACK_SECTIONS: [(&str, TrackKey); 28] = {
    use Difficulty::*;
    use Instrument::*;
    [
        ("ExpertSingle", TrackKey::new(Guitar, Expert)),
        ("HardSingle", TrackKey::new(Guitar, Hard)),
        ("MediumSingle", TrackKey::new(Guitar, Medium)),
        ("EasySingle", TrackKey::new(Guitar, Easy)),
        ("ExpertDoubleRhythm", TrackKey::new(Rhythm, Expert)),
        ("HardDoubleRhythm", TrackKey::new(Rhythm, Hard)),
        ("MediumDoubleRhythm", TrackKey::new(Rhythm, Medium)),
        ("EasyDoubleRhythm", TrackKey::new(Rhythm, Easy)),
        ("ExpertDoubleBass", TrackKey::new(Bass, Expert)),
        ("HardDoubleBass", TrackKey::new(Bass, Hard)),
        ("MediumDoubleBass", TrackKey::new(Bass, Medium)),
        ("EasyDoubleBass", TrackKey::new(Bass, Easy)),
        ("ExpertDrums", TrackKey::new(Drums, Expert)),
        ("HardDrums", TrackKey::new(Drums, Hard)),
        ("MediumDrums", TrackKey::new(Drums, Medium)),
        ("EasyDrums", TrackKey::new(Drums, Easy)),
        ("ExpertKeyboard", TrackKey::new(Keys, Expert)),
        ("HardKeyboard", TrackKey::new(Keys, Hard)),
        ("MediumKeyboard", TrackKey::new(Keys, Medium)),
        ("EasyKeyboard", TrackKey::new(Keys, Easy)),
        ("ExpertGHLGuitar", TrackKey::new(GuitarGhl, Expert)),
        ("HardGHLGuitar", TrackKey::new(GuitarGhl, Hard)),
        ("MediumGHLGuitar", TrackKey::new(GuitarGhl, Medium)),
        ("EasyGHLGuitar", TrackKey::new(GuitarGhl, Easy)),
        ("ExpertGHLBass", TrackKey::new(BassGhl, Expert)),
        ("HardGHLBass", TrackKey::new(BassGhl, Hard)),
        ("MediumGHLBass", TrackKey::new(BassGhl, Medium)),
        ("EasyGHLBass", TrackKey::new(BassGhl, Easy)),
    ]
};

/// `S` code of a star power phrase.
pub const STAR_POWER_CODE: u32 = 2;
/// `S` code of a drum activation lane.
pub const ACTIVATION_LANE_CODE: u32 = 64;
/// `E` text of a solo marker.
pub const SOLO_TEXT: &str = "solo";

/// Looks up the track a section name stands for.
#[must_use]
pub fn track_of_section(name: &str) -> Option<TrackKey> {
    TRACK_SECTIONS
        .iter()
        .find(|(section, _)| *section == name)
        .map(|&(_, key)| key)
}

/// Maps an `N` line id to its event type. Ids with no meaning for `class` give `None`.
#[must_use]
pub const fn note_event_type(class: InstrumentClass, id: u32) -> Option<EventType> {
    use EventType::*;
    let ty = match (class, id) {
        (InstrumentClass::FiveFret, 0) => Green,
        (InstrumentClass::FiveFret, 1) => Red,
        (InstrumentClass::FiveFret, 2) => Yellow,
        (InstrumentClass::FiveFret, 3) => Blue,
        (InstrumentClass::FiveFret, 4) => Orange,
        (InstrumentClass::FiveFret | InstrumentClass::SixFret, 5) => Force,
        (InstrumentClass::FiveFret | InstrumentClass::SixFret, 6) => Tap,
        (InstrumentClass::FiveFret | InstrumentClass::SixFret, 7) => Open,
        (InstrumentClass::SixFret, 0) => White1,
        (InstrumentClass::SixFret, 1) => White2,
        (InstrumentClass::SixFret, 2) => White3,
        (InstrumentClass::SixFret, 3) => Black1,
        (InstrumentClass::SixFret, 4) => Black2,
        (InstrumentClass::SixFret, 8) => Black3,
        (InstrumentClass::Drums, 0) => Kick,
        (InstrumentClass::Drums, 1) => Red,
        (InstrumentClass::Drums, 2) => Yellow,
        (InstrumentClass::Drums, 3) => Blue,
        (InstrumentClass::Drums, 4) => Orange,
        (InstrumentClass::Drums, 5) => Green,
        (InstrumentClass::Drums, 32) => Kick2x,
        _ => return None,
    };
    Some(ty)
}
