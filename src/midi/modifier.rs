//! Open and tap modifier windows carried in vendor sysex events.
//!
//! The payload is `'P' 'S' 0x00 0x00 <difficulty> <kind> <state>`: difficulty
//! `0..=3` from easy to expert or `0xFF` for all of them, kind `0x01` for open
//! and `0x04` for tap, state `0x01` to open the window and `0x00` to close it.

use crate::model::{Difficulty, EventType, Millis, TrackEvent};

const HEADER: [u8; 4] = [b'P', b'S', 0x00, 0x00];
const ALL_DIFFICULTIES: u8 = 0xFF;

/// The modifier a window applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Notes become open notes.
    Open,
    /// Notes become tap notes.
    Tap,
}

/// Opens or closes a modifier window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierToggle {
    /// When the toggle happens.
    pub time: Millis,
    /// The difficulty it applies to, `None` for all.
    pub difficulty: Option<Difficulty>,
    /// Which modifier.
    pub modifier: Modifier,
    /// Whether the window opens.
    pub enable: bool,
}

impl ModifierToggle {
    /// Parses a sysex payload (without the leading `0xF0`) found at `time`.
    #[must_use]
    pub fn parse(time: Millis, data: &[u8]) -> Option<Self> {
        let [header @ .., difficulty, kind, state] = data.get(..7)? else {
            return None;
        };
        if header != HEADER {
            return None;
        }
        let difficulty = match *difficulty {
            ALL_DIFFICULTIES => None,
            index => Some(*Difficulty::ASCENDING.get(usize::from(index))?),
        };
        let modifier = match kind {
            0x01 => Modifier::Open,
            0x04 => Modifier::Tap,
            _ => return None,
        };
        Some(Self {
            time,
            difficulty,
            modifier,
            enable: *state == 0x01,
        })
    }

    fn applies_to(&self, difficulty: Difficulty) -> bool {
        self.difficulty.is_none_or(|own| own == difficulty)
    }
}

/// Reclassifies the notes of `difficulty` which start inside a modifier window.
///
/// A window covers its opening time and ends right before its closing time.
/// Tap wins over open. Only fret notes are touched; modifiers, markers and drum
/// kicks keep their type. `events` and `toggles` must be sorted by time; this
/// is one forward sweep over both.
pub fn apply_modifiers(events: &mut [TrackEvent], toggles: &[ModifierToggle], difficulty: Difficulty) {
    let mut toggles = toggles
        .iter()
        .filter(|toggle| toggle.applies_to(difficulty))
        .peekable();
    let (mut open, mut tap) = (false, false);
    for event in events {
        while let Some(toggle) = toggles.next_if(|toggle| toggle.time <= event.time) {
            match toggle.modifier {
                Modifier::Open => open = toggle.enable,
                Modifier::Tap => tap = toggle.enable,
            }
        }
        if !event.event_type.is_fret() {
            continue;
        }
        if tap {
            event.event_type = EventType::Tap;
        } else if open {
            event.event_type = EventType::Open;
        }
    }
}
