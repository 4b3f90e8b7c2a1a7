//! Builder of Standard MIDI File bytes for the binary decoder tests.
#![allow(dead_code)]

/// A format 1 file under construction.
#[derive(Debug)]
pub struct SmfBuilder {
    resolution: u16,
    tracks: Vec<TrackBuilder>,
}

impl SmfBuilder {
    /// Starts a file with `resolution` ticks per quarter note.
    pub const fn new(resolution: u16) -> Self {
        Self {
            resolution,
            tracks: Vec::new(),
        }
    }

    /// Appends a finished track.
    pub fn track(mut self, track: TrackBuilder) -> Self {
        self.tracks.push(track);
        self
    }

    /// Serializes the header chunk and every track chunk.
    pub fn build(self) -> Vec<u8> {
        let mut out = b"MThd".to_vec();
        out.extend(6u32.to_be_bytes());
        out.extend(1u16.to_be_bytes());
        out.extend((self.tracks.len() as u16).to_be_bytes());
        out.extend(self.resolution.to_be_bytes());
        for track in self.tracks {
            let data = track.encode();
            out.extend(b"MTrk");
            out.extend((data.len() as u32).to_be_bytes());
            out.extend(data);
        }
        out
    }
}

/// One track chunk, events given at absolute ticks in any order.
#[derive(Debug, Default)]
pub struct TrackBuilder {
    events: Vec<(u32, Vec<u8>)>,
}

impl TrackBuilder {
    /// An empty, unnamed track.
    pub fn new() -> Self {
        Self::default()
    }

    /// A track starting with a track name meta event.
    pub fn named(name: &str) -> Self {
        Self::new().meta(0, 0x03, name.as_bytes())
    }

    fn push(mut self, tick: u32, bytes: Vec<u8>) -> Self {
        self.events.push((tick, bytes));
        self
    }

    fn meta(self, tick: u32, kind: u8, data: &[u8]) -> Self {
        let mut bytes = vec![0xFF, kind];
        bytes.extend(vlq(data.len() as u32));
        bytes.extend_from_slice(data);
        self.push(tick, bytes)
    }

    /// A tempo change given in beats per minute.
    pub fn tempo(self, tick: u32, bpm: u32) -> Self {
        let micros = 60_000_000 / bpm;
        self.meta(tick, 0x51, &micros.to_be_bytes()[1..])
    }

    /// A time signature `numerator / 2^exponent`.
    pub fn time_signature(self, tick: u32, numerator: u8, exponent: u8) -> Self {
        self.meta(tick, 0x58, &[numerator, exponent, 24, 8])
    }

    /// A text meta event.
    pub fn text(self, tick: u32, text: &str) -> Self {
        self.meta(tick, 0x01, text.as_bytes())
    }

    /// A lyric meta event.
    pub fn lyric(self, tick: u32, text: &str) -> Self {
        self.meta(tick, 0x05, text.as_bytes())
    }

    /// A note held for `length` ticks, ended by a note-off.
    pub fn note(self, tick: u32, key: u8, length: u32) -> Self {
        self.push(tick, vec![0x90, key, 0x64])
            .push(tick + length, vec![0x80, key, 0x40])
    }

    /// A note held for `length` ticks, ended by a zero-velocity note-on.
    pub fn note_with_zero_velocity_off(self, tick: u32, key: u8, length: u32) -> Self {
        self.push(tick, vec![0x90, key, 0x64])
            .push(tick + length, vec![0x90, key, 0x00])
    }

    /// A lone note-on.
    pub fn note_on(self, tick: u32, key: u8) -> Self {
        self.push(tick, vec![0x90, key, 0x64])
    }

    /// A sysex event carrying `data`, terminated by `0xF7`.
    pub fn sysex(self, tick: u32, data: &[u8]) -> Self {
        let mut bytes = vec![0xF0];
        bytes.extend(vlq(data.len() as u32 + 1));
        bytes.extend_from_slice(data);
        bytes.push(0xF7);
        self.push(tick, bytes)
    }

    /// A modifier toggle in the vendor sysex layout.
    pub fn modifier(self, tick: u32, difficulty: u8, kind: u8, enable: bool) -> Self {
        self.sysex(tick, &[b'P', b'S', 0, 0, difficulty, kind, u8::from(enable)])
    }

    fn encode(mut self) -> Vec<u8> {
        // Stable, so events on one tick keep the order they were added in.
        self.events.sort_by_key(|(tick, _)| *tick);
        let mut out = vec![];
        let mut last = 0;
        for (tick, bytes) in self.events {
            out.extend(vlq(tick - last));
            out.extend(bytes);
            last = tick;
        }
        out.extend([0x00, 0xFF, 0x2F, 0x00]);
        out
    }
}

/// Encodes `value` as a variable-length quantity.
fn vlq(mut value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        out.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.reverse();
    out
}

/// The conductor track most tests share: one tempo and one time signature.
pub fn conductor(bpm: u32) -> TrackBuilder {
    TrackBuilder::new().tempo(0, bpm).time_signature(0, 4, 2)
}

#[cfg(test)]
mod tests {
    use super::vlq;

    #[test]
    fn variable_length_quantities() {
        assert_eq!(vlq(0), vec![0x00]);
        assert_eq!(vlq(0x7F), vec![0x7F]);
        assert_eq!(vlq(0x80), vec![0x81, 0x00]);
        assert_eq!(vlq(1920), vec![0x8F, 0x00]);
    }
}
