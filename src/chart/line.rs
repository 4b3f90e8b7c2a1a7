//! Grammar of single lines inside chart sections.
//!
//! Every timed line reads `<tick> = <kind> <args...>`. Lines which do not match
//! are not an error; callers simply drop them.

/// A timed line of an instrument track section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackLine<'a> {
    /// `<tick> = N <id> <sustain>`
    Note {
        /// Position.
        tick: u64,
        /// Note id, meaning depends on the instrument class.
        id: u32,
        /// Sustain in ticks.
        sustain: u64,
    },
    /// `<tick> = S <code> <length>`
    Special {
        /// Position.
        tick: u64,
        /// `2` for star power, `64` for a drum activation lane.
        code: u32,
        /// Length in ticks.
        length: u64,
    },
    /// `<tick> = E <text>`
    Event {
        /// Position.
        tick: u64,
        /// The text, without surrounding quotes.
        text: &'a str,
    },
}

impl TrackLine<'_> {
    /// The position of this line.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        match *self {
            Self::Note { tick, .. } | Self::Special { tick, .. } | Self::Event { tick, .. } => tick,
        }
    }
}

/// A timed line of the `SyncTrack` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncLine {
    /// `<tick> = B <bpm * 1000>`
    Tempo {
        /// Position.
        tick: u64,
        /// Thousandths of a beat per minute.
        milli_bpm: u64,
    },
    /// `<tick> = TS <numerator> [<denominator exponent>]`
    TimeSignature {
        /// Position.
        tick: u64,
        /// Beats per measure.
        numerator: u32,
        /// Exponent of two of the beat unit, 2 (quarter notes) when omitted.
        denominator_exponent: u32,
    },
}

/// Splits `<tick> = <kind> <rest>`.
fn split_timed(line: &str) -> Option<(u64, &str, &str)> {
    let (tick, rest) = line.split_once('=')?;
    let tick = tick.trim().parse().ok()?;
    let rest = rest.trim();
    let (kind, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(kind, args)| (kind, args.trim()));
    Some((tick, kind, args))
}

fn two_numbers<A: std::str::FromStr, B: std::str::FromStr>(args: &str) -> Option<(A, B)> {
    let mut numbers = args.split_whitespace();
    let first = numbers.next()?.parse().ok()?;
    let second = numbers.next()?.parse().ok()?;
    Some((first, second))
}

/// Strips one pair of surrounding double quotes, if present.
#[must_use]
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parses a line of an instrument track section.
#[must_use]
pub fn parse_track_line(line: &str) -> Option<TrackLine<'_>> {
    let (tick, kind, args) = split_timed(line)?;
    match kind {
        "N" => {
            let (id, sustain) = two_numbers(args)?;
            Some(TrackLine::Note { tick, id, sustain })
        }
        "S" => {
            let (code, length) = two_numbers(args)?;
            Some(TrackLine::Special { tick, code, length })
        }
        "E" => Some(TrackLine::Event {
            tick,
            text: unquote(args),
        }),
        _ => None,
    }
}

/// Parses a line of the `SyncTrack` section.
#[must_use]
pub fn parse_sync_line(line: &str) -> Option<SyncLine> {
    let (tick, kind, args) = split_timed(line)?;
    let mut numbers = args.split_whitespace();
    match kind {
        "B" => Some(SyncLine::Tempo {
            tick,
            milli_bpm: numbers.next()?.parse().ok()?,
        }),
        "TS" => {
            let numerator = numbers.next()?.parse().ok()?;
            let denominator_exponent = match numbers.next() {
                Some(exponent) => exponent.parse().ok()?,
                None => 2,
            };
            Some(SyncLine::TimeSignature {
                tick,
                numerator,
                denominator_exponent,
            })
        }
        _ => None,
    }
}

/// Parses a `key = value` line of the `Song` section, unquoting the value.
#[must_use]
pub fn parse_property(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), unquote(value.trim())))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn track_lines() {
        assert_eq!(
            parse_track_line("768 = N 3 96"),
            Some(TrackLine::Note {
                tick: 768,
                id: 3,
                sustain: 96
            })
        );
        assert_eq!(
            parse_track_line("0   =   S 2 1536"),
            Some(TrackLine::Special {
                tick: 0,
                code: 2,
                length: 1536
            })
        );
        assert_eq!(
            parse_track_line("96 = E solo"),
            Some(TrackLine::Event {
                tick: 96,
                text: "solo"
            })
        );
        assert_eq!(parse_track_line("96 = N 3"), None);
        assert_eq!(parse_track_line("x = N 3 0"), None);
        assert_eq!(parse_track_line("96 = Q 3 0"), None);
    }

    #[test]
    fn sync_lines() {
        assert_eq!(
            parse_sync_line("0 = B 120000"),
            Some(SyncLine::Tempo {
                tick: 0,
                milli_bpm: 120_000
            })
        );
        assert_eq!(
            parse_sync_line("0 = TS 4"),
            Some(SyncLine::TimeSignature {
                tick: 0,
                numerator: 4,
                denominator_exponent: 2
            })
        );
        assert_eq!(
            parse_sync_line("1536 = TS 7 3"),
            Some(SyncLine::TimeSignature {
                tick: 1536,
                numerator: 7,
                denominator_exponent: 3
            })
        );
        assert_eq!(parse_sync_line("0 = A 120000"), None);
    }

    #[test]
    fn properties() {
        assert_eq!(parse_property("Resolution = 192"), Some(("Resolution", "192")));
        assert_eq!(parse_property("Name = \"Song\""), Some(("Name", "Song")));
        assert_eq!(parse_property("garbage"), None);
    }
}
