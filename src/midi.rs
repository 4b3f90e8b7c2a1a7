//! Decoder of the binary event-track format (`.mid`).
//!
//! Raw bytes == [`midly`] ==> tracks of timed events == [`classify`] ==> note edges
//! == [`pairing`] ==> sustained events == [`modifier`] ==> [`DecodedChart`]
//!
//! Tempo and time signature meta events may live on any track; they are
//! collected first so that every other track can be stamped on one timeline.

pub mod classify;
pub mod modifier;
pub mod pairing;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::{
    decode::{DecodeError, DecodedChart, DecodedTrack},
    model::{
        ChartFormat, Difficulty, Instrument, InstrumentClass, TimeSignatureMarker, TrackKey,
        canonicalize_events,
    },
    notes_data::ChartIssueType,
    timeline::TempoTimeline,
};

use self::{
    classify::{TrackRole, classify_note, track_role},
    modifier::{ModifierToggle, apply_modifiers},
    pairing::{NotePairer, clamp_short_sustains},
};

const MICROS_PER_MINUTE: f64 = 60_000_000.0;
const SECTION_MARKERS: [&str; 2] = ["[section", "[prc_"];

type TimedTrack<'a> = Vec<(u64, TrackEventKind<'a>)>;

/// Decodes a Standard MIDI File into the unified event model.
///
/// A file without any tempo event is reported as a chart issue and no track is
/// decoded.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidMidi`] when the container is malformed and
/// [`DecodeError::UnsupportedTiming`] for time-code division.
pub fn decode_midi(bytes: &[u8]) -> Result<DecodedChart, DecodeError> {
    let smf = Smf::parse(bytes).map_err(|err| DecodeError::InvalidMidi(err.to_string()))?;
    let Timing::Metrical(ticks_per_beat) = smf.header.timing else {
        return Err(DecodeError::UnsupportedTiming);
    };
    let mut chart = DecodedChart::new(ChartFormat::Mid);
    chart.resolution = u32::from(ticks_per_beat.as_int());
    if chart.resolution == 0 {
        chart.push_issue(ChartIssueType::NoResolution);
    }

    let tracks: Vec<TimedTrack<'_>> = smf.tracks.iter().map(|track| absolute_ticks(track)).collect();

    let mut tempos = vec![];
    let mut time_signatures = vec![];
    for (tick, kind) in tracks.iter().flatten() {
        match kind {
            TrackEventKind::Meta(MetaMessage::Tempo(micros_per_beat)) => {
                tempos.push((*tick, MICROS_PER_MINUTE / f64::from(micros_per_beat.as_int())));
            }
            TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, exponent, _, _)) => {
                time_signatures.push(TimeSignatureMarker::new(
                    *tick,
                    u32::from(*numerator),
                    u32::from(*exponent),
                ));
            }
            _ => {}
        }
    }
    if tempos.is_empty() {
        chart.push_issue(ChartIssueType::NoSyncTrackSection);
    }
    time_signatures.sort_by_key(|signature| signature.tick);
    chart.time_signatures = time_signatures;

    chart.tempo_event_count = tempos.len();
    let mut timeline = TempoTimeline::new(tempos, chart.resolution);
    chart.tempo_markers = timeline.markers().to_vec();
    if chart.is_halted() || !timeline.is_functional() {
        log::warn!("midi file has no usable tempo map, skipping its tracks");
        return Ok(chart);
    }

    let mut seen = vec![];
    for track in &tracks {
        let Some(name) = track_name(track) else {
            continue;
        };
        match track_role(&name) {
            Some(TrackRole::Events) => {
                chart.has_sections |= track.iter().any(|(_, kind)| is_section_marker(kind));
            }
            Some(TrackRole::Vocals) => {
                chart.has_lyrics |= track.iter().any(|(_, kind)| is_vocal_content(kind));
            }
            Some(TrackRole::Instrument(instrument)) => {
                if seen.contains(&instrument) {
                    log::warn!("ignoring duplicate track {name:?}");
                    continue;
                }
                seen.push(instrument);
                chart
                    .tracks
                    .extend(instrument_tracks(track, instrument, &mut timeline));
            }
            None => log::debug!("ignoring unknown track {name:?}"),
        }
    }
    chart.tracks.sort_by_key(|track| track.key);

    Ok(chart)
}

/// Converts delta times into absolute ticks.
fn absolute_ticks<'a>(track: &[midly::TrackEvent<'a>]) -> TimedTrack<'a> {
    let mut tick = 0u64;
    track
        .iter()
        .map(|event| {
            tick += u64::from(event.delta.as_int());
            (tick, event.kind)
        })
        .collect()
}

fn track_name(track: &[(u64, TrackEventKind<'_>)]) -> Option<String> {
    track.iter().find_map(|(_, kind)| match kind {
        TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
            Some(String::from_utf8_lossy(name).trim().to_owned())
        }
        _ => None,
    })
}

fn is_section_marker(kind: &TrackEventKind<'_>) -> bool {
    let TrackEventKind::Meta(MetaMessage::Text(text)) = kind else {
        return false;
    };
    let text = String::from_utf8_lossy(text);
    SECTION_MARKERS.iter().any(|marker| text.contains(marker))
}

fn is_vocal_content(kind: &TrackEventKind<'_>) -> bool {
    matches!(
        kind,
        TrackEventKind::Midi { .. }
            | TrackEventKind::SysEx(_)
            | TrackEventKind::Escape(_)
            | TrackEventKind::Meta(MetaMessage::Text(_) | MetaMessage::Lyric(_))
    )
}

/// Decodes every difficulty of one instrument track.
fn instrument_tracks(
    track: &[(u64, TrackEventKind<'_>)],
    instrument: Instrument,
    timeline: &mut TempoTimeline,
) -> Vec<DecodedTrack> {
    let class = instrument.class();
    let mut pairer = NotePairer::new();
    let mut toggles = vec![];

    timeline.reset();
    for &(tick, kind) in track {
        let (key, is_on) = match kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } => (key.as_int(), vel.as_int() > 0),
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { key, .. },
                ..
            } => (key.as_int(), false),
            TrackEventKind::SysEx(data) | TrackEventKind::Escape(data) => {
                if let Some(toggle) = timeline
                    .tick_to_time(tick)
                    .and_then(|time| ModifierToggle::parse(time, data))
                {
                    toggles.push(toggle);
                }
                continue;
            }
            _ => continue,
        };
        let Some(meaning) = classify_note(class, key) else {
            log::debug!("ignoring note {key} on {instrument:?}");
            continue;
        };
        let Some(time) = timeline.tick_to_time(tick) else {
            continue;
        };
        if is_on {
            pairer.note_on(meaning, time);
        } else {
            pairer.note_off(meaning, time);
        }
    }

    let mut grouped = pairer.finish();
    let markers = grouped.remove(&None).unwrap_or_default();
    let mut decoded = vec![];
    for difficulty in Difficulty::ASCENDING {
        let Some(mut events) = grouped.remove(&Some(difficulty)) else {
            continue;
        };
        if class != InstrumentClass::Drums {
            apply_modifiers(&mut events, &toggles, difficulty);
        }
        clamp_short_sustains(&mut events, timeline);
        events.extend_from_slice(&markers);
        canonicalize_events(&mut events);
        decoded.push(DecodedTrack {
            key: TrackKey::new(instrument, difficulty),
            events,
        });
    }
    decoded
}
