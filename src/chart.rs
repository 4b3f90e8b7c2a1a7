//! Decoder of the bracketed text chart format (`.chart`).
//!
//! Raw text == [`Sections::scan`] ==> named sections == line grammar ==> [`DecodedChart`]
//!
//! The `Song` section provides the resolution, `SyncTrack` the tempo map and
//! time signatures, `Events` the chart-wide text markers, and every section
//! named in [`note_id::TRACK_SECTIONS`] one instrument track.

pub mod line;
pub mod note_id;
pub mod sections;

use crate::{
    decode::{DecodeError, DecodedChart, DecodedTrack},
    model::{
        ChartFormat, EventType, InstrumentClass, TimeSignatureMarker, TrackEvent,
        canonicalize_events,
    },
    notes_data::ChartIssueType,
    timeline::TempoTimeline,
};

use self::{
    line::{SyncLine, TrackLine, parse_property, parse_sync_line, parse_track_line},
    note_id::{ACTIVATION_LANE_CODE, SOLO_TEXT, STAR_POWER_CODE, TRACK_SECTIONS},
    sections::Sections,
};

const SONG_SECTION: &str = "Song";
const SYNC_TRACK_SECTION: &str = "SyncTrack";
const EVENTS_SECTION: &str = "Events";
const LYRIC_MARKER: &str = "\"lyric ";
const SECTION_MARKER: &str = "\"section ";

/// Decodes chart text into the unified event model.
///
/// Missing resolution or tempo information is reported as a chart issue and
/// stops decoding before any track is read.
///
/// # Errors
///
/// Returns [`DecodeError`] when the section bracketing is malformed.
pub fn decode_chart(source: &str) -> Result<DecodedChart, DecodeError> {
    let sections = Sections::scan(source)?;
    let mut chart = DecodedChart::new(ChartFormat::Chart);

    chart.resolution = resolution(sections.lines(SONG_SECTION));
    if chart.resolution == 0 {
        chart.push_issue(ChartIssueType::NoResolution);
    }

    let mut tempos = vec![];
    let mut time_signatures = vec![];
    for line in sections.lines(SYNC_TRACK_SECTION) {
        match parse_sync_line(line) {
            Some(SyncLine::Tempo { tick, milli_bpm }) => {
                tempos.push((tick, milli_bpm as f64 / 1000.0));
            }
            Some(SyncLine::TimeSignature {
                tick,
                numerator,
                denominator_exponent,
            }) => time_signatures.push(TimeSignatureMarker::new(
                tick,
                numerator,
                denominator_exponent,
            )),
            None => {}
        }
    }
    if tempos.is_empty() || time_signatures.is_empty() {
        chart.push_issue(ChartIssueType::NoSyncTrackSection);
    }
    time_signatures.sort_by_key(|signature| signature.tick);
    chart.time_signatures = time_signatures;

    // Only quoted event text counts.
    for line in sections.lines(EVENTS_SECTION) {
        chart.has_lyrics |= line.contains(LYRIC_MARKER);
        chart.has_sections |= line.contains(SECTION_MARKER);
    }

    chart.tempo_event_count = tempos.len();
    let mut timeline = TempoTimeline::new(tempos, chart.resolution);
    chart.tempo_markers = timeline.markers().to_vec();
    if chart.is_halted() || !timeline.is_functional() {
        log::warn!("chart has no usable tempo map, skipping its tracks");
        return Ok(chart);
    }

    for (name, key) in TRACK_SECTIONS {
        let Some(lines) = sections.get(name) else {
            continue;
        };
        let events = track_events(lines, key.instrument.class(), &mut timeline);
        chart.tracks.push(DecodedTrack { key, events });
    }

    Ok(chart)
}

fn resolution(song: &[&str]) -> u32 {
    song.iter()
        .filter_map(|line| parse_property(line))
        .find(|(key, _)| *key == "Resolution")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

/// Time-stamps the lines of one track section.
fn track_events(
    lines: &[&str],
    class: InstrumentClass,
    timeline: &mut TempoTimeline,
) -> Vec<TrackEvent> {
    let mut parsed: Vec<TrackLine<'_>> = lines
        .iter()
        .filter_map(|line| {
            let parsed = parse_track_line(line);
            if parsed.is_none() {
                log::debug!("dropping unrecognized track line {line:?}");
            }
            parsed
        })
        .collect();
    // Stable, so lines on one tick keep their relative order.
    parsed.sort_by_key(|line| line.tick());

    timeline.reset();
    let mut events = Vec::with_capacity(parsed.len());
    for line in parsed {
        let (event_type, length) = match line {
            TrackLine::Note { id, sustain, .. } => {
                let Some(event_type) = note_id::note_event_type(class, id) else {
                    continue;
                };
                (event_type, sustain)
            }
            TrackLine::Special {
                code: STAR_POWER_CODE,
                length,
                ..
            } => (EventType::StarPower, length),
            TrackLine::Special {
                code: ACTIVATION_LANE_CODE,
                length,
                ..
            } => (EventType::ActivationLane, length),
            TrackLine::Event {
                text: SOLO_TEXT, ..
            } => (EventType::SoloMarker, 0),
            TrackLine::Special { .. } | TrackLine::Event { .. } => continue,
        };
        let tick = line.tick();
        let (Some(time), Some(length)) = (timeline.tick_to_time(tick), timeline.span_ms(tick, length))
        else {
            continue;
        };
        events.push(TrackEvent {
            time,
            event_type,
            length,
        });
    }
    canonicalize_events(&mut events);
    events
}
