//! Reduction of per-track analyses into one [`NotesData`].
//!
//! [`aggregate`] runs [`analyze_track`] over every decoded track in order. When
//! the analyses are produced elsewhere, e.g. in parallel, hand them to
//! [`reduce`] instead; both give the same document.

use itertools::Itertools;

use crate::{
    analyze::{TrackAnalysis, TrackFlags, analyze_track},
    config::ScanConfig,
    decode::DecodedChart,
    hash::tempo_map_hash,
    model::{Difficulty, Millis, TimeSignatureMarker},
    notes_data::{ChartIssueType, NoteCount, NotesData, TrackHash, TrackIssues, TrackNoteIssues},
};

const DEFAULT_BPM: f64 = 120.0;
/// Measure boundaries closer than this to a signature's tick count as on it.
const ALIGNMENT_TOLERANCE: f64 = 1e-5;

/// Analyzes every track of `chart` and reduces the results.
#[must_use]
pub fn aggregate(chart: &DecodedChart, config: &ScanConfig) -> NotesData {
    if chart.is_halted() {
        return NotesData::with_chart_issues(chart.chart_issues.clone());
    }
    let analyses = chart
        .tracks
        .iter()
        .map(|track| analyze_track(track.key, &track.events, chart.format, config))
        .collect();
    reduce(chart, analyses, config)
}

/// Reduces the analyses of `chart`'s tracks, given in the same order as
/// `chart.tracks`, into the result document.
#[must_use]
pub fn reduce(chart: &DecodedChart, analyses: Vec<TrackAnalysis>, config: &ScanConfig) -> NotesData {
    let mut chart_issues = chart.chart_issues.clone();
    if chart.is_halted() {
        return NotesData::with_chart_issues(chart_issues);
    }

    let Some((first_note, last_note)) = note_span(&analyses) else {
        log::debug!("chart has no notes");
        push_unique(&mut chart_issues, ChartIssueType::NoNotes);
        return NotesData::with_chart_issues(chart_issues);
    };

    if has_missing_expert(chart) {
        push_unique(&mut chart_issues, ChartIssueType::NoExpert);
    }
    if is_default_bpm(chart) {
        push_unique(&mut chart_issues, ChartIssueType::IsDefaultBpm);
    }
    if time_signatures_misaligned(&chart.time_signatures, chart.resolution) {
        push_unique(&mut chart_issues, ChartIssueType::MisalignedTimeSignatures);
    }
    if !chart.has_sections {
        push_unique(&mut chart_issues, ChartIssueType::NoSections);
    }
    if first_note.as_f64() < config.leading_silence_ms {
        push_unique(&mut chart_issues, ChartIssueType::SmallLeadingSilence);
    }

    let mut notes_data = NotesData {
        instruments: chart
            .tracks
            .iter()
            .map(|track| track.key.instrument)
            .unique()
            .collect(),
        has_lyrics: chart.has_lyrics,
        chart_issues,
        tempo_map_hash: tempo_map_hash(&chart.tempo_markers, &chart.time_signatures),
        tempo_marker_count: chart.tempo_event_count,
        length: last_note.floor(),
        effective_length: (last_note - first_note).floor(),
        ..NotesData::default()
    };
    let mut flags = TrackFlags::default();
    for analysis in analyses {
        let TrackAnalysis {
            key,
            note_count,
            note_issues,
            track_issues,
            max_nps,
            hash,
            flags: track_flags,
            ..
        } = analysis;
        flags |= track_flags;
        if let Some(note_issues) = note_issues {
            notes_data.note_issues.push(TrackNoteIssues {
                instrument: key.instrument,
                difficulty: key.difficulty,
                note_issues,
            });
        }
        if let Some(track_issues) = track_issues {
            notes_data.track_issues.push(TrackIssues {
                instrument: key.instrument,
                difficulty: key.difficulty,
                track_issues,
            });
        }
        notes_data.note_counts.push(NoteCount {
            instrument: key.instrument,
            difficulty: key.difficulty,
            count: note_count,
        });
        notes_data.max_nps.extend(max_nps);
        notes_data.hashes.push(TrackHash {
            instrument: key.instrument,
            difficulty: key.difficulty,
            hash,
        });
    }
    notes_data.has_solo_sections = flags.has_solo_sections;
    notes_data.has_forced_notes = flags.has_forced_notes;
    notes_data.has_tap_notes = flags.has_tap_notes;
    notes_data.has_open_notes = flags.has_open_notes;
    notes_data.has_2x_kick = flags.has_2x_kick;

    log::debug!(
        "aggregated {} tracks, {} chart issues, length {} ms",
        notes_data.note_counts.len(),
        notes_data.chart_issues.len(),
        notes_data.length
    );
    notes_data
}

fn push_unique(issues: &mut Vec<ChartIssueType>, issue: ChartIssueType) {
    if !issues.contains(&issue) {
        issues.push(issue);
    }
}

/// Whether some instrument has a lower difficulty charted but not Expert.
fn has_missing_expert(chart: &DecodedChart) -> bool {
    chart
        .tracks
        .iter()
        .into_group_map_by(|track| track.key.instrument)
        .values()
        .any(|tracks| {
            tracks
                .iter()
                .all(|track| track.key.difficulty != Difficulty::Expert)
        })
}

fn is_default_bpm(chart: &DecodedChart) -> bool {
    matches!(chart.tempo_markers.as_slice(), [only] if only.bpm == DEFAULT_BPM)
        && chart.time_signatures.len() == 1
}

/// Walks measure boundaries from tick zero and checks that every time
/// signature lands on one.
fn time_signatures_misaligned(signatures: &[TimeSignatureMarker], resolution: u32) -> bool {
    let mut boundary = 0.0;
    let mut signatures = signatures.iter().peekable();
    while let Some(signature) = signatures.next() {
        if (boundary - signature.tick as f64).abs() > ALIGNMENT_TOLERANCE {
            return true;
        }
        let Some(next) = signatures.peek() else {
            break;
        };
        let measure = signature.measure_ticks(resolution);
        if measure <= 0.0 {
            // Empty measures never advance, so only a signature on the same tick fits.
            if next.tick != signature.tick {
                return true;
            }
            continue;
        }
        // Jumps to the first boundary at or after the next signature in one step.
        let measures = ((next.tick as f64 - boundary) / measure).ceil().max(0.0);
        boundary += measures * measure;
    }
    false
}

/// The times of the first and last grouped notes over all analyses.
fn note_span(analyses: &[TrackAnalysis]) -> Option<(Millis, Millis)> {
    let first = analyses.iter().filter_map(|analysis| analysis.first_note).min()?;
    let last = analyses.iter().filter_map(|analysis| analysis.last_note).max()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        decode::DecodedTrack,
        model::{ChartFormat, EventType, Instrument, TempoMarker, TrackEvent, TrackKey},
    };

    fn signature(tick: u64, numerator: u32) -> TimeSignatureMarker {
        TimeSignatureMarker::new(tick, numerator, 2)
    }

    fn chart_with(tempos: &[f64], tracks: Vec<DecodedTrack>) -> DecodedChart {
        let mut chart = DecodedChart::new(ChartFormat::Chart);
        chart.resolution = 192;
        chart.tempo_markers = tempos
            .iter()
            .enumerate()
            .map(|(index, &bpm)| TempoMarker {
                tick: index as u64 * 768,
                time: Millis::new(index as f64 * 2000.0),
                bpm,
            })
            .collect();
        chart.tempo_event_count = tempos.len();
        chart.time_signatures = vec![signature(0, 4)];
        chart.has_sections = true;
        chart.tracks = tracks;
        chart
    }

    fn track(instrument: Instrument, difficulty: Difficulty, times: &[f64]) -> DecodedTrack {
        DecodedTrack {
            key: TrackKey::new(instrument, difficulty),
            events: times
                .iter()
                .map(|&time| TrackEvent::new(time, EventType::Green, 0.0))
                .collect(),
        }
    }

    #[test]
    fn aligned_signatures() {
        assert!(!time_signatures_misaligned(&[], 192));
        assert!(!time_signatures_misaligned(
            &[signature(0, 4), signature(768 * 2, 3), signature(768 * 2 + 576, 4)],
            192
        ));
        assert!(time_signatures_misaligned(&[signature(96, 4)], 192));
        assert!(time_signatures_misaligned(&[signature(0, 4), signature(700, 3)], 192));
    }

    #[test]
    fn tiny_measures_do_not_hang() {
        // A measure of 768 / 2^64 ticks still reaches tick 768 exactly.
        let tiny = TimeSignatureMarker::new(0, 1, 64);
        assert!(!time_signatures_misaligned(&[tiny, signature(768, 4)], 192));
        let smallest = TimeSignatureMarker::new(0, 1, 1023);
        assert!(!time_signatures_misaligned(&[smallest, signature(768, 4)], 192));
        assert!(time_signatures_misaligned(
            &[smallest, signature(768, 4), signature(800, 4)],
            192
        ));
        assert!(!time_signatures_misaligned(
            &[signature(0, 4), signature(768 << 40, 4)],
            192
        ));
    }

    #[test]
    fn zero_measure_does_not_hang() {
        assert!(time_signatures_misaligned(&[signature(0, 0), signature(768, 4)], 192));
        assert!(!time_signatures_misaligned(&[signature(0, 0), signature(0, 4)], 192));
    }

    #[test]
    fn default_bpm_heuristic() {
        let tracks = vec![track(Instrument::Guitar, Difficulty::Expert, &[1500.0])];
        let single = aggregate(&chart_with(&[120.0], tracks.clone()), &ScanConfig::default());
        assert!(single.has_chart_issue(ChartIssueType::IsDefaultBpm));
        let two = aggregate(&chart_with(&[120.0, 140.0], tracks), &ScanConfig::default());
        assert!(!two.has_chart_issue(ChartIssueType::IsDefaultBpm));
    }

    #[test]
    fn missing_expert_and_lengths() {
        let chart = chart_with(
            &[150.0],
            vec![
                track(Instrument::Guitar, Difficulty::Expert, &[1500.25, 9000.9]),
                track(Instrument::Bass, Difficulty::Hard, &[1200.5]),
            ],
        );
        let notes_data = aggregate(&chart, &ScanConfig::default());
        assert_eq!(notes_data.chart_issues, vec![ChartIssueType::NoExpert]);
        assert_eq!(notes_data.instruments, vec![Instrument::Guitar, Instrument::Bass]);
        assert_eq!(notes_data.length, 9000);
        assert_eq!(notes_data.effective_length, 7800);
        assert_eq!(notes_data.tempo_marker_count, 1);
        assert_eq!(notes_data.note_counts.len(), 2);
    }

    #[test]
    fn no_notes_keeps_only_issues() {
        let chart = chart_with(&[150.0], vec![track(Instrument::Drums, Difficulty::Expert, &[])]);
        let notes_data = aggregate(&chart, &ScanConfig::default());
        assert_eq!(
            notes_data,
            NotesData::with_chart_issues(vec![ChartIssueType::NoNotes])
        );
    }

    #[test]
    fn halted_chart_keeps_only_issues() {
        let mut chart = chart_with(&[], vec![]);
        chart.push_issue(ChartIssueType::NoSyncTrackSection);
        assert_eq!(
            aggregate(&chart, &ScanConfig::default()),
            NotesData::with_chart_issues(vec![ChartIssueType::NoSyncTrackSection])
        );
    }
}
