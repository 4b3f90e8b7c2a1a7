//! End-to-end tests of the text chart format.

use pretty_assertions::assert_eq;

use scan_chart::prelude::*;

const CLEAN: &str = include_str!("files/clean.chart");
const MESSY: &str = include_str!("files/messy.chart");

const EXPERT_GUITAR: TrackKey = TrackKey::new(Instrument::Guitar, Difficulty::Expert);
const HARD_GUITAR: TrackKey = TrackKey::new(Instrument::Guitar, Difficulty::Hard);

/// Wraps track sections into a chart with the given sync track.
fn chart(resolution: u32, sync: &[&str], tracks: &[(&str, &[&str])]) -> String {
    let mut out = format!("[Song]\n{{\n  Resolution = {resolution}\n}}\n[SyncTrack]\n{{\n");
    for line in sync {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("}\n[Events]\n{\n  0 = E \"section Intro\"\n}\n");
    for (name, lines) in tracks {
        out.push_str(&format!("[{name}]\n{{\n"));
        for line in *lines {
            out.push_str(&format!("  {line}\n"));
        }
        out.push_str("}\n");
    }
    out
}

fn note_issue_types(notes_data: &NotesData, key: TrackKey) -> Vec<(NoteIssueType, f64)> {
    notes_data
        .note_issues_of(key)
        .unwrap_or_default()
        .iter()
        .map(|issue| (issue.issue_type, issue.time.as_f64()))
        .collect()
}

#[test]
fn clean_chart_has_no_issues() {
    let notes_data = scan_chart(CLEAN).expect("well-formed");
    assert_eq!(notes_data.chart_issues, vec![]);
    assert_eq!(notes_data.note_issues, vec![]);
    assert_eq!(notes_data.track_issues, vec![]);
    assert_eq!(notes_data.instruments, vec![Instrument::Guitar]);
    assert!(notes_data.has_lyrics);
    assert!(notes_data.has_solo_sections);
    assert!(notes_data.has_forced_notes);
    assert!(notes_data.has_tap_notes);
    assert!(notes_data.has_open_notes);
    assert!(!notes_data.has_2x_kick);
    assert_eq!(notes_data.tempo_marker_count, 2);
    assert_eq!(
        notes_data
            .note_counts
            .iter()
            .map(|count| count.count)
            .collect::<Vec<_>>(),
        vec![10, 4]
    );
    // Last note at tick 3072: 1536 ticks at 150 bpm, then 1536 ticks at 200 bpm.
    assert_eq!(notes_data.length, 5600);
    assert_eq!(notes_data.effective_length, 4000);
}

#[test]
fn scenario_tick_in_first_tempo_region() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000", "192 = B 180000"],
        &[("ExpertSingle", &["96 = N 0 0"])],
    );
    let decoded = decode_chart(&source).expect("well-formed");
    assert_eq!(
        decoded.tracks[0].events,
        vec![TrackEvent::new(250.0, EventType::Green, 0.0)]
    );
}

#[test]
fn scenario_open_note_on_hard() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[("HardSingle", &["768 = S 2 192", "768 = N 7 0"])],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(
        note_issue_types(&notes_data, HARD_GUITAR),
        vec![(NoteIssueType::DifficultyForbiddenNote, 2000.0)]
    );
}

#[test]
fn scenario_five_note_chord() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[(
            "ExpertSingle",
            &[
                "768 = S 2 192",
                "768 = N 0 0",
                "768 = N 1 0",
                "768 = N 2 0",
                "768 = N 3 0",
                "768 = N 4 0",
            ],
        )],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(
        note_issue_types(&notes_data, EXPERT_GUITAR),
        vec![(NoteIssueType::FiveNoteChord, 2000.0)]
    );
}

#[test]
fn scenario_sustain_gap() {
    // At 60 bpm and 1000 ticks per beat, one tick is one millisecond.
    let sync = ["0 = TS 4", "0 = B 60000"];
    let inside = chart(
        1000,
        &sync,
        &[("ExpertSingle", &["0 = N 0 1000", "1010 = N 1 0"])],
    );
    let notes_data = scan_chart(&inside).expect("well-formed");
    assert_eq!(
        note_issue_types(&notes_data, EXPERT_GUITAR),
        vec![(NoteIssueType::BadSustainGap, 1010.0)]
    );

    let outside = chart(
        1000,
        &sync,
        &[("ExpertSingle", &["0 = N 0 1000", "1050 = N 1 0"])],
    );
    let notes_data = scan_chart(&outside).expect("well-formed");
    assert_eq!(notes_data.note_issues_of(EXPERT_GUITAR), None);
}

#[test]
fn scenario_default_bpm() {
    let track: &[(&str, &[&str])] = &[("ExpertSingle", &["768 = S 2 192", "768 = N 0 0"])];
    let single = scan_chart(&chart(192, &["0 = TS 4", "0 = B 120000"], track)).expect("well-formed");
    assert_eq!(single.chart_issues, vec![ChartIssueType::IsDefaultBpm]);

    let two = scan_chart(&chart(
        192,
        &["0 = TS 4", "0 = B 120000", "768 = B 120000"],
        track,
    ))
    .expect("well-formed");
    assert_eq!(two.chart_issues, vec![]);
}

#[test]
fn hashes_ignore_layout() {
    let clean = scan_chart(CLEAN).expect("well-formed");
    let messy = scan_chart(MESSY).expect("well-formed");
    let crlf = scan_chart(&CLEAN.replace('\n', "\r\n")).expect("well-formed");
    assert_eq!(clean.hashes, messy.hashes);
    assert_eq!(clean.hashes, crlf.hashes);
    assert_eq!(clean.tempo_map_hash, messy.tempo_map_hash);
    assert_ne!(
        clean.hash_of(EXPERT_GUITAR),
        clean.hash_of(HARD_GUITAR)
    );
}

#[test]
fn aggregating_twice_is_identical() {
    let decoded = decode_chart(MESSY).expect("well-formed");
    let config = ScanConfig::default();
    assert_eq!(aggregate(&decoded, &config), aggregate(&decoded, &config));
}

#[test]
fn empty_track_has_no_issue_entries() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[
            ("ExpertDrums", &[]),
            ("ExpertSingle", &["768 = S 2 192", "768 = N 0 0"]),
        ],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    let drums = TrackKey::new(Instrument::Drums, Difficulty::Expert);
    assert_eq!(notes_data.note_issues_of(drums), None);
    assert_eq!(notes_data.track_issues_of(drums), None);
    assert!(
        notes_data
            .max_nps
            .iter()
            .all(|max_nps| max_nps.instrument != Instrument::Drums)
    );
    assert!(notes_data.note_counts.iter().any(|count| {
        count.instrument == Instrument::Drums && count.count == 0
    }));
}

#[test]
fn drum_chart() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[
            (
                "ExpertDrums",
                &[
                    "768 = S 2 768",
                    "768 = S 64 384",
                    "768 = N 0 0",
                    "768 = N 32 0",
                    "960 = N 1 0",
                    "960 = N 2 0",
                    "960 = N 3 0",
                ],
            ),
            ("EasyDrums", &["768 = N 1 0", "768 = N 3 0", "768 = N 0 0"]),
        ],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert!(notes_data.has_2x_kick);
    assert_eq!(notes_data.chart_issues, vec![ChartIssueType::IsDefaultBpm]);
    assert_eq!(
        note_issue_types(&notes_data, TrackKey::new(Instrument::Drums, Difficulty::Expert)),
        vec![(NoteIssueType::ThreeNoteDrumChord, 2500.0)]
    );
    let easy = TrackKey::new(Instrument::Drums, Difficulty::Easy);
    assert_eq!(
        note_issue_types(&notes_data, easy),
        vec![(NoteIssueType::DifficultyForbiddenNote, 2000.0)]
    );
    assert_eq!(
        notes_data.track_issues_of(easy),
        Some(
            [
                TrackIssueType::NoStarPower,
                TrackIssueType::NoDrumActivationLanes
            ]
            .as_slice()
        )
    );
}

#[test]
fn missing_expert_and_sections() {
    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = TS 4\n  0 = B 130000\n}\n[HardDoubleBass]\n{\n  768 = S 2 192\n  768 = N 0 0\n}\n";
    let notes_data = scan_chart(source).expect("well-formed");
    assert_eq!(
        notes_data.chart_issues,
        vec![ChartIssueType::NoExpert, ChartIssueType::NoSections]
    );
}

#[test]
fn misaligned_signature_and_leading_silence() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 130000", "700 = TS 3"],
        &[("ExpertSingle", &["0 = S 2 192", "0 = N 0 0"])],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(
        notes_data.chart_issues,
        vec![
            ChartIssueType::MisalignedTimeSignatures,
            ChartIssueType::SmallLeadingSilence
        ]
    );
    assert_eq!(
        notes_data.track_issues_of(EXPERT_GUITAR),
        Some([TrackIssueType::SmallLeadingSilence].as_slice())
    );
}

#[test]
fn tiny_measure_signature_terminates() {
    let source = chart(
        192,
        &["0 = TS 1 64", "0 = B 120000", "768 = TS 4"],
        &[("ExpertSingle", &["768 = S 2 192", "768 = N 0 0"])],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(notes_data.chart_issues, vec![]);
}

#[test]
fn broken_notes_on_drums() {
    // At 60 bpm and 1000 ticks per beat, one tick is one millisecond.
    let source = chart(
        1000,
        &["0 = TS 4", "0 = B 60000"],
        &[(
            "ExpertDrums",
            &["0 = S 2 5000", "0 = S 64 5000", "2000 = N 1 0", "2002 = N 2 0"],
        )],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(
        note_issue_types(&notes_data, TrackKey::new(Instrument::Drums, Difficulty::Expert)),
        vec![(NoteIssueType::BrokenNote, 2002.0)]
    );
}

#[test]
fn tempo_count_includes_repeated_ticks() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000", "0 = B 120000"],
        &[("ExpertSingle", &["768 = S 2 192", "768 = N 0 0"])],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(notes_data.tempo_marker_count, 2);
    assert_eq!(notes_data.chart_issues, vec![ChartIssueType::IsDefaultBpm]);
}

#[test]
fn no_notes_at_all() {
    let source = chart(192, &["0 = TS 4", "0 = B 120000"], &[("ExpertSingle", &[])]);
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(
        notes_data,
        NotesData::with_chart_issues(vec![ChartIssueType::NoNotes])
    );
}

#[test]
fn missing_resolution_halts() {
    let source = "[Song]\n{\n  Name = \"x\"\n}\n[SyncTrack]\n{\n  0 = TS 4\n  0 = B 120000\n}\n[ExpertSingle]\n{\n  768 = N 0 0\n}\n";
    let notes_data = scan_chart(source).expect("well-formed");
    assert_eq!(
        notes_data,
        NotesData::with_chart_issues(vec![ChartIssueType::NoResolution])
    );
}

#[test]
fn malformed_header_is_a_hard_failure() {
    let err = scan_chart("[Song\n{\n}\n").expect_err("header is never closed");
    assert_eq!(
        err,
        DecodeError::UnterminatedSectionHeader {
            start: 0,
            line_break: 5
        }
    );
    assert_eq!(
        err.chart_issue(),
        ChartIssueType::UnparseableSectionsOrBadEncoding
    );
    assert_eq!(
        scan_chart("}\n[Song]\n{\n}\n"),
        Err(DecodeError::UnexpectedClosingBrace { at: 0 })
    );
}

#[test]
fn brackets_inside_values_are_not_headers() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[("ExpertSingle", &["768 = S 2 192", "768 = E [not a header", "768 = N 0 0"])],
    );
    let notes_data = scan_chart(&source).expect("well-formed");
    assert_eq!(notes_data.note_counts[0].count, 1);
}

#[test]
fn config_thresholds_apply() {
    let source = chart(
        192,
        &["0 = TS 4", "0 = B 120000"],
        &[("ExpertSingle", &["96 = S 2 192", "96 = N 0 0"])],
    );
    let config = ScanConfig {
        leading_silence_ms: 100.0,
        ..ScanConfig::default()
    };
    let notes_data = scan(ChartSource::Text(&source), &config).expect("well-formed");
    assert_eq!(notes_data.chart_issues, vec![ChartIssueType::IsDefaultBpm]);
    assert_eq!(notes_data.track_issues_of(EXPERT_GUITAR), None);
}
