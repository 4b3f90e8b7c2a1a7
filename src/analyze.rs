//! Defect detection over one decoded track.
//!
//! [`analyze_track`] is a pure function of a single track's events, so tracks
//! can be analyzed in any order or in parallel and reduced afterwards.

pub mod density;
pub mod shape;
pub mod sustain;

use itertools::Itertools;

use crate::{
    config::ScanConfig,
    hash::track_hash,
    model::{ChartFormat, EventType, GroupedTrackEvent, InstrumentClass, Millis, TrackEvent, TrackKey},
    notes_data::{MaxNps, NoteIssue, NoteIssueType, TrackIssueType},
};

use self::{
    density::density_peak,
    shape::{drum_issues, five_fret_issues},
    sustain::sustain_issues,
};

/// Chart-wide feature flags raised by one track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackFlags {
    /// Solo sections on a non-drums track.
    pub has_solo_sections: bool,
    /// Forced notes.
    pub has_forced_notes: bool,
    /// Tap notes.
    pub has_tap_notes: bool,
    /// Open notes.
    pub has_open_notes: bool,
    /// Expert+ double kicks.
    pub has_2x_kick: bool,
}

impl std::ops::BitOrAssign for TrackFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.has_solo_sections |= rhs.has_solo_sections;
        self.has_forced_notes |= rhs.has_forced_notes;
        self.has_tap_notes |= rhs.has_tap_notes;
        self.has_open_notes |= rhs.has_open_notes;
        self.has_2x_kick |= rhs.has_2x_kick;
    }
}

/// Everything learned about one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAnalysis {
    /// The analyzed track.
    pub key: TrackKey,
    /// Time of the first grouped note.
    pub first_note: Option<Millis>,
    /// Time of the last grouped note.
    pub last_note: Option<Millis>,
    /// Number of grouped notes.
    pub note_count: usize,
    /// Sorted by time and unique per `(issue_type, time)`. `None` rather than empty.
    pub note_issues: Option<Vec<NoteIssue>>,
    /// `None` rather than empty.
    pub track_issues: Option<Vec<TrackIssueType>>,
    /// The densest window, `None` without notes.
    pub max_nps: Option<MaxNps>,
    /// Content hash of every event, markers included.
    pub hash: String,
    /// Feature flags.
    pub flags: TrackFlags,
}

/// Groups note events sharing one exact time. `notes` must be sorted by time.
#[must_use]
pub fn group_notes(notes: &[TrackEvent]) -> Vec<GroupedTrackEvent> {
    notes
        .iter()
        .chunk_by(|note| note.time)
        .into_iter()
        .map(|(time, events)| GroupedTrackEvent {
            time,
            events: events.copied().collect(),
        })
        .collect()
}

/// Analyzes one track. `events` must be in canonical order.
#[must_use]
pub fn analyze_track(
    key: TrackKey,
    events: &[TrackEvent],
    format: ChartFormat,
    config: &ScanConfig,
) -> TrackAnalysis {
    let notes: Vec<TrackEvent> = events
        .iter()
        .filter(|event| !event.event_type.is_instrument_marker())
        .copied()
        .collect();
    let groups = group_notes(&notes);
    let has = |event_type: EventType| events.iter().any(|event| event.event_type == event_type);
    let class = key.instrument.class();

    let mut flags = TrackFlags::default();
    let mut note_issues = vec![];
    let mut track_issues = vec![];
    if class == InstrumentClass::Drums {
        flags.has_2x_kick = has(EventType::Kick2x);
        for group in &groups {
            note_issues.extend(
                drum_issues(group, key.difficulty)
                    .into_iter()
                    .map(|issue_type| NoteIssue {
                        issue_type,
                        time: group.time,
                    }),
            );
        }
        // Some old binary charts mark star power with solo notes.
        let has_star_power = has(EventType::StarPower)
            || (format == ChartFormat::Mid && has(EventType::SoloMarker));
        if !has_star_power {
            track_issues.push(TrackIssueType::NoStarPower);
        }
        if !has(EventType::ActivationLane) {
            track_issues.push(TrackIssueType::NoDrumActivationLanes);
        }
        // Binary drum charts are not checked for broken notes.
        if format == ChartFormat::Chart {
            note_issues.extend(broken_notes(&groups, format, config));
        }
    } else {
        flags.has_solo_sections = has(EventType::SoloMarker);
        flags.has_forced_notes = has(EventType::Force);
        flags.has_tap_notes = has(EventType::Tap);
        flags.has_open_notes = has(EventType::Open);
        note_issues.extend(sustain_issues(
            &notes,
            config.min_sustain_gap_ms,
            config.min_sustain_ms,
        ));
        if class == InstrumentClass::FiveFret {
            for group in &groups {
                note_issues.extend(
                    five_fret_issues(group, key.difficulty)
                        .into_iter()
                        .map(|issue_type| NoteIssue {
                            issue_type,
                            time: group.time,
                        }),
                );
            }
        }
        note_issues.extend(broken_notes(&groups, format, config));
        if !has(EventType::StarPower) {
            track_issues.push(TrackIssueType::NoStarPower);
        }
    }

    let first_note = groups.first().map(|group| group.time);
    let last_note = groups.last().map(|group| group.time);
    if first_note.is_some_and(|time| time.as_f64() < config.leading_silence_ms) {
        track_issues.push(TrackIssueType::SmallLeadingSilence);
    }
    // A track without notes has nothing to report on.
    if groups.is_empty() {
        note_issues.clear();
        track_issues.clear();
    }

    let max_nps = density_peak(&groups, &notes, config.nps_window_ms, config.nps_context_ms).map(
        |peak| MaxNps {
            instrument: key.instrument,
            difficulty: key.difficulty,
            time: peak.time,
            nps: peak.nps,
            notes: peak.context,
        },
    );

    let note_issues: Vec<NoteIssue> = note_issues
        .into_iter()
        .unique_by(|issue| (issue.issue_type, issue.time))
        .sorted_by_key(|issue| issue.time)
        .collect();
    log::trace!(
        "{:?} {:?}: {} notes, {} note issues, {} track issues",
        key.instrument,
        key.difficulty,
        groups.len(),
        note_issues.len(),
        track_issues.len()
    );

    TrackAnalysis {
        key,
        first_note,
        last_note,
        note_count: groups.len(),
        note_issues: (!note_issues.is_empty()).then_some(note_issues),
        track_issues: (!track_issues.is_empty()).then_some(track_issues),
        max_nps,
        hash: track_hash(events),
        flags,
    }
}

/// Grouped notes closer to their predecessor than the format's threshold.
///
/// An open note right after a real sustain is a deliberate transition and
/// never counts.
fn broken_notes(
    groups: &[GroupedTrackEvent],
    format: ChartFormat,
    config: &ScanConfig,
) -> Vec<NoteIssue> {
    let threshold = config.broken_note(format);
    groups
        .iter()
        .tuple_windows()
        .filter(|(previous, note)| threshold.is_broken(note.time - previous.time))
        .filter(|(previous, note)| {
            !(note.contains(EventType::Open)
                && previous.longest_sustain().as_f64() > config.open_under_sustain_ms)
        })
        .map(|(_, note)| NoteIssue {
            issue_type: NoteIssueType::BrokenNote,
            time: note.time,
        })
        .collect()
}
