//! The result document handed to downstream collaborators.
//!
//! Field presence is part of the contract: per-track issue groups only exist for
//! tracks that have issues, so an empty issue set is represented by absence.

use crate::model::{Difficulty, Instrument, Millis, TrackEvent, TrackKey};

/// An issue with one specific note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum NoteIssueType {
    /// A chord of all five frets.
    FiveNoteChord,
    /// A note or chord shape not allowed on this track's difficulty.
    DifficultyForbiddenNote,
    /// Three or more pads hit at once on drums, kicks excluded.
    ThreeNoteDrumChord,
    /// A note so close to the previous one that it is likely a charting mistake.
    BrokenNote,
    /// A note starting too soon after the previous sustain ends.
    BadSustainGap,
    /// A sustain too short to be played as one.
    BabySustain,
}

/// An issue with a whole track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TrackIssueType {
    /// No star power phrase on this track.
    NoStarPower,
    /// No activation lane on this drums track.
    NoDrumActivationLanes,
    /// The first note comes too early.
    SmallLeadingSilence,
}

/// An issue with the chart as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ChartIssueType {
    /// The input is not structured or encoded correctly.
    UnparseableSectionsOrBadEncoding,
    /// No resolution was given.
    NoResolution,
    /// No tempo map information.
    NoSyncTrackSection,
    /// No notes on any track.
    NoNotes,
    /// An instrument has a lower difficulty charted but not Expert.
    NoExpert,
    /// Exactly one 120 BPM marker and one time signature; likely not tempo-mapped.
    IsDefaultBpm,
    /// A time signature does not fall on a measure boundary.
    MisalignedTimeSignatures,
    /// No section markers.
    NoSections,
    /// The first note of the chart comes too early.
    SmallLeadingSilence,
}

impl ChartIssueType {
    /// Whether this issue leaves the tempo timeline unusable, so that no note can
    /// be time-stamped and analysis stops after reporting chart issues.
    #[must_use]
    pub const fn halts_analysis(self) -> bool {
        matches!(
            self,
            Self::UnparseableSectionsOrBadEncoding | Self::NoResolution | Self::NoSyncTrackSection
        )
    }
}

/// An issue at one point of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NoteIssue {
    /// What is wrong.
    pub issue_type: NoteIssueType,
    /// Where, from the start of the chart.
    pub time: Millis,
}

/// The note issues of one track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrackNoteIssues {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
    /// Never empty; sorted by time and unique per `(issue_type, time)`.
    pub note_issues: Vec<NoteIssue>,
}

/// The track issues of one track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrackIssues {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
    /// Never empty.
    pub track_issues: Vec<TrackIssueType>,
}

/// The number of notes of one track. Chords count once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteCount {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
    /// Number of grouped notes.
    pub count: usize,
}

/// The densest second of one track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxNps {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
    /// Time of the note which first reached the peak.
    pub time: Millis,
    /// Peak notes per second.
    pub nps: f64,
    /// Raw note events around the peak, for diagnostics.
    pub notes: Vec<TrackEvent>,
}

/// The content hash of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackHash {
    /// The instrument.
    pub instrument: Instrument,
    /// The difficulty.
    pub difficulty: Difficulty,
    /// Lowercase hex digest.
    pub hash: String,
}

/// Everything learned about a chart's notes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NotesData {
    /// The charted instruments.
    pub instruments: Vec<Instrument>,
    /// Whether any track has solo sections.
    pub has_solo_sections: bool,
    /// Whether the chart has lyrics.
    pub has_lyrics: bool,
    /// Whether any track has forced notes.
    pub has_forced_notes: bool,
    /// Whether any track has tap notes.
    pub has_tap_notes: bool,
    /// Whether any track has open notes.
    pub has_open_notes: bool,
    /// Whether the drums have 2x kick notes.
    #[cfg_attr(feature = "serde", serde(rename = "has2xKick"))]
    pub has_2x_kick: bool,
    /// Note issues, one entry per track that has any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub note_issues: Vec<TrackNoteIssues>,
    /// Track issues, one entry per track that has any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub track_issues: Vec<TrackIssues>,
    /// Issues with the entire chart.
    pub chart_issues: Vec<ChartIssueType>,
    /// Note counts per track.
    pub note_counts: Vec<NoteCount>,
    /// Peak density per track with notes.
    pub max_nps: Vec<MaxNps>,
    /// Content hashes per track.
    pub hashes: Vec<TrackHash>,
    /// Digest of the tempo and time signature markers.
    pub tempo_map_hash: String,
    /// Number of tempo events in the source, same-tick repeats included.
    pub tempo_marker_count: usize,
    /// Milliseconds from the start of the chart to the last note.
    pub length: u64,
    /// Milliseconds from the first note to the last note.
    pub effective_length: u64,
}

impl NotesData {
    /// A document carrying nothing but chart issues.
    #[must_use]
    pub fn with_chart_issues(chart_issues: Vec<ChartIssueType>) -> Self {
        Self {
            chart_issues,
            ..Self::default()
        }
    }

    /// The note issues reported for `key`, if any.
    #[must_use]
    pub fn note_issues_of(&self, key: TrackKey) -> Option<&[NoteIssue]> {
        self.note_issues
            .iter()
            .find(|group| group.instrument == key.instrument && group.difficulty == key.difficulty)
            .map(|group| group.note_issues.as_slice())
    }

    /// The track issues reported for `key`, if any.
    #[must_use]
    pub fn track_issues_of(&self, key: TrackKey) -> Option<&[TrackIssueType]> {
        self.track_issues
            .iter()
            .find(|group| group.instrument == key.instrument && group.difficulty == key.difficulty)
            .map(|group| group.track_issues.as_slice())
    }

    /// The content hash reported for `key`.
    #[must_use]
    pub fn hash_of(&self, key: TrackKey) -> Option<&str> {
        self.hashes
            .iter()
            .find(|entry| entry.instrument == key.instrument && entry.difficulty == key.difficulty)
            .map(|entry| entry.hash.as_str())
    }

    /// Whether `issue` was reported for the chart.
    #[must_use]
    pub fn has_chart_issue(&self, issue: ChartIssueType) -> bool {
        self.chart_issues.contains(&issue)
    }
}
