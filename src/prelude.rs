//! Prelude module of the crate.
//!
//! Use `use scan_chart::prelude::*;` to import the commonly used types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_decode_error};
#[cfg(feature = "midi")]
pub use crate::{midi::decode_midi, scan_midi};
pub use crate::{
    ChartSource,
    aggregate::{aggregate, reduce},
    analyze::{TrackAnalysis, TrackFlags, analyze_track},
    chart::decode_chart,
    config::{BrokenNoteThreshold, ScanConfig},
    decode::{DecodeError, DecodedChart, DecodedTrack},
    model::{
        ChartFormat, Difficulty, EventType, GroupedTrackEvent, Instrument, InstrumentClass,
        Millis, TempoMarker, TimeSignatureMarker, TrackEvent, TrackKey,
    },
    notes_data::{
        ChartIssueType, MaxNps, NoteCount, NoteIssue, NoteIssueType, NotesData, TrackHash,
        TrackIssueType, TrackIssues, TrackNoteIssues,
    },
    scan, scan_chart,
    timeline::TempoTimeline,
};
