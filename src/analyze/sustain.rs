//! Sustain gap and sustain length rules.

use crate::{
    model::{EventType, Millis, TrackEvent},
    notes_data::{NoteIssue, NoteIssueType},
};

/// A span right after a sustain ends, in which no note may start.
#[derive(Debug, Clone, Copy)]
struct GapWindow {
    /// Inclusive.
    start: Millis,
    /// Exclusive.
    end: Millis,
}

impl GapWindow {
    fn contains(&self, time: Millis) -> bool {
        self.start <= time && time < self.end
    }
}

/// Scans `notes` in time order for bad sustain gaps and baby sustains.
pub fn sustain_issues(notes: &[TrackEvent], min_gap_ms: f64, min_sustain_ms: f64) -> Vec<NoteIssue> {
    let min_gap = Millis::new(min_gap_ms);
    let min_sustain = Millis::new(min_sustain_ms);
    let mut windows: Vec<GapWindow> = vec![];
    let mut issues = vec![];
    for note in notes {
        windows.retain(|window| window.end > note.time);
        if windows.iter().any(|window| window.contains(note.time)) {
            issues.push(NoteIssue {
                issue_type: NoteIssueType::BadSustainGap,
                time: note.time,
            });
        }

        if !note.length.is_positive() {
            continue;
        }
        // Open sustains leave the frets free.
        if note.event_type != EventType::Open {
            let start = note.end();
            windows.push(GapWindow {
                start,
                end: start + min_gap,
            });
        }
        if note.length < min_sustain {
            issues.push(NoteIssue {
                issue_type: NoteIssueType::BabySustain,
                time: note.time,
            });
        }
    }
    issues
}
