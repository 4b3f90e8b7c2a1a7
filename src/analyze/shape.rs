//! Chord shape rules.

use crate::{
    model::{Difficulty, EventType, GroupedTrackEvent},
    notes_data::NoteIssueType,
};

const COLORS: [EventType; 5] = [
    EventType::Green,
    EventType::Red,
    EventType::Yellow,
    EventType::Blue,
    EventType::Orange,
];
const PADS: [EventType; 5] = COLORS;

/// Shapes which are forbidden when all of their types appear at once.
const HARD_FORBIDDEN_PAIRS: [[EventType; 2]; 3] = [
    [EventType::Green, EventType::Blue],
    [EventType::Red, EventType::Orange],
    [EventType::Green, EventType::Orange],
];
const MEDIUM_FORBIDDEN_PAIRS: [[EventType; 2]; 1] = [[EventType::Green, EventType::Blue]];

/// Types which are forbidden on their own.
const fn forbidden_singles(difficulty: Difficulty) -> &'static [EventType] {
    match difficulty {
        Difficulty::Expert => &[],
        Difficulty::Hard => &[EventType::Open],
        Difficulty::Medium => &[EventType::Open, EventType::Orange],
        Difficulty::Easy => &[EventType::Open, EventType::Orange, EventType::Blue],
    }
}

const fn forbidden_pairs(difficulty: Difficulty) -> &'static [[EventType; 2]] {
    match difficulty {
        Difficulty::Hard => &HARD_FORBIDDEN_PAIRS,
        Difficulty::Medium => &MEDIUM_FORBIDDEN_PAIRS,
        Difficulty::Expert | Difficulty::Easy => &[],
    }
}

/// Shape issues of one five-fret chord.
pub fn five_fret_issues(group: &GroupedTrackEvent, difficulty: Difficulty) -> Vec<NoteIssueType> {
    let mut issues = vec![];
    if group.count_of(&COLORS) == COLORS.len() {
        issues.push(NoteIssueType::FiveNoteChord);
    }
    let forbidden = group.count_of(forbidden_singles(difficulty)) > 0
        || forbidden_pairs(difficulty)
            .iter()
            .any(|pair| group.count_of(pair) == pair.len());
    if forbidden {
        issues.push(NoteIssueType::DifficultyForbiddenNote);
    }
    issues
}

/// Shape issues of one drum hit.
pub fn drum_issues(group: &GroupedTrackEvent, difficulty: Difficulty) -> Vec<NoteIssueType> {
    let mut issues = vec![];
    let pads = group.count_of(&PADS);
    if pads >= 3 {
        issues.push(NoteIssueType::ThreeNoteDrumChord);
    }
    let forbidden = (difficulty != Difficulty::Expert && group.contains(EventType::Kick2x))
        || (difficulty == Difficulty::Easy && pads == 2 && group.contains(EventType::Kick));
    if forbidden {
        issues.push(NoteIssueType::DifficultyForbiddenNote);
    }
    issues
}
