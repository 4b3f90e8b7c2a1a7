//! Scanner of rhythm game charts for authoring defects.
//!
//! Two source formats are supported: the bracketed text format (`.chart`) and
//! the binary event-track format (`.mid`). Both are decoded into one unified
//! model of time-stamped events per instrument and difficulty, and then a set
//! of detectors runs over every track.
//!
//! ```text
//! text  == chart::decode_chart ==\
//!                                 +=> DecodedChart == analyze::analyze_track (per track)
//! bytes == midi::decode_midi  ===/                 == aggregate::reduce ==> NotesData
//! ```
//!
//! The input text must already be UTF-8; detecting and converting other
//! encodings is up to the caller.
//!
//! # Example
//!
//! ```rust
//! use scan_chart::{notes_data::ChartIssueType, scan_chart};
//!
//! let source = r#"[Song]
//! {
//!   Resolution = 192
//! }
//! [SyncTrack]
//! {
//!   0 = TS 4
//!   0 = B 120000
//! }
//! [Events]
//! {
//! }
//! [ExpertSingle]
//! {
//!   768 = N 0 0
//! }
//! "#;
//! let notes_data = scan_chart(source).expect("well-formed sections");
//! assert_eq!(notes_data.note_counts[0].count, 1);
//! assert!(notes_data.has_chart_issue(ChartIssueType::IsDefaultBpm));
//! assert!(notes_data.has_chart_issue(ChartIssueType::NoSections));
//! ```
//!
//! # Features
//!
//! - `midi` (default): the binary decoder, built on `midly`.
//! - `diagnostics` (default): rendering of [`DecodeError`] with `ariadne`.
//! - `serde`: `Serialize`/`Deserialize` for the model and the result document.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregate;
pub mod analyze;
pub mod chart;
pub mod config;
pub mod decode;
#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;
pub mod hash;
#[cfg(feature = "midi")]
#[cfg_attr(docsrs, doc(cfg(feature = "midi")))]
pub mod midi;
pub mod model;
pub mod notes_data;
pub mod prelude;
pub mod timeline;

use self::{config::ScanConfig, decode::DecodeError, notes_data::NotesData};

/// A chart file's content, tagged with its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource<'a> {
    /// Text of a `.chart` file, already decoded to UTF-8.
    Text(&'a str),
    /// Bytes of a `.mid` file.
    #[cfg(feature = "midi")]
    Midi(&'a [u8]),
}

/// Decodes `source` and runs every detector over it.
///
/// # Errors
///
/// Returns [`DecodeError`] when the source is structurally unreadable. Any
/// other problem is reported inside the returned [`NotesData`].
pub fn scan(source: ChartSource<'_>, config: &ScanConfig) -> Result<NotesData, DecodeError> {
    let chart = match source {
        ChartSource::Text(text) => chart::decode_chart(text)?,
        #[cfg(feature = "midi")]
        ChartSource::Midi(bytes) => midi::decode_midi(bytes)?,
    };
    Ok(aggregate::aggregate(&chart, config))
}

/// Scans a `.chart` file with the default thresholds.
///
/// # Errors
///
/// Returns [`DecodeError`] when the section bracketing is malformed.
pub fn scan_chart(source: &str) -> Result<NotesData, DecodeError> {
    scan(ChartSource::Text(source), &ScanConfig::default())
}

/// Scans a `.mid` file with the default thresholds.
///
/// # Errors
///
/// Returns [`DecodeError`] when the container cannot be read.
#[cfg(feature = "midi")]
#[cfg_attr(docsrs, doc(cfg(feature = "midi")))]
pub fn scan_midi(bytes: &[u8]) -> Result<NotesData, DecodeError> {
    scan(ChartSource::Midi(bytes), &ScanConfig::default())
}
