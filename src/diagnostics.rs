//! Rendering of [`DecodeError`]s with `ariadne`.
//!
//! Errors of the text decoder carry byte offsets into the source, so ariadne
//! can point at the offending line and column. Errors of the binary decoder
//! have no text to point into and label the empty range `0..0`.
//!
//! # Usage Example
//!
//! ```rust
//! use scan_chart::{chart::decode_chart, diagnostics::emit_decode_error};
//!
//! let source = "[Song\n{\n}\n";
//! if let Err(err) = decode_chart(source) {
//!     emit_decode_error("notes.chart", source, &err);
//! }
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::decode::DecodeError;

/// Source container holding the file name and its text.
///
/// ```rust
/// use scan_chart::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("notes.chart", "[Song]\n{\n}\n");
/// assert_eq!(source.name(), "notes.chart");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// The source text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// The source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Clamps `range` into the text, so that reports never point past its end.
    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.text.len();
        range.start.min(len)..range.end.min(len)
    }
}

/// Conversion of positioned errors into an `ariadne::Report`.
pub trait ToAriadne {
    /// Builds the report against `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Builds a styled report with a single label.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for DecodeError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let range = src.clamp(self.range().unwrap_or(0..0));
        let label = match self {
            Self::UnterminatedSectionHeader { .. } => "this header is never closed",
            Self::UnexpectedClosingBrace { .. } => "no section is open here",
            _ => "the file cannot be read",
        };
        build_report(
            src,
            ReportKind::Error,
            range,
            &self.to_string(),
            label,
            Color::Red,
        )
    }
}

/// Prints `error` against `source` to stderr.
pub fn emit_decode_error(name: &str, source: &str, error: &DecodeError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}

/// Builds the reports of `errors` without printing them.
#[must_use]
pub fn collect_decode_reports<'a>(
    name: &'a str,
    source: &'a str,
    errors: impl IntoIterator<Item = &'a DecodeError>,
) -> Vec<Report<'a, (String, Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    errors
        .into_iter()
        .map(|error| error.to_report(&simple))
        .collect()
}
