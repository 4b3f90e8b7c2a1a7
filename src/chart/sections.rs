//! Splits chart text into named sections of trimmed lines.
//!
//! ```text
//! [Song]
//! {
//!   Resolution = 192
//! }
//! ```
//!
//! The scanner works on bytes since every delimiter is ASCII, which keeps all
//! slice boundaries on UTF-8 character boundaries. Any `=` outside of a header
//! starts a value which is skipped until the end of its line, so that brackets
//! and braces inside user-entered values never change the structure.

use std::collections::HashMap;

use crate::decode::DecodeError;

/// The sections of a chart, by name. A later section with the same name replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections<'a> {
    sections: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Sections<'a> {
    /// Scans `source` into sections.
    ///
    /// # Errors
    ///
    /// Fails on a line break inside a `[...]` header, and on a `}` which closes a
    /// body before any header was read.
    pub fn scan(source: &'a str) -> Result<Self, DecodeError> {
        let bytes = source.as_bytes();
        let mut sections = HashMap::new();
        let mut reading_header = false;
        let mut skipping_line = false;
        let mut read_start = 0;
        let mut current: Option<&'a str> = None;

        for (index, &byte) in bytes.iter().enumerate() {
            if reading_header {
                match byte {
                    b']' => {
                        reading_header = false;
                        current = Some(source[read_start..index].trim());
                    }
                    b'\n' => {
                        return Err(DecodeError::UnterminatedSectionHeader {
                            start: read_start - 1,
                            line_break: index,
                        });
                    }
                    _ => {}
                }
                continue;
            }

            match byte {
                b'=' => skipping_line = true,
                b'\n' => skipping_line = false,
                _ => {}
            }
            if skipping_line {
                continue;
            }

            match byte {
                b'{' => {
                    skipping_line = true;
                    read_start = index + 1;
                }
                b'}' => {
                    let Some(name) = current else {
                        return Err(DecodeError::UnexpectedClosingBrace { at: index });
                    };
                    let lines = source[read_start..index]
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .collect();
                    if sections.insert(name, lines).is_some() {
                        log::debug!("section [{name}] appears more than once, keeping the last");
                    }
                }
                b'[' => {
                    read_start = index + 1;
                    reading_header = true;
                }
                _ => {}
            }
        }

        Ok(Self { sections })
    }

    /// The lines of section `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[&'a str]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// The lines of section `name`, or nothing when the section is absent.
    #[must_use]
    pub fn lines(&self, name: &str) -> &[&'a str] {
        self.get(name).unwrap_or_default()
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
