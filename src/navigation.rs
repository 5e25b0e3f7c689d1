//! Locations within the note collection, expressed as URL-style query strings.
//!
//! A location names a note and a line within it, e.g. `?note=3&line=12`. It is what the
//! outline records when a heading is chosen and what `--location` accepts on startup.

use std::fmt;
use url::form_urlencoded;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// A note and 1-based line to open.
pub struct Location {
    /// Note id, if one is targeted.
    pub note: Option<u64>,
    /// 1-based line, if one is targeted.
    pub line: Option<usize>,
}

impl Location {
    #[must_use]
    /// Location of `line` in `note`.
    pub fn new(note: u64, line: usize) -> Self {
        Self {
            note: Some(note),
            line: (line > 0).then_some(line),
        }
    }

    #[must_use]
    /// Parses a query string with or without its leading `?`.
    ///
    /// Unknown keys and unparsable values are ignored; `line=0` is treated as absent.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut location = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "note" => location.note = value.parse().ok(),
                "line" => location.line = value.parse().ok().filter(|&l: &usize| l > 0),
                _ => {}
            }
        }

        location
    }

    #[must_use]
    /// Serialises as `?note=<id>&line=<n>`, or an empty string when nothing is set.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(note) = self.note {
            serializer.append_pair("note", &note.to_string());
        }
        if let Some(line) = self.line {
            serializer.append_pair("line", &line.to_string());
        }
        let pairs = serializer.finish();

        if pairs.is_empty() {
            pairs
        } else {
            format!("?{pairs}")
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[must_use]
/// Clamps a 1-based line into a document of `total_lines` lines.
pub fn clamp_line(line: usize, total_lines: usize) -> usize {
    line.clamp(1, total_lines.max(1))
}

#[cfg(test)]
#[path = "tests/navigation.rs"]
mod tests;
