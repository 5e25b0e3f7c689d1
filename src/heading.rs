//! Heading extraction for the outline pane and in-note navigation.
//!
//! A single top-to-bottom pass over the note text recognises ATX headings (`#` at column 0)
//! while tracking whether the scan is inside a fenced code block. Each heading records the
//! 1-based line it sits on, which is what the editor scrolls to when a heading is chosen.

const FENCE: &str = "```";

#[derive(Clone, Debug, PartialEq, Eq)]
/// ATX heading found in a note, with its position and a per-extraction identifier.
pub struct Heading {
    /// `header-<sequence>-<level>`, unique within one extraction only.
    pub id: String,
    /// Heading text with the leading `#` run and surrounding whitespace removed.
    pub text: String,
    /// Source line with trailing whitespace removed, used for display.
    pub content: String,
    /// 1-based line number within the note.
    pub line: usize,
    /// Number of leading `#` characters (not clamped to 6).
    pub level: usize,
}

#[must_use]
/// Extracts every heading outside fenced code blocks, in document order.
///
/// Absent or empty content yields no headings. A line counts as a heading when it starts
/// with one or more `#` and at least one further character (whitespace included) follows
/// the run, so a bare `#` is rejected while `#   ` is a heading with empty text.
///
/// Any line whose trimmed form starts with three backticks toggles the fence state and is
/// never a heading itself. Fences do not nest.
pub fn extract_headings(content: Option<&str>) -> Vec<Heading> {
    let Some(content) = content.filter(|c| !c.is_empty()) else {
        return Vec::new();
    };

    let mut headings = Vec::new();
    let mut in_fence = false;
    let mut sequence = 0;

    for (index, raw) in content.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let Some((level, rest)) = split_marker(line) else {
            continue;
        };

        sequence += 1;
        headings.push(Heading {
            id: format!("header-{sequence}-{level}"),
            text: rest.trim().to_string(),
            content: line.trim_end().to_string(),
            line: index + 1,
            level,
        });
    }

    headings
}

/// Splits a heading line into its hash count and the remainder after the run.
fn split_marker(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 {
        return None;
    }
    // '#' is one byte, so `level` is also a char boundary
    let rest = &line[level..];
    if rest.is_empty() {
        return None;
    }
    Some((level, rest))
}

#[cfg(test)]
#[path = "tests/heading.rs"]
mod tests;
