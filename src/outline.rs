//! Memoised heading extraction for the outline pane.
//!
//! The outline is redrawn on every frame and the note changes on every keystroke, so the
//! heading list is cached against the last content seen and only rebuilt when it differs.

use crate::heading::{extract_headings, Heading};

#[derive(Default)]
/// Caches the headings of the most recently seen note content.
pub struct HeadingCache {
    key: Option<Option<String>>,
    headings: Vec<Heading>,
    recomputations: usize,
}

impl HeadingCache {
    #[must_use]
    /// Creates an empty cache; the first lookup always extracts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the headings for `content`, re-extracting only when it changed.
    pub fn headings(&mut self, content: Option<&str>) -> &[Heading] {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|cached| cached.as_deref() == content);

        if !fresh {
            log::trace!("outline cache miss, extracting headings");
            self.headings = extract_headings(content);
            self.key = Some(content.map(str::to_string));
            self.recomputations += 1;
        }

        &self.headings
    }

    #[must_use]
    /// Number of extractions performed so far.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[must_use]
/// Finds the heading whose section contains `line` (the last one at or above it).
pub fn heading_at_line(headings: &[Heading], line: usize) -> Option<&Heading> {
    // headings are line-ascending, so a partition point is enough
    let after = headings.partition_point(|h| h.line <= line);
    after.checked_sub(1).map(|i| &headings[i])
}

#[must_use]
/// Display indentation for a heading in the outline.
pub fn indent_for(heading: &Heading) -> usize {
    heading.level.saturating_sub(1) * 2
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
