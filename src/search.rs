//! Case-insensitive search helpers for the search view.
//!
//! All positions are counted in characters rather than bytes so that snippets never split a
//! multi-byte character. Matching compares characters by their lowercase forms.

use crate::note::NoteNode;

/// Characters of context shown either side of a match before trimming.
pub const DEFAULT_SNIPPET_CONTEXT: usize = 50;
/// Maximum visible characters in a snippet, excluding ellipses.
pub const DEFAULT_SNIPPET_BUDGET: usize = 80;

const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Sizing for [`generate_snippet_with`].
pub struct SnippetOptions {
    /// Maximum visible characters.
    pub budget: usize,
    /// Context wanted either side of the match.
    pub context: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            budget: DEFAULT_SNIPPET_BUDGET,
            context: DEFAULT_SNIPPET_CONTEXT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A note that matched a search, with what the search view needs to show it.
pub struct SearchHit {
    /// Matching note.
    pub id: u64,
    /// Note name.
    pub name: String,
    /// Context around the first match.
    pub snippet: String,
    /// 1-based line of the first match.
    pub line: usize,
    /// Number of matches in the body.
    pub matches: usize,
}

fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Char index of the first case-insensitive occurrence of `needle` at or after `from`.
fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&a, &b)| chars_eq(a, b))
    })
}

fn leading(chars: &[char], budget: usize) -> String {
    let mut snippet: String = chars.iter().take(budget).collect();
    if chars.len() > budget {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

#[must_use]
/// Context around the first match of `query`, using the default sizing.
pub fn generate_snippet(content: &str, query: &str) -> String {
    generate_snippet_with(content, query, SnippetOptions::default())
}

#[must_use]
/// Context around the first case-insensitive match of `query` in `content`.
///
/// The window extends `context` characters either side of the match and is then trimmed
/// evenly, keeping the match in view, until it fits `budget`. An ellipsis marks each side
/// that was cut. With an empty query or no match, the start of the content is returned.
pub fn generate_snippet_with(content: &str, query: &str, options: SnippetOptions) -> String {
    let chars: Vec<char> = content.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    let budget = options.budget;

    let Some(found) = find_from(&chars, &needle, 0) else {
        return leading(&chars, budget);
    };

    let match_end = found + needle.len();
    let mut start = found.saturating_sub(options.context);
    let mut end = (match_end + options.context).min(chars.len());

    if end - start > budget {
        let excess = end - start - budget;
        let before = found - start;
        let after = end - match_end;
        let trim_after = after.min(excess - before.min(excess.div_ceil(2)));
        let trim_before = before.min(excess - trim_after);
        start += trim_before;
        end -= trim_after;
        // a query longer than the budget cannot stay fully visible
        end = end.min(start + budget);
    }

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

#[must_use]
/// 1-based line of the first case-insensitive match, or 1 when there is none.
pub fn find_line_number(content: &str, query: &str) -> usize {
    let chars: Vec<char> = content.chars().collect();
    let needle: Vec<char> = query.chars().collect();

    find_from(&chars, &needle, 0).map_or(1, |found| {
        chars[..found].iter().filter(|&&c| c == '\n').count() + 1
    })
}

#[must_use]
/// Number of case-insensitive matches, resuming after each hit.
///
/// An empty query matches nothing.
pub fn count_matches(content: &str, query: &str) -> usize {
    let chars: Vec<char> = content.chars().collect();
    let needle: Vec<char> = query.chars().collect();

    let mut count = 0;
    let mut cursor = 0;
    while let Some(found) = find_from(&chars, &needle, cursor) {
        count += 1;
        cursor = found + needle.len();
    }
    count
}

#[must_use]
/// Searches note names and bodies, most matches first.
///
/// Ties keep tree order. An empty query returns no hits.
pub fn search_notes(nodes: &[NoteNode], query: &str, options: SnippetOptions) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }

    let name_needle: Vec<char> = query.chars().collect();
    let mut hits: Vec<SearchHit> = nodes
        .iter()
        .filter_map(|node| {
            let text = node.display_text();
            let matches = count_matches(text, query);
            let name: Vec<char> = node.name.chars().collect();
            if matches == 0 && find_from(&name, &name_needle, 0).is_none() {
                return None;
            }
            Some(SearchHit {
                id: node.id,
                name: node.name.clone(),
                snippet: generate_snippet_with(text, query, options),
                line: find_line_number(text, query),
                matches,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.matches.cmp(&a.matches));
    log::debug!("search for {query:?} found {} notes", hits.len());
    hits
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;
