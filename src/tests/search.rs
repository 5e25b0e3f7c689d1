use super::{
    count_matches, find_line_number, generate_snippet, generate_snippet_with, search_notes,
    SnippetOptions, DEFAULT_SNIPPET_BUDGET,
};
use crate::note::{NoteNode, NoteRecord};

fn visible(snippet: &str) -> usize {
    snippet
        .trim_start_matches("...")
        .trim_end_matches("...")
        .chars()
        .count()
}

fn node(id: u64, name: &str, content: &str) -> NoteNode {
    NoteNode::from(NoteRecord {
        id,
        name: name.to_string(),
        content: Some(content.to_string()),
    })
}

#[test]
fn test_snippet_short_content_untouched() {
    assert_eq!(
        generate_snippet("Hello React world", "react"),
        "Hello React world"
    );
}

#[test]
fn test_snippet_trims_both_sides_around_match() {
    let content = format!("{}needle{}", "a".repeat(100), "b".repeat(100));
    let snippet = generate_snippet(&content, "NEEDLE");

    assert!(snippet.starts_with("..."));
    assert!(snippet.ends_with("..."));
    assert!(snippet.contains("needle"));
    assert_eq!(visible(&snippet), DEFAULT_SNIPPET_BUDGET);
    assert_eq!(
        snippet,
        format!("...{}needle{}...", "a".repeat(37), "b".repeat(37))
    );
}

#[test]
fn test_snippet_match_at_start_has_no_leading_ellipsis() {
    let content = format!("needle{}", "b".repeat(200));
    let snippet = generate_snippet(&content, "needle");

    assert_eq!(snippet, format!("needle{}...", "b".repeat(50)));
}

#[test]
fn test_snippet_match_at_end_has_no_trailing_ellipsis() {
    let content = format!("{}needle", "a".repeat(200));
    let snippet = generate_snippet(&content, "needle");

    assert_eq!(snippet, format!("...{}needle", "a".repeat(50)));
}

#[test]
fn test_snippet_without_match_shows_start() {
    let long = "x".repeat(100);

    assert_eq!(generate_snippet(&long, "zzz"), format!("{}...", "x".repeat(80)));
    assert_eq!(generate_snippet(&long, ""), format!("{}...", "x".repeat(80)));
    assert_eq!(generate_snippet("short", "zzz"), "short");
    assert_eq!(generate_snippet("", ""), "");
}

#[test]
fn test_snippet_query_longer_than_budget() {
    let options = SnippetOptions {
        budget: 10,
        context: 50,
    };
    let content = "xxxxxabcdefghijklmnopyyyyy";
    let snippet = generate_snippet_with(content, "abcdefghijklmnop", options);

    assert_eq!(snippet, "...abcdefghij...");
    assert_eq!(visible(&snippet), 10);
}

#[test]
fn test_snippet_respects_multibyte_characters() {
    let content = format!("{}Grüße{}", "ä".repeat(90), "ö".repeat(90));
    let snippet = generate_snippet(&content, "grüße");

    assert!(snippet.contains("Grüße"));
    assert_eq!(visible(&snippet), DEFAULT_SNIPPET_BUDGET);
}

#[test]
fn test_snippet_never_exceeds_budget() {
    let content = "The quick brown fox jumps over the lazy dog. ".repeat(20);
    for query in ["quick", "dog", "lazy dog. The", "missing", ""] {
        let snippet = generate_snippet(&content, query);
        assert!(visible(&snippet) <= DEFAULT_SNIPPET_BUDGET, "{query}");
    }
}

#[test]
fn test_find_line_number() {
    let content = "Line 1\nLine 2 with react\nLine 3";

    assert_eq!(find_line_number(content, "react"), 2);
    assert_eq!(find_line_number(content, "REACT"), 2);
    assert_eq!(find_line_number(content, "Line 3"), 3);
    assert_eq!(find_line_number(content, "missing"), 1);
    assert_eq!(find_line_number(content, ""), 1);
}

#[test]
fn test_count_matches() {
    assert_eq!(count_matches("Rust rust RUST", "rust"), 3);
    assert_eq!(count_matches("aaaa", "aa"), 2);
    assert_eq!(count_matches("aaa", "aa"), 1);
    assert_eq!(count_matches("", "a"), 0);
    assert_eq!(count_matches("Ünïcödé ÜNÏ", "ünï"), 2);
}

#[test]
fn test_count_matches_empty_query() {
    assert_eq!(count_matches("anything at all", ""), 0);
    assert_eq!(count_matches("", ""), 0);
}

#[test]
fn test_search_notes_orders_by_matches() {
    let nodes = vec![
        node(1, "Shopping", "eggs\nmilk"),
        node(2, "Rust", "rust and more rust\nRust again"),
        node(3, "Notes", "learning rust"),
        node(4, "Rusty tools", "hammer"),
    ];

    let hits = search_notes(&nodes, "rust", SnippetOptions::default());
    let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();

    assert_eq!(ids, vec![2, 3, 4]);
    assert_eq!(hits[0].matches, 3);
    assert_eq!(hits[2].matches, 0);
    assert_eq!(hits[1].line, 1);
}

#[test]
fn test_search_notes_reports_line() {
    let nodes = vec![node(1, "Doc", "one\ntwo\nthree target")];
    let hits = search_notes(&nodes, "TARGET", SnippetOptions::default());

    assert_eq!(hits[0].line, 3);
    assert_eq!(hits[0].snippet, "one\ntwo\nthree target");
}

#[test]
fn test_search_notes_empty_query() {
    let nodes = vec![node(1, "Doc", "text")];

    assert!(search_notes(&nodes, "", SnippetOptions::default()).is_empty());
}
