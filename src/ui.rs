//! The UI renders the application state into three panes and a status bar.
//!
//! Notes sit on the left, the vim-like editor in the middle and the heading outline on the
//! right. The focused pane gets a highlighted border. While search results are shown they
//! take the place of the note list.

use crate::app_state::{AppState, Pane, View};
use crate::heading::Heading;
use crate::outline::{heading_at_line, indent_for};
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Renders every pane and the status bar.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22), // Notes
            Constraint::Min(0),         // Editor
            Constraint::Percentage(26), // Outline
        ])
        .split(rows[0]);

    if app.current_view == View::SearchResults {
        draw_search_results(f, app, panes[0]);
    } else {
        draw_tree(f, app, panes[0]);
    }
    draw_editor(f, app, panes[1]);
    draw_outline(f, app, panes[2]);
    draw_status(f, app, rows[1]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn draw_tree(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .tree
        .nodes()
        .iter()
        .map(|node| {
            let marker = if node.dirty {
                Span::styled("● ", Style::default().fg(Color::Red))
            } else {
                Span::raw("  ")
            };
            ListItem::new(Line::from(vec![marker, Span::raw(node.name.clone())]))
        })
        .collect();

    let title = format!("Notes ({})", app.tree.len());
    let list = List::new(items)
        .block(pane_block(title, app.focus == Pane::Tree))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let selected = app
        .tree
        .selected_id()
        .and_then(|id| app.tree.position(id));
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_search_results(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .search_results
        .iter()
        .map(|hit| {
            let header = Line::from(vec![
                Span::styled(
                    hit.name.clone(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(":{} ({})", hit.line, hit.matches),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let snippet = Line::styled(
                hit.snippet.replace(['\n', '\r'], " "),
                Style::default().fg(Color::Gray),
            );
            ListItem::new(vec![header, snippet])
        })
        .collect();

    let title = format!("Search ({} hits)", app.search_results.len());
    let list = List::new(items)
        .block(pane_block(title, true))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let selected = (!app.search_results.is_empty()).then_some(app.search_index);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_editor(f: &mut Frame, app: &mut AppState, area: Rect) {
    let focused = app.focus == Pane::Editor && app.current_view == View::Normal;
    let title = match app.tree.selected() {
        Some(node) if node.dirty => format!("{} [+]", node.name),
        Some(node) => node.name.clone(),
        None => "No note open".to_string(),
    };

    let block = pane_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(ref mut editor_state) = app.editor_state {
        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    } else {
        let hint = Paragraph::new("Ctrl+N to create a note")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, inner);
    }
}

fn heading_style(heading: &Heading) -> Style {
    let color = match heading.level {
        1 => Color::Yellow,
        2 => Color::Cyan,
        3 => Color::Green,
        _ => Color::Gray,
    };
    Style::default().fg(color)
}

fn draw_outline(f: &mut Frame, app: &mut AppState, area: Rect) {
    let cursor_line = app.cursor_line();
    let headings = app.outline().to_vec();
    let current = heading_at_line(&headings, cursor_line).map(|h| h.id.clone());

    let items: Vec<ListItem> = headings
        .iter()
        .map(|heading| {
            let marker = if current.as_deref() == Some(heading.id.as_str()) {
                "› "
            } else {
                "  "
            };
            let text = if heading.text.is_empty() {
                "(untitled)".to_string()
            } else {
                heading.text.clone()
            };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(" ".repeat(indent_for(heading))),
                Span::styled(text, heading_style(heading)),
            ]))
        })
        .collect();

    let focused = app.focus == Pane::Outline && app.current_view == View::Normal;
    let title = format!("Outline ({})", headings.len());
    let list = List::new(items)
        .block(pane_block(title, focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let selected = (focused && !headings.is_empty()).then_some(app.outline_index);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    let (text, title) = match app.current_view {
        View::Command => (format!(":{}", app.command_buffer), "Command"),
        View::SearchInput => (format!("/{}", app.command_buffer), "Search"),
        View::SearchResults => (
            "↑/↓: Navigate | Enter: Open | Esc: Close".to_string(),
            "Search",
        ),
        View::Normal => {
            let help = if let Some(ref msg) = app.message {
                msg.clone()
            } else {
                match app.focus {
                    Pane::Tree => {
                        "↑/↓: Notes | Enter: Edit | n: New | r: Rename | d: Delete | /: Search | Tab: Pane | q: Quit"
                    }
                    Pane::Editor => {
                        "i: Insert | Esc: Normal/Notes | :w Save | :line N | Ctrl+S Save | Tab: Pane"
                    }
                    Pane::Outline => "↑/↓: Headings | Enter: Jump | Tab: Pane",
                }
                .to_string()
            };
            (help, "")
        }
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let widget = Paragraph::new(text).block(block);
    f.render_widget(widget, area);
}
