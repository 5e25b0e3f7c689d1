//! The core state machine bridging the note store, the note tree and the editor.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! navigates and edits. Edits flow from the editor buffer into the tree (marking the note
//! dirty), and only reach the store on save. The outline is derived from the open note on
//! demand through a memoising cache.

use crate::heading::Heading;
use crate::navigation::{clamp_line, Location};
use crate::note::NoteUpdate;
use crate::outline::HeadingCache;
use crate::search::{search_notes, SearchHit, SnippetOptions};
use crate::store::NoteStore;
use crate::tree::{NoteTree, TreeAction};
use edtui::{EditorMode, EditorState, Index2, Lines};
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The three panes that can hold keyboard focus.
pub enum Pane {
    /// Note list on the left.
    Tree,
    /// Markdown editor in the middle.
    Editor,
    /// Heading outline on the right.
    Outline,
}

impl Pane {
    #[must_use]
    /// Pane to the right, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Tree => Self::Editor,
            Self::Editor => Self::Outline,
            Self::Outline => Self::Tree,
        }
    }

    #[must_use]
    /// Pane to the left, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Self::Tree => Self::Outline,
            Self::Editor => Self::Tree,
            Self::Outline => Self::Editor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines what the bottom bar shows and how input is interpreted.
pub enum View {
    /// Keys go to the focused pane.
    Normal,
    /// Captures vim-style command input after ':' keystroke.
    Command,
    /// Captures a search query after '/' or Ctrl+F.
    SearchInput,
    /// Shows search hits in place of the note list.
    SearchResults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Actions bound to global keyboard shortcuts.
pub enum Shortcut {
    /// Save the open note.
    Save,
    /// Start naming a new note.
    NewNote,
    /// Start a search.
    Search,
    /// Quit, refusing if anything is unsaved.
    Quit,
    /// Focus the pane to the right.
    NextPane,
    /// Focus the pane to the left.
    PrevPane,
}

/// Bridges the note store, note tree and editor, maintaining session state.
pub struct AppState {
    /// Notes with selection and unsaved-change flags.
    pub tree: NoteTree,
    /// Pane receiving keys in the normal view.
    pub focus: Pane,
    /// Active input mode.
    pub current_view: View,
    /// Editor buffer for the open note.
    pub editor_state: Option<EditorState>,
    /// Highlighted entry in the outline pane.
    pub outline_index: usize,
    /// Accumulates command or search input.
    pub command_buffer: String,
    /// Hits from the last search.
    pub search_results: Vec<SearchHit>,
    /// Highlighted search hit.
    pub search_index: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Where the editor was last sent, as shown in the status bar.
    pub location: Location,
    /// Set once the main loop should exit.
    pub should_quit: bool,
    store: Box<dyn NoteStore>,
    outline_cache: HeadingCache,
    snippet: SnippetOptions,
    /// Editor text as last loaded or synced, to tell real edits from reloads.
    baseline: Option<String>,
}

impl AppState {
    /// Loads every note from `store` and opens the first one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn new(store: Box<dyn NoteStore>, snippet: SnippetOptions) -> io::Result<Self> {
        let tree = NoteTree::new(store.list()?);
        log::info!("loaded {} notes", tree.len());

        let mut state = Self {
            tree,
            focus: Pane::Tree,
            current_view: View::Normal,
            editor_state: None,
            outline_index: 0,
            command_buffer: String::new(),
            search_results: Vec::new(),
            search_index: 0,
            message: None,
            location: Location::default(),
            should_quit: false,
            store,
            outline_cache: HeadingCache::new(),
            snippet,
            baseline: None,
        };

        if let Some(first) = state.tree.nodes().first().map(|n| n.id) {
            state.select_note(first);
        }
        Ok(state)
    }

    // --- Editor buffer ---

    #[must_use]
    /// Text currently in the editor buffer.
    pub fn editor_text(&self) -> Option<String> {
        self.editor_state.as_ref().map(|es| {
            es.lines
                .iter_row()
                .map(|line| line.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    fn load_editor(&mut self) {
        self.editor_state = self
            .tree
            .selected()
            .map(|node| EditorState::new(Lines::from(node.display_text())));
        self.baseline = self.editor_text();
        self.outline_index = 0;
    }

    /// Copies editor changes into the tree, marking the open note dirty.
    ///
    /// Returns whether the note changed.
    pub fn sync_editor(&mut self) -> bool {
        let (Some(id), Some(text)) = (self.tree.selected_id(), self.editor_text()) else {
            return false;
        };
        if self.baseline.as_deref() == Some(text.as_str()) {
            return false;
        }
        self.baseline = Some(text.clone());
        self.tree.dispatch(TreeAction::Edit { id, content: text })
    }

    #[must_use]
    /// Whether the editor is taking text input rather than vim commands.
    pub fn editor_is_typing(&self) -> bool {
        self.editor_state
            .as_ref()
            .is_some_and(|es| es.mode != EditorMode::Normal)
    }

    #[must_use]
    /// 1-based line of the editor cursor.
    pub fn cursor_line(&self) -> usize {
        self.editor_state.as_ref().map_or(1, |es| es.cursor.row + 1)
    }

    // --- Tree navigation ---

    /// Opens note `id`, keeping any unsaved edits of the previous note in the tree.
    pub fn select_note(&mut self, id: u64) {
        self.sync_editor();
        if self.tree.get(id).is_none() {
            return;
        }
        self.tree.dispatch(TreeAction::Select(id));
        self.load_editor();
        self.location = Location {
            note: Some(id),
            line: None,
        };
    }

    /// Opens the note below the current one.
    pub fn select_next(&mut self) {
        let next = match self.tree.selected_id() {
            Some(id) => self.tree.next_id(id),
            None => self.tree.nodes().first().map(|n| n.id),
        };
        if let Some(id) = next {
            self.select_note(id);
        }
    }

    /// Opens the note above the current one.
    pub fn select_prev(&mut self) {
        if let Some(id) = self.tree.selected_id().and_then(|id| self.tree.prev_id(id)) {
            self.select_note(id);
        }
    }

    // --- Outline and navigation ---

    /// Headings of the open note, recomputed only when its content changed.
    ///
    /// Keeps `outline_index` on an existing heading when edits shrink the outline.
    pub fn outline(&mut self) -> &[Heading] {
        let content = self.tree.selected().and_then(|n| n.content.as_deref());
        let headings = self.outline_cache.headings(content);
        self.outline_index = self.outline_index.min(headings.len().saturating_sub(1));
        headings
    }

    #[must_use]
    /// Number of extractions the outline cache has performed.
    pub fn outline_recomputations(&self) -> usize {
        self.outline_cache.recomputations()
    }

    /// Moves the editor cursor to the start of 1-based `line` and records the location.
    pub fn jump_to_line(&mut self, line: usize) {
        let Some(editor_state) = self.editor_state.as_mut() else {
            return;
        };
        let line = clamp_line(line, editor_state.lines.len());
        editor_state.cursor = Index2::new(line - 1, 0);

        self.location = Location {
            note: self.tree.selected_id(),
            line: Some(line),
        };
        self.message = Some(self.location.to_query());
    }

    /// Sends the editor to the heading at `index` in the outline.
    ///
    /// An index past the end selects the last heading.
    pub fn jump_to_heading(&mut self, index: usize) {
        let headings = self.outline();
        let index = index.min(headings.len().saturating_sub(1));
        let Some(line) = headings.get(index).map(|h| h.line) else {
            return;
        };
        self.outline_index = index;
        self.jump_to_line(line);
        self.focus = Pane::Editor;
    }

    /// Opens a location, e.g. one given on the command line.
    pub fn open_location(&mut self, location: Location) {
        if let Some(note) = location.note {
            if self.tree.get(note).is_none() {
                self.message = Some(format!("No note with id {note}"));
                return;
            }
            self.select_note(note);
        }
        if let Some(line) = location.line {
            self.jump_to_line(line);
            self.focus = Pane::Editor;
        }
    }

    /// Moves the outline highlight down.
    pub fn outline_down(&mut self) {
        let len = self.outline().len();
        if self.outline_index + 1 < len {
            self.outline_index += 1;
        }
    }

    /// Moves the outline highlight up.
    pub fn outline_up(&mut self) {
        self.outline();
        self.outline_index = self.outline_index.saturating_sub(1);
    }

    // --- Store operations ---

    /// Writes note `id` to the store if it has unsaved edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    pub fn save_note(&mut self, id: u64) -> io::Result<bool> {
        let Some(node) = self.tree.get(id).filter(|n| n.dirty) else {
            return Ok(false);
        };
        let update = NoteUpdate {
            name: None,
            content: node.content.clone(),
        };
        let record = self.store.update(id, update)?;
        log::info!("saved note {id} ({})", record.name);
        self.tree.dispatch(TreeAction::Saved(record));
        Ok(true)
    }

    /// Saves the open note.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    pub fn save_current(&mut self) -> io::Result<()> {
        self.sync_editor();
        let saved = match self.tree.selected_id() {
            Some(id) => self.save_note(id)?,
            None => false,
        };
        self.message = Some(if saved { "Saved" } else { "Nothing to save" }.to_string());
        Ok(())
    }

    /// Saves every note with unsaved edits.
    ///
    /// # Errors
    ///
    /// Returns the first store error; notes saved before it stay saved.
    pub fn save_all(&mut self) -> io::Result<()> {
        self.sync_editor();
        let mut count = 0;
        for id in self.tree.dirty_ids() {
            if self.save_note(id)? {
                count += 1;
            }
        }
        self.message = Some(format!("Saved {count} notes"));
        Ok(())
    }

    /// Creates a note and opens it in the editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the name or cannot be written.
    pub fn create_note(&mut self, name: &str) -> io::Result<()> {
        let record = self.store.create(name)?;
        let id = record.id;
        log::info!("created note {id} ({})", record.name);
        self.message = Some(format!("Created {}", record.name));
        self.tree.dispatch(TreeAction::Add(record));
        self.select_note(id);
        self.focus = Pane::Editor;
        Ok(())
    }

    /// Renames the open note without touching its unsaved edits.
    ///
    /// # Errors
    ///
    /// Returns an error if no note is open or the store rejects the name.
    pub fn rename_current(&mut self, name: &str) -> io::Result<()> {
        let id = self.require_selected()?;
        let update = NoteUpdate {
            name: Some(name.to_string()),
            content: None,
        };
        let record = self.store.update(id, update)?;
        self.message = Some(format!("Renamed to {}", record.name));
        self.tree.dispatch(TreeAction::Rename {
            id,
            name: record.name,
        });
        Ok(())
    }

    /// Deletes the open note and opens its neighbour.
    ///
    /// # Errors
    ///
    /// Returns an error if no note is open or the store cannot delete it.
    pub fn delete_current(&mut self) -> io::Result<()> {
        let id = self.require_selected()?;
        let neighbour = self.tree.next_id(id).or_else(|| self.tree.prev_id(id));

        self.store.delete(id)?;
        log::info!("deleted note {id}");
        self.tree.dispatch(TreeAction::Remove(id));
        self.baseline = None;

        match neighbour {
            Some(next) => self.select_note(next),
            None => {
                self.editor_state = None;
                self.location = Location::default();
            }
        }
        self.message = Some("Deleted".to_string());
        Ok(())
    }

    /// Discards every unsaved edit by reloading the notes from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn revert_all(&mut self) -> io::Result<()> {
        self.sync_editor();
        let discarded = self.tree.dirty_ids().len();
        let records = self.store.list()?;
        self.tree.dispatch(TreeAction::Load(records));
        self.load_editor();
        log::info!("reverted {discarded} notes");
        self.message = Some(format!("Reverted {discarded} notes"));
        Ok(())
    }

    fn require_selected(&self) -> io::Result<u64> {
        self.tree
            .selected_id()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no note is open"))
    }

    // --- Search ---

    /// Searches every note, including unsaved edits, and shows the results.
    pub fn run_search(&mut self, query: &str) {
        self.sync_editor();
        self.search_results = search_notes(self.tree.nodes(), query, self.snippet);
        self.search_index = 0;
        self.current_view = View::SearchResults;
        self.message = Some(format!(
            "{} notes match {query:?}",
            self.search_results.len()
        ));
    }

    /// Opens the search hit at `index` at the line of its first match.
    pub fn open_search_hit(&mut self, index: usize) {
        let Some((id, line)) = self.search_results.get(index).map(|h| (h.id, h.line)) else {
            return;
        };
        self.current_view = View::Normal;
        self.select_note(id);
        self.jump_to_line(line);
        self.focus = Pane::Editor;
    }

    /// Leaves the search results.
    pub fn close_search(&mut self) {
        self.current_view = View::Normal;
        self.search_results.clear();
    }

    // --- Commands ---

    /// Asks to quit, refusing while edits are unsaved unless `force` is set.
    pub fn request_quit(&mut self, force: bool) {
        self.sync_editor();
        if !force && self.tree.has_unsaved_changes() {
            self.message = Some("Unsaved changes (:wq to save, :q! to discard)".to_string());
            return;
        }
        self.should_quit = true;
    }

    /// Runs a command typed after ':', reporting failures in the status bar.
    pub fn execute_command(&mut self, cmd: &str) {
        let cmd = cmd.trim();
        let (name, arg) = cmd
            .split_once(char::is_whitespace)
            .map_or((cmd, ""), |(n, a)| (n, a.trim()));

        let result = match name {
            "" => Ok(()),
            "w" => self.save_current(),
            "wa" => self.save_all(),
            "q" => {
                self.request_quit(false);
                Ok(())
            }
            "q!" => {
                self.request_quit(true);
                Ok(())
            }
            "e!" => self.revert_all(),
            "wq" | "x" => self.save_all().map(|()| self.request_quit(false)),
            "new" => self.create_note(arg),
            "rename" => self.rename_current(arg),
            "delete" => self.delete_current(),
            "line" => {
                match arg.parse() {
                    Ok(line) => self.jump_to_line(line),
                    Err(_) => self.message = Some(format!("Not a line number: {arg}")),
                }
                Ok(())
            }
            _ => {
                self.message = Some(format!("Unknown command: {cmd}"));
                Ok(())
            }
        };

        if let Err(e) = result {
            log::warn!("command {cmd:?} failed: {e}");
            self.message = Some(format!("Error: {e}"));
        }
    }

    /// Starts command input with `prefill` already typed.
    pub fn begin_command(&mut self, prefill: &str) {
        self.current_view = View::Command;
        self.command_buffer = prefill.to_string();
        self.message = None;
    }

    #[must_use]
    /// Whether a shortcut chord should be handled globally rather than passed to the pane.
    ///
    /// While the editor takes text input only chords with Ctrl are treated as shortcuts.
    pub fn accepts_shortcut(&self, chord: &str) -> bool {
        if self.current_view != View::Normal {
            return false;
        }
        !(self.focus == Pane::Editor && self.editor_is_typing() && !chord.starts_with("ctrl+"))
    }

    /// Performs a global shortcut action.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Save => {
                if let Err(e) = self.save_current() {
                    self.message = Some(format!("Error saving: {e}"));
                }
            }
            Shortcut::NewNote => self.begin_command("new "),
            Shortcut::Search => {
                self.current_view = View::SearchInput;
                self.command_buffer.clear();
                self.message = None;
            }
            Shortcut::Quit => self.request_quit(false),
            Shortcut::NextPane => self.focus = self.focus.next(),
            Shortcut::PrevPane => self.focus = self.focus.prev(),
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
