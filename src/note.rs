//! Note representation shared by the store and the note tree.
//!
//! The store only knows about persisted records. The tree wraps each record with the
//! local-only flags the UI needs: whether it has unsaved edits and whether it is the one
//! currently open.

use serde::{Deserialize, Serialize};

/// Text shown for a note that has never been edited.
pub const WELCOME_TEXT: &str = "# Welcome to SNApp\n\n\
Notes are written in Markdown. Headings show up in the outline on the right.\n\n\
## Getting around\n\n\
- Tab cycles between the notes, editor and outline panes\n\
- Ctrl+S saves, Ctrl+N creates a note, Ctrl+F searches\n\
- `:rename <name>`, `:delete` and `:line <n>` work from the command bar\n";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Persisted form of a note as the store returns it.
pub struct NoteRecord {
    /// Store-assigned identifier, never reused.
    pub id: u64,
    /// Display name in the note tree.
    pub name: String,
    /// Markdown body; `None` for an untouched welcome note.
    pub content: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Partial change to a stored note; absent fields are left as they are.
pub struct NoteUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement body.
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Note as held by the tree, with local editing state.
pub struct NoteNode {
    /// Store identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Current (possibly unsaved) body.
    pub content: Option<String>,
    /// Set on every local edit, cleared by a successful save.
    pub dirty: bool,
    /// Whether this note is open; at most one node is selected.
    pub selected: bool,
}

impl NoteNode {
    #[must_use]
    /// Text to present in the editor, falling back to the welcome text.
    pub fn display_text(&self) -> &str {
        self.content.as_deref().unwrap_or(WELCOME_TEXT)
    }
}

impl From<NoteRecord> for NoteNode {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            content: record.content,
            dirty: false,
            selected: false,
        }
    }
}
