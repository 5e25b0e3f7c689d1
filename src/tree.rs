//! Flat note tree with exclusive selection and unsaved-change tracking.
//!
//! Every mutation goes through [`NoteTree::dispatch`] so the two invariants hold in one
//! place: at most one node is selected, and `dirty` is only set by local edits and only
//! cleared by a save.

use crate::note::{NoteNode, NoteRecord};

#[derive(Clone, Debug, PartialEq)]
/// Mutation applied to the note tree.
pub enum TreeAction {
    /// Replace every node with a fresh listing from the store.
    Load(Vec<NoteRecord>),
    /// Append a newly created note.
    Add(NoteRecord),
    /// Change a note's display name locally.
    Rename {
        /// Target note.
        id: u64,
        /// New name.
        name: String,
    },
    /// Replace a note's body after a local edit.
    Edit {
        /// Target note.
        id: u64,
        /// New body.
        content: String,
    },
    /// Adopt the record the store returned after a successful save.
    Saved(NoteRecord),
    /// Drop a deleted note.
    Remove(u64),
    /// Select one note, deselecting any other.
    Select(u64),
}

#[derive(Default)]
/// Ordered collection of notes as shown in the tree pane.
pub struct NoteTree {
    nodes: Vec<NoteNode>,
}

impl NoteTree {
    #[must_use]
    /// Builds a tree from a store listing with nothing selected.
    pub fn new(records: Vec<NoteRecord>) -> Self {
        Self {
            nodes: records.into_iter().map(NoteNode::from).collect(),
        }
    }

    /// Applies `action`, returning whether any node changed.
    pub fn dispatch(&mut self, action: TreeAction) -> bool {
        match action {
            TreeAction::Load(records) => {
                let keep = self.selected_id();
                self.nodes = records.into_iter().map(NoteNode::from).collect();
                if let Some(id) = keep {
                    self.select(id);
                }
                true
            }
            TreeAction::Add(record) => {
                if self.position(record.id).is_some() {
                    log::warn!("note {} already in tree, ignoring add", record.id);
                    return false;
                }
                self.nodes.push(NoteNode::from(record));
                true
            }
            TreeAction::Rename { id, name } => match self.get_mut(id) {
                Some(node) if node.name != name => {
                    node.name = name;
                    true
                }
                _ => false,
            },
            TreeAction::Edit { id, content } => match self.get_mut(id) {
                Some(node) if node.content.as_deref() != Some(content.as_str()) => {
                    node.content = Some(content);
                    node.dirty = true;
                    true
                }
                _ => false,
            },
            TreeAction::Saved(record) => match self.get_mut(record.id) {
                Some(node) => {
                    node.name = record.name;
                    node.content = record.content;
                    node.dirty = false;
                    true
                }
                None => false,
            },
            TreeAction::Remove(id) => match self.position(id) {
                Some(index) => {
                    self.nodes.remove(index);
                    true
                }
                None => false,
            },
            TreeAction::Select(id) => self.select(id),
        }
    }

    fn select(&mut self, id: u64) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        let mut changed = false;
        for node in &mut self.nodes {
            let selected = node.id == id;
            changed |= node.selected != selected;
            node.selected = selected;
        }
        changed
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut NoteNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    /// All nodes in tree order.
    pub fn nodes(&self) -> &[NoteNode] {
        &self.nodes
    }

    #[must_use]
    /// Number of notes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// Whether the tree holds no notes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    /// Looks up a note by id.
    pub fn get(&self, id: u64) -> Option<&NoteNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    /// Index of a note in tree order.
    pub fn position(&self, id: u64) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    #[must_use]
    /// The open note, if any.
    pub fn selected(&self) -> Option<&NoteNode> {
        self.nodes.iter().find(|n| n.selected)
    }

    #[must_use]
    /// Id of the open note, if any.
    pub fn selected_id(&self) -> Option<u64> {
        self.selected().map(|n| n.id)
    }

    #[must_use]
    /// Ids of notes with unsaved edits, in tree order.
    pub fn dirty_ids(&self) -> Vec<u64> {
        self.nodes.iter().filter(|n| n.dirty).map(|n| n.id).collect()
    }

    #[must_use]
    /// Whether any note has unsaved edits.
    pub fn has_unsaved_changes(&self) -> bool {
        self.nodes.iter().any(|n| n.dirty)
    }

    #[must_use]
    /// Id of the note after `id`, if there is one.
    pub fn next_id(&self, id: u64) -> Option<u64> {
        let index = self.position(id)?;
        self.nodes.get(index + 1).map(|n| n.id)
    }

    #[must_use]
    /// Id of the note before `id`, if there is one.
    pub fn prev_id(&self, id: u64) -> Option<u64> {
        let index = self.position(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.nodes.get(i))
            .map(|n| n.id)
    }
}

#[cfg(test)]
#[path = "tests/tree.rs"]
mod tests;
