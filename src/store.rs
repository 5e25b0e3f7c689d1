//! Note persistence.
//!
//! The UI talks to storage only through [`NoteStore`]. Two backends are provided: an
//! in-memory notebook for scratch sessions and tests, and a JSON file that is rewritten
//! after every change.

use crate::note::{NoteRecord, NoteUpdate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Name given to the note a fresh notebook starts with.
pub const WELCOME_NAME: &str = "Welcome";

/// Create, update, delete and list operations on a user's notes.
pub trait NoteStore {
    /// All notes in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn list(&self) -> io::Result<Vec<NoteRecord>>;

    /// Creates an empty note called `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, or an error if the backend cannot be written.
    fn create(&mut self, name: &str) -> io::Result<NoteRecord>;

    /// Applies `update` to note `id` and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `InvalidInput` for a blank name, or an error if
    /// the backend cannot be written.
    fn update(&mut self, id: u64, update: NoteUpdate) -> io::Result<NoteRecord>;

    /// Deletes note `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or an error if the backend cannot be written.
    fn delete(&mut self, id: u64) -> io::Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Notes plus the id counter, which only ever increases.
struct Notebook {
    next_id: u64,
    notes: Vec<NoteRecord>,
}

impl Notebook {
    fn empty() -> Self {
        Self {
            next_id: 1,
            notes: Vec::new(),
        }
    }

    fn with_welcome() -> Self {
        Self {
            next_id: 2,
            notes: vec![NoteRecord {
                id: 1,
                name: WELCOME_NAME.to_string(),
                content: None,
            }],
        }
    }

    /// Raises a hand-edited counter above every stored id so none is handed out twice.
    fn repaired(mut self) -> Self {
        let floor = self.notes.iter().map(|n| n.id + 1).max().unwrap_or(1);
        if self.next_id < floor {
            log::warn!("notebook id counter {} is behind its notes, using {floor}", self.next_id);
            self.next_id = floor;
        }
        self
    }

    fn create(&mut self, name: &str) -> io::Result<NoteRecord> {
        let record = NoteRecord {
            id: self.next_id,
            name: valid_name(name)?,
            content: Some(String::new()),
        };
        self.next_id += 1;
        self.notes.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, id: u64, update: NoteUpdate) -> io::Result<NoteRecord> {
        let name = update.name.as_deref().map(valid_name).transpose()?;
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = name {
            note.name = name;
        }
        if let Some(content) = update.content {
            note.content = Some(content);
        }
        Ok(note.clone())
    }

    fn delete(&mut self, id: u64) -> io::Result<()> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| not_found(id))?;
        self.notes.remove(index);
        Ok(())
    }
}

fn valid_name(name: &str) -> io::Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "note name cannot be empty",
        ));
    }
    Ok(name.to_string())
}

fn not_found(id: u64) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no note with id {id}"))
}

/// Notes held in memory for the lifetime of the process.
pub struct MemoryNoteStore {
    notebook: Notebook,
}

impl MemoryNoteStore {
    #[must_use]
    /// Store with no notes.
    pub fn new() -> Self {
        Self {
            notebook: Notebook::empty(),
        }
    }

    #[must_use]
    /// Store seeded with the welcome note.
    pub fn with_welcome() -> Self {
        Self {
            notebook: Notebook::with_welcome(),
        }
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for MemoryNoteStore {
    fn list(&self) -> io::Result<Vec<NoteRecord>> {
        Ok(self.notebook.notes.clone())
    }

    fn create(&mut self, name: &str) -> io::Result<NoteRecord> {
        self.notebook.create(name)
    }

    fn update(&mut self, id: u64, update: NoteUpdate) -> io::Result<NoteRecord> {
        self.notebook.update(id, update)
    }

    fn delete(&mut self, id: u64) -> io::Result<()> {
        self.notebook.delete(id)
    }
}

/// Notes persisted to a single JSON file.
///
/// The whole notebook is rewritten after each change, via a temporary sibling file that is
/// renamed over the original so a crash mid-write leaves the previous version intact.
pub struct JsonNoteStore {
    path: PathBuf,
    notebook: Notebook,
}

impl JsonNoteStore {
    /// Opens the notebook at `path`, starting with the welcome note if the file is missing.
    ///
    /// Nothing is written until the first change.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or `InvalidData` if it is not a
    /// valid notebook.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let notebook = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<Notebook>(&contents)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
                .repaired(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no notebook at {}, starting fresh", path.display());
                Notebook::with_welcome()
            }
            Err(e) => return Err(e),
        };
        Ok(Self { path, notebook })
    }

    fn persist(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.notebook).map_err(io::Error::other)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!(
            "wrote {} notes to {}",
            self.notebook.notes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Runs `change` on a copy of the notebook and keeps it only if it persists.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Notebook) -> io::Result<T>) -> io::Result<T> {
        let mut next = self.notebook.clone();
        let out = change(&mut next)?;
        let previous = std::mem::replace(&mut self.notebook, next);
        if let Err(e) = self.persist() {
            self.notebook = previous;
            return Err(e);
        }
        Ok(out)
    }
}

impl NoteStore for JsonNoteStore {
    fn list(&self) -> io::Result<Vec<NoteRecord>> {
        Ok(self.notebook.notes.clone())
    }

    fn create(&mut self, name: &str) -> io::Result<NoteRecord> {
        self.commit(|notebook| notebook.create(name))
    }

    fn update(&mut self, id: u64, update: NoteUpdate) -> io::Result<NoteRecord> {
        self.commit(|notebook| notebook.update(id, update))
    }

    fn delete(&mut self, id: u64) -> io::Result<()> {
        self.commit(|notebook| notebook.delete(id))
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
