//! Note repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Own the identifier -> note mapping and the id allocator.
//! - Export/import whole-store snapshots for host-managed persistence.
//!
//! # Invariants
//! - Repository APIs perform no authorization; that is the service's job.
//! - Ids come only from the allocator and are never reissued.
//! - Imported snapshots are validated before they replace any state.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::id_allocator::IdAllocator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(NoteId),
    DuplicateId(NoteId),
    IdSpaceExhausted,
    Validation(NoteValidationError),
    InvalidSnapshot(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note id already in use: {id}"),
            Self::IdSpaceExhausted => write!(f, "note id space exhausted"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid store snapshot: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Serializable image of a whole store: allocator position plus every note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Next id the allocator will issue.
    pub next_id: NoteId,
    /// All live notes, ascending by id.
    pub notes: Vec<Note>,
}

/// Storage contract used by the note service.
pub trait NoteRepository {
    /// Reserves a fresh id. Reserved ids are consumed even if never inserted.
    fn allocate_id(&mut self) -> RepoResult<NoteId>;
    /// Stores a note under its own id. Fails on an occupied id.
    fn insert_note(&mut self, note: Note) -> RepoResult<NoteId>;
    fn get_note(&self, id: NoteId) -> Option<&Note>;
    fn get_note_mut(&mut self, id: NoteId) -> Option<&mut Note>;
    /// Removes and returns the note.
    fn remove_note(&mut self, id: NoteId) -> RepoResult<Note>;
    fn notes(&self) -> Box<dyn Iterator<Item = &Note> + '_>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map-backed repository. State lives only as long as the value does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteRepository {
    notes: BTreeMap<NoteId, Note>,
    ids: IdAllocator,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository whose first issued id is `first_id`.
    pub fn starting_at(first_id: NoteId) -> Self {
        Self {
            notes: BTreeMap::new(),
            ids: IdAllocator::starting_at(first_id),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.ids.peek(),
            notes: self.notes.values().cloned().collect(),
        }
    }

    /// Rebuilds a repository from a snapshot after validating it.
    ///
    /// # Errors
    /// - `InvalidSnapshot` when `next_id` is zero, an id repeats, or a note id
    ///   is not below `next_id` (which would let the allocator reissue it).
    /// - `Validation` when a note breaks a record invariant.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> RepoResult<Self> {
        if snapshot.next_id == 0 {
            return Err(RepoError::InvalidSnapshot(
                "next_id must be greater than zero".to_string(),
            ));
        }

        let mut notes = BTreeMap::new();
        for note in snapshot.notes {
            note.validate()?;
            let id = note.id();
            if id >= snapshot.next_id {
                return Err(RepoError::InvalidSnapshot(format!(
                    "note id {id} is not below next_id {}",
                    snapshot.next_id
                )));
            }
            if notes.insert(id, note).is_some() {
                return Err(RepoError::InvalidSnapshot(format!("duplicate note id {id}")));
            }
        }

        Ok(Self {
            notes,
            ids: IdAllocator::starting_at(snapshot.next_id),
        })
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn allocate_id(&mut self) -> RepoResult<NoteId> {
        self.ids.next_id().ok_or(RepoError::IdSpaceExhausted)
    }

    fn insert_note(&mut self, note: Note) -> RepoResult<NoteId> {
        let id = note.id();
        if self.notes.contains_key(&id) {
            return Err(RepoError::DuplicateId(id));
        }
        self.notes.insert(id, note);
        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    fn get_note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.get_mut(&id)
    }

    fn remove_note(&mut self, id: NoteId) -> RepoResult<Note> {
        self.notes.remove(&id).ok_or(RepoError::NotFound(id))
    }

    fn notes(&self) -> Box<dyn Iterator<Item = &Note> + '_> {
        Box::new(self.notes.values())
    }

    fn len(&self) -> usize {
        self.notes.len()
    }
}
