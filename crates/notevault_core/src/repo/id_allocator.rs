//! Monotonic note identifier allocation.
//!
//! # Invariants
//! - Issued ids are strictly increasing and start above zero.
//! - An id is never issued twice, including after its note is deleted.

use crate::model::note::NoteId;

/// First id issued by a default allocator.
pub const FIRST_NOTE_ID: NoteId = 1;

/// Stateful counter handing out note ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: NoteId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: FIRST_NOTE_ID }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes allocation at `next`. Zero is bumped to `FIRST_NOTE_ID`.
    pub fn starting_at(next: NoteId) -> Self {
        Self {
            next: next.max(FIRST_NOTE_ID),
        }
    }

    /// Issues the next id, or `None` once the id space is exhausted.
    pub fn next_id(&mut self) -> Option<NoteId> {
        let id = self.next;
        self.next = id.checked_add(1)?;
        Some(id)
    }

    /// The id the next call to `next_id` would issue.
    pub fn peek(&self) -> NoteId {
        self.next
    }
}
