//! Append-only content history for one note.
//!
//! # Responsibility
//! - Hold prior content snapshots, oldest first.
//!
//! # Invariants
//! - Entries are only ever appended; never removed or reordered.
//! - Length changes only by `append` or by dropping the whole note.

use crate::model::note::NoteVersion;
use serde::{Deserialize, Serialize};

/// Ordered sequence of `NoteVersion` snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHistory {
    entries: Vec<NoteVersion>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, snapshot: NoteVersion) {
        self.entries.push(snapshot);
    }

    /// Returns the snapshot at zero-based `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&NoteVersion> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[NoteVersion] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::VersionHistory;
    use crate::model::note::NoteVersion;

    #[test]
    fn append_keeps_oldest_first() {
        let mut history = VersionHistory::new();
        history.append(NoteVersion::new("v1", 10));
        history.append(NoteVersion::new("v2", 20));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).map(NoteVersion::content), Some("v1"));
        assert_eq!(history.get(1).map(NoteVersion::updated_at), Some(20));
        assert!(history.get(2).is_none());
    }
}
