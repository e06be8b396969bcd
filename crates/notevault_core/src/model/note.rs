//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its immutable version snapshots.
//! - Own every field-level mutation so record invariants live in one place.
//!
//! # Invariants
//! - `id`, `owner` and `created_at` never change after construction.
//! - `shared_with` never contains `owner`.
//! - Each content change appends exactly one `NoteVersion` holding the
//!   content and `updated_at` that were current before the change.
//! - `created_at <= updated_at`.

use crate::model::permission::{Access, Permission};
use crate::model::permission_table::PermissionTable;
use crate::model::principal::Principal;
use crate::model::version_history::VersionHistory;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable note identifier issued by the store.
pub type NoteId = u64;

/// Nanosecond timestamp supplied by the host clock.
pub type Timestamp = u64;

/// Immutable snapshot of note content taken before a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteVersion {
    content: String,
    updated_at: Timestamp,
}

impl NoteVersion {
    pub fn new(content: impl Into<String>, updated_at: Timestamp) -> Self {
        Self {
            content: content.into(),
            updated_at,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The note's `updated_at` immediately before this snapshot was taken.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Record-level validation failures, raised when importing external state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    ZeroId,
    OwnerInSharedWith { id: NoteId },
    UpdatedBeforeCreated {
        id: NoteId,
        created_at: Timestamp,
        updated_at: Timestamp,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "note id must be greater than zero"),
            Self::OwnerInSharedWith { id } => {
                write!(f, "note {id} lists its owner in shared_with")
            }
            Self::UpdatedBeforeCreated {
                id,
                created_at,
                updated_at,
            } => write!(
                f,
                "note {id} has updated_at ({updated_at}) earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// A titled text document with owner, grants and content history.
///
/// Field order matches the external record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    is_markdown: bool,
    owner: Principal,
    created_at: Timestamp,
    updated_at: Timestamp,
    shared_with: PermissionTable,
    versions: VersionHistory,
}

impl Note {
    /// Creates a fresh note with no grants and no history.
    pub(crate) fn new(
        id: NoteId,
        owner: Principal,
        title: impl Into<String>,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            is_markdown: false,
            owner,
            created_at: now,
            updated_at: now,
            shared_with: PermissionTable::new(),
            versions: VersionHistory::new(),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_markdown(&self) -> bool {
        self.is_markdown
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn shared_with(&self) -> &PermissionTable {
        &self.shared_with
    }

    pub fn versions(&self) -> &VersionHistory {
        &self.versions
    }

    pub fn is_owner(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }

    /// Single authorization rule for every store operation.
    pub fn allows(&self, caller: &Principal, access: Access) -> bool {
        self.is_owner(caller) || access.granted_by(self.shared_with.get(caller))
    }

    /// Replaces title and content, recording the previous content.
    pub(crate) fn update(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        now: Timestamp,
    ) {
        let previous = std::mem::replace(&mut self.content, content.into());
        self.versions
            .append(NoteVersion::new(previous, self.updated_at));
        self.title = title.into();
        self.updated_at = now;
    }

    /// Restores content from `versions[index]`; title is left unchanged.
    ///
    /// Returns `false` and leaves the note untouched when `index` is out of
    /// range.
    pub(crate) fn revert_to(&mut self, index: usize, now: Timestamp) -> bool {
        let Some(restored) = self.versions.get(index).map(|v| v.content().to_string()) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.content, restored);
        self.versions
            .append(NoteVersion::new(previous, self.updated_at));
        self.updated_at = now;
        true
    }

    pub(crate) fn toggle_markdown(&mut self, now: Timestamp) {
        self.is_markdown = !self.is_markdown;
        self.updated_at = now;
    }

    /// Grants `permission` to `target`, replacing any previous grant.
    ///
    /// Returns `false` without touching the table when `target` is the owner.
    pub(crate) fn grant(&mut self, target: Principal, permission: Permission) -> bool {
        if self.is_owner(&target) {
            return false;
        }
        self.shared_with.set(target, permission);
        true
    }

    pub(crate) fn revoke(&mut self, target: &Principal) -> Option<Permission> {
        self.shared_with.remove(target)
    }

    /// Checks record invariants that the constructor cannot guarantee for
    /// externally supplied state.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id == 0 {
            return Err(NoteValidationError::ZeroId);
        }
        if self.shared_with.contains(&self.owner) {
            return Err(NoteValidationError::OwnerInSharedWith { id: self.id });
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                id: self.id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError, NoteVersion};
    use crate::model::permission::{Access, Permission};
    use crate::model::principal::Principal;

    fn sample() -> Note {
        Note::new(7, Principal::from("alice"), "Hi", "v1", 100)
    }

    #[test]
    fn new_note_starts_plain_and_unshared() {
        let note = sample();
        assert_eq!(note.created_at(), 100);
        assert_eq!(note.updated_at(), 100);
        assert!(!note.is_markdown());
        assert!(note.shared_with().is_empty());
        assert!(note.versions().is_empty());
    }

    #[test]
    fn update_records_previous_content_and_timestamp() {
        let mut note = sample();
        note.update("Hello", "v2", 200);

        assert_eq!(note.title(), "Hello");
        assert_eq!(note.content(), "v2");
        assert_eq!(note.updated_at(), 200);
        assert_eq!(note.versions().as_slice(), &[NoteVersion::new("v1", 100)]);
    }

    #[test]
    fn revert_out_of_range_leaves_note_untouched() {
        let mut note = sample();
        note.update("Hi", "v2", 200);
        let before = note.clone();

        assert!(!note.revert_to(5, 300));
        assert_eq!(note, before);
    }

    #[test]
    fn revert_keeps_title_and_appends_replaced_content() {
        let mut note = sample();
        note.update("Renamed", "v2", 200);

        assert!(note.revert_to(0, 300));
        assert_eq!(note.title(), "Renamed");
        assert_eq!(note.content(), "v1");
        assert_eq!(note.versions().get(1), Some(&NoteVersion::new("v2", 200)));
        assert_eq!(note.updated_at(), 300);
    }

    #[test]
    fn grant_refuses_owner() {
        let mut note = sample();
        assert!(!note.grant(Principal::from("alice"), Permission::Write));
        assert!(note.shared_with().is_empty());
    }

    #[test]
    fn allows_applies_owner_and_grant_rules() {
        let mut note = sample();
        let bob = Principal::from("bob");
        let alice = Principal::from("alice");
        note.grant(bob.clone(), Permission::Read);

        assert!(note.allows(&alice, Access::Owner));
        assert!(note.allows(&bob, Access::Read));
        assert!(!note.allows(&bob, Access::Write));
        assert!(!note.allows(&bob, Access::Owner));
        assert!(!note.allows(&Principal::from("eve"), Access::Read));
    }

    #[test]
    fn serialization_uses_expected_wire_fields() {
        let mut note = sample();
        note.grant(Principal::from("bob"), Permission::Write);
        note.update("Hi", "v2", 200);

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["owner"], "alice");
        assert_eq!(json["is_markdown"], false);
        assert_eq!(json["shared_with"], serde_json::json!([["bob", "Write"]]));
        assert_eq!(
            json["versions"],
            serde_json::json!([{ "content": "v1", "updated_at": 100 }])
        );

        let decoded: Note = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn validate_rejects_owner_grant_from_external_state() {
        let value = serde_json::json!({
            "id": 3,
            "title": "t",
            "content": "c",
            "is_markdown": false,
            "owner": "alice",
            "created_at": 1,
            "updated_at": 1,
            "shared_with": [["alice", "Read"]],
            "versions": []
        });
        let note: Note = serde_json::from_value(value).unwrap();
        assert_eq!(
            note.validate().unwrap_err(),
            NoteValidationError::OwnerInSharedWith { id: 3 }
        );
    }
}
