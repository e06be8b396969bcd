//! Fixed call surface consumed by the transport layer.
//!
//! # Responsibility
//! - Expose the ten note operations under their stable external names.
//! - Collapse core service errors into the external result shapes.
//!
//! # Invariants
//! - Calls never panic; every failure becomes `None` or an `Err` message.
//! - Only `get_note_versions` distinguishes "not found" from "denied".
//! - `revert_to_version` folds an out-of-range index into `None`.
//! - `get_note` and `get_all_notes` never mutate state.

use log::{error, warn};
use notevault_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Clock,
    InMemoryNoteRepository, Note, NoteId, NoteServiceError, NoteStore, NoteVersion, Permission,
    Principal, StoreSnapshot, SystemClock,
};

/// `get_note_versions` error text for a missing note.
pub const NOTE_NOT_FOUND_MESSAGE: &str = "Note not found";
/// `get_note_versions` error text for a caller without access.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";

/// Returned by `add_note` when no id could be issued. Never a real note id.
pub const NO_NOTE_ID: NoteId = 0;

/// Exposes core crate version to hosts.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Safe to repeat with identical arguments.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Single-owner backend instance answering calls on behalf of a caller.
///
/// The host constructs one per process and serializes calls into it.
pub struct NotesBackend<C: Clock = SystemClock> {
    store: NoteStore<InMemoryNoteRepository, C>,
}

impl NotesBackend<SystemClock> {
    /// Backend stamped by the host wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for NotesBackend<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NotesBackend<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::from_store(NoteStore::in_memory(clock))
    }

    pub fn from_store(store: NoteStore<InMemoryNoteRepository, C>) -> Self {
        Self { store }
    }

    /// Exports state so the host can persist it across restarts.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Creates a note owned by `caller` and returns its id.
    pub fn add_note(&mut self, caller: &Principal, title: String, content: String) -> NoteId {
        match self.store.create(caller, title, content) {
            Ok(id) => id,
            Err(err) => {
                error!(
                    "event=add_note module=api status=error error_code={} error={}",
                    err.code(),
                    err
                );
                NO_NOTE_ID
            }
        }
    }

    pub fn get_note(&self, caller: &Principal, id: NoteId) -> Option<Note> {
        self.store.get(caller, id).ok().cloned()
    }

    pub fn get_all_notes(&self, caller: &Principal) -> Vec<Note> {
        self.store
            .list_visible(caller)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn update_note(
        &mut self,
        caller: &Principal,
        id: NoteId,
        title: String,
        content: String,
    ) -> Option<Note> {
        self.store.update(caller, id, title, content).ok().cloned()
    }

    /// Returns the note as it was immediately before removal.
    pub fn delete_note(&mut self, caller: &Principal, id: NoteId) -> Option<Note> {
        self.store.delete(caller, id).ok()
    }

    pub fn toggle_markdown(&mut self, caller: &Principal, id: NoteId) -> Option<Note> {
        self.store.toggle_markdown(caller, id).ok().cloned()
    }

    pub fn share_note(
        &mut self,
        caller: &Principal,
        id: NoteId,
        target: Principal,
        permission: Permission,
    ) -> Option<Note> {
        self.store
            .share(caller, id, target, permission)
            .ok()
            .cloned()
    }

    pub fn revoke_access(
        &mut self,
        caller: &Principal,
        id: NoteId,
        target: Principal,
    ) -> Option<Note> {
        self.store.revoke(caller, id, &target).ok().cloned()
    }

    pub fn get_note_versions(
        &self,
        caller: &Principal,
        id: NoteId,
    ) -> Result<Vec<NoteVersion>, String> {
        self.store
            .get_versions(caller, id)
            .map(<[NoteVersion]>::to_vec)
            .map_err(|err| versions_error_message(&err))
    }

    pub fn revert_to_version(
        &mut self,
        caller: &Principal,
        id: NoteId,
        version_index: u64,
    ) -> Option<Note> {
        let Ok(index) = usize::try_from(version_index) else {
            warn!(
                "event=revert_to_version module=api status=rejected error_code=invalid_index note_id={id}"
            );
            return None;
        };
        self.store.revert(caller, id, index).ok().cloned()
    }
}

fn versions_error_message(err: &NoteServiceError) -> String {
    match err {
        NoteServiceError::NoteNotFound(_) => NOTE_NOT_FOUND_MESSAGE.to_string(),
        NoteServiceError::AccessDenied { .. } => ACCESS_DENIED_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
