//! Note use-case service.
//!
//! # Responsibility
//! - Expose every note operation behind a caller identity.
//! - Authorize before any read or mutation, using `Note::allows`.
//! - Stamp mutations with a non-decreasing timestamp from the injected clock.
//!
//! # Invariants
//! - A failed operation leaves store state untouched.
//! - `update` and `revert` append exactly one version; nothing else does.
//! - `share` and `revoke` never touch `updated_at` or `versions`.
//! - Issued timestamps never decrease, even if the clock steps backwards.
//!
//! The store assumes serialized calls: every mutation takes `&mut self`, and
//! a host sharing it across threads must wrap the whole store in one lock.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::model::note::{Note, NoteId, NoteVersion, Timestamp};
use crate::model::permission::{Access, Permission};
use crate::model::principal::Principal;
use crate::repo::note_repo::{InMemoryNoteRepository, NoteRepository, RepoError, StoreSnapshot};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Service error for note use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteServiceError {
    /// No note with this id exists.
    NoteNotFound(NoteId),
    /// The note exists but the caller does not meet `required`.
    AccessDenied { id: NoteId, required: Access },
    /// `index` is outside `0..len` of the note's history.
    InvalidVersionIndex { id: NoteId, index: usize, len: usize },
    /// A note cannot be shared with its own owner.
    InvalidShareTarget(NoteId),
    /// Storage-layer failure.
    Repo(RepoError),
}

impl NoteServiceError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoteNotFound(_) => "not_found",
            Self::AccessDenied { .. } => "access_denied",
            Self::InvalidVersionIndex { .. } => "invalid_index",
            Self::InvalidShareTarget(_) => "invalid_share_target",
            Self::Repo(_) => "repo_error",
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::AccessDenied { id, required } => {
                write!(f, "access denied: {required} access required on note {id}")
            }
            Self::InvalidVersionIndex { id, index, len } => write!(
                f,
                "version index {index} out of range for note {id} ({len} versions)"
            ),
            Self::InvalidShareTarget(id) => {
                write!(f, "note {id} cannot be shared with its owner")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Authorizing note store over a repository and an injected clock.
pub struct NoteStore<R: NoteRepository = InMemoryNoteRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    last_stamp: Timestamp,
}

impl<C: Clock> NoteStore<InMemoryNoteRepository, C> {
    /// Creates an empty in-memory store issuing ids from 1.
    pub fn in_memory(clock: C) -> Self {
        Self::new(InMemoryNoteRepository::new(), clock)
    }

    /// Creates an empty in-memory store using `config.first_note_id`.
    pub fn with_config(config: &CoreConfig, clock: C) -> Self {
        Self::new(
            InMemoryNoteRepository::starting_at(config.first_note_id),
            clock,
        )
    }

    /// Exports every note plus the allocator position.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.repo.snapshot()
    }

    /// Rebuilds a store from a snapshot produced by `snapshot`.
    pub fn restore(snapshot: StoreSnapshot, clock: C) -> ServiceResult<Self> {
        let repo = InMemoryNoteRepository::from_snapshot(snapshot).map_err(|err| {
            error!(
                "event=store_restore module=service status=error error_code=invalid_snapshot error={}",
                err
            );
            NoteServiceError::from(err)
        })?;
        let store = Self::new(repo, clock);
        info!(
            "event=store_restore module=service status=ok notes={}",
            store.note_count()
        );
        Ok(store)
    }
}

impl<R: NoteRepository, C: Clock> NoteStore<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        let last_stamp = repo.notes().map(Note::updated_at).max().unwrap_or(0);
        Self {
            repo,
            clock,
            last_stamp,
        }
    }

    /// Total notes held, regardless of caller.
    pub fn note_count(&self) -> usize {
        self.repo.len()
    }

    /// Creates a note owned by `caller`. Any caller may create notes.
    pub fn create(
        &mut self,
        caller: &Principal,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<NoteId> {
        let id = self.repo.allocate_id().map_err(|err| {
            error!(
                "event=note_create module=service status=error error_code=id_allocation error={}",
                err
            );
            NoteServiceError::from(err)
        })?;
        let now = next_stamp(&self.clock, &mut self.last_stamp);
        self.repo
            .insert_note(Note::new(id, caller.clone(), title, content, now))?;

        info!("event=note_create module=service status=ok note_id={id}");
        Ok(id)
    }

    /// Returns the note when `caller` is the owner or holds any grant.
    pub fn get(&self, caller: &Principal, id: NoteId) -> ServiceResult<&Note> {
        authorize(&self.repo, caller, id, Access::Read).map_err(|err| rejected("note_get", err))
    }

    /// Every note `caller` owns or was granted, in unspecified order.
    pub fn list_visible(&self, caller: &Principal) -> Vec<&Note> {
        let notes: Vec<&Note> = self
            .repo
            .notes()
            .filter(|note| note.allows(caller, Access::Read))
            .collect();
        debug!(
            "event=note_list module=service status=ok count={}",
            notes.len()
        );
        notes
    }

    /// Replaces title and content; the previous content becomes a version.
    pub fn update(
        &mut self,
        caller: &Principal,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<&Note> {
        let note = authorize_mut(&mut self.repo, caller, id, Access::Write)
            .map_err(|err| rejected("note_update", err))?;
        let now = next_stamp(&self.clock, &mut self.last_stamp);
        note.update(title, content, now);

        info!(
            "event=note_update module=service status=ok note_id={id} versions={}",
            note.versions().len()
        );
        Ok(note)
    }

    /// Flips the markdown hint. Not a content change: no version is added.
    pub fn toggle_markdown(&mut self, caller: &Principal, id: NoteId) -> ServiceResult<&Note> {
        let note = authorize_mut(&mut self.repo, caller, id, Access::Write)
            .map_err(|err| rejected("note_toggle_markdown", err))?;
        let now = next_stamp(&self.clock, &mut self.last_stamp);
        note.toggle_markdown(now);

        info!(
            "event=note_toggle_markdown module=service status=ok note_id={id} is_markdown={}",
            note.is_markdown()
        );
        Ok(note)
    }

    /// Removes the note and returns it as it was just before removal.
    pub fn delete(&mut self, caller: &Principal, id: NoteId) -> ServiceResult<Note> {
        authorize(&self.repo, caller, id, Access::Owner)
            .map_err(|err| rejected("note_delete", err))?;
        let removed = self.repo.remove_note(id)?;

        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(removed)
    }

    /// Grants `permission` to `target`, replacing any existing grant.
    pub fn share(
        &mut self,
        caller: &Principal,
        id: NoteId,
        target: Principal,
        permission: Permission,
    ) -> ServiceResult<&Note> {
        let note = authorize_mut(&mut self.repo, caller, id, Access::Owner)
            .map_err(|err| rejected("note_share", err))?;
        if !note.grant(target, permission) {
            return Err(rejected(
                "note_share",
                NoteServiceError::InvalidShareTarget(id),
            ));
        }

        info!(
            "event=note_share module=service status=ok note_id={id} permission={permission} grants={}",
            note.shared_with().len()
        );
        Ok(note)
    }

    /// Removes any grant held by `target`. Absent grants are a no-op.
    pub fn revoke(
        &mut self,
        caller: &Principal,
        id: NoteId,
        target: &Principal,
    ) -> ServiceResult<&Note> {
        let note = authorize_mut(&mut self.repo, caller, id, Access::Owner)
            .map_err(|err| rejected("note_revoke", err))?;
        let removed = note.revoke(target);

        info!(
            "event=note_revoke module=service status=ok note_id={id} removed={}",
            removed.is_some()
        );
        Ok(note)
    }

    /// Returns the content history, oldest first.
    pub fn get_versions(&self, caller: &Principal, id: NoteId) -> ServiceResult<&[NoteVersion]> {
        let note = authorize(&self.repo, caller, id, Access::Read)
            .map_err(|err| rejected("note_versions", err))?;
        Ok(note.versions().as_slice())
    }

    /// Restores content from `versions[index]`, keeping the title.
    ///
    /// The replaced content is appended as a new version.
    pub fn revert(
        &mut self,
        caller: &Principal,
        id: NoteId,
        index: usize,
    ) -> ServiceResult<&Note> {
        let note = authorize_mut(&mut self.repo, caller, id, Access::Write)
            .map_err(|err| rejected("note_revert", err))?;
        let len = note.versions().len();
        if index >= len {
            return Err(rejected(
                "note_revert",
                NoteServiceError::InvalidVersionIndex { id, index, len },
            ));
        }

        let now = next_stamp(&self.clock, &mut self.last_stamp);
        let reverted = note.revert_to(index, now);
        debug_assert!(reverted, "index was range-checked above");

        info!(
            "event=note_revert module=service status=ok note_id={id} index={index} versions={}",
            note.versions().len()
        );
        Ok(note)
    }
}

fn authorize<'a, R: NoteRepository>(
    repo: &'a R,
    caller: &Principal,
    id: NoteId,
    required: Access,
) -> ServiceResult<&'a Note> {
    let note = repo
        .get_note(id)
        .ok_or(NoteServiceError::NoteNotFound(id))?;
    if !note.allows(caller, required) {
        return Err(NoteServiceError::AccessDenied { id, required });
    }
    Ok(note)
}

fn authorize_mut<'a, R: NoteRepository>(
    repo: &'a mut R,
    caller: &Principal,
    id: NoteId,
    required: Access,
) -> ServiceResult<&'a mut Note> {
    let note = repo
        .get_note_mut(id)
        .ok_or(NoteServiceError::NoteNotFound(id))?;
    if !note.allows(caller, required) {
        return Err(NoteServiceError::AccessDenied { id, required });
    }
    Ok(note)
}

fn next_stamp<C: Clock>(clock: &C, last_stamp: &mut Timestamp) -> Timestamp {
    let now = clock.now().max(*last_stamp);
    *last_stamp = now;
    now
}

fn rejected(event: &str, err: NoteServiceError) -> NoteServiceError {
    info!(
        "event={event} module=service status=rejected error_code={}",
        err.code()
    );
    err
}
