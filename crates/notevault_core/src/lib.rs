//! Core domain logic for notevault.
//! This crate is the single source of truth for note, sharing and history
//! invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError, NoteVersion, Timestamp};
pub use model::permission::{Access, Permission};
pub use model::permission_table::{DuplicateGrantError, PermissionTable};
pub use model::principal::Principal;
pub use model::version_history::VersionHistory;
pub use repo::id_allocator::{IdAllocator, FIRST_NOTE_ID};
pub use repo::note_repo::{
    InMemoryNoteRepository, NoteRepository, RepoError, RepoResult, StoreSnapshot,
};
pub use service::note_service::{NoteServiceError, NoteStore, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
