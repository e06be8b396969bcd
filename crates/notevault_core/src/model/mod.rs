//! Domain model for notes, grants and content history.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the authorization rule next to the data it inspects.
//!
//! # Invariants
//! - Every note is identified by a store-issued `NoteId`.
//! - Deletion removes a note entirely; there are no tombstones.

pub mod note;
pub mod permission;
pub mod permission_table;
pub mod principal;
pub mod version_history;
