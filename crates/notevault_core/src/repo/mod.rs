//! Storage layer for notes.
//!
//! # Responsibility
//! - Define the data access contract consumed by the note service.
//! - Isolate map and allocator details from authorization logic.
//!
//! # Invariants
//! - Repository APIs never authorize; callers must check access first.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`).

pub mod id_allocator;
pub mod note_repo;
