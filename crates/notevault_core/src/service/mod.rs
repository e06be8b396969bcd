//! Core use-case services.
//!
//! # Responsibility
//! - Authorize callers and orchestrate repository calls into note use-cases.
//! - Keep transport/wire layers decoupled from storage details.

pub mod note_service;
