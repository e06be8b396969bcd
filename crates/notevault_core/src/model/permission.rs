//! Sharing permission levels.
//!
//! # Responsibility
//! - Define the closed set of grants a non-owner can hold on a note.
//! - Centralize the "which grant satisfies which requirement" rule.
//!
//! # Invariants
//! - `Write` satisfies both `Read` and `Write` requirements.
//! - `Read` satisfies only `Read` requirements.
//! - A grant is one discrete tag, never a bitmask.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Grant held by a non-owner principal on one note.
///
/// Serialized as `"Read"` / `"Write"` to match the external variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Write,
}

impl Permission {
    /// Returns whether holding `self` is enough for an operation that
    /// requires `required`.
    pub fn satisfies(self, required: Permission) -> bool {
        match (self, required) {
            (Self::Write, _) => true,
            (Self::Read, Self::Read) => true,
            (Self::Read, Self::Write) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization requirement of one store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Owner, or any grant.
    Read,
    /// Owner, or a `Write` grant.
    Write,
    /// Owner only; grants never qualify.
    Owner,
}

impl Access {
    /// Returns whether a non-owner holding `grant` passes this requirement.
    pub fn granted_by(self, grant: Option<Permission>) -> bool {
        match (self, grant) {
            (Self::Owner, _) | (_, None) => false,
            (Self::Read, Some(grant)) => grant.satisfies(Permission::Read),
            (Self::Write, Some(grant)) => grant.satisfies(Permission::Write),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Owner => "owner",
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
