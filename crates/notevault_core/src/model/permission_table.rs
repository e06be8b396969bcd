//! Per-note sharing table.
//!
//! # Responsibility
//! - Map non-owner principals to their single granted `Permission`.
//!
//! # Invariants
//! - At most one entry per principal; `set` overwrites, never merges.
//! - Decoding rejects pair sequences that name a principal twice.
//! - Owner exclusion is enforced by `Note`, which is the only mutator.
//! - Enumeration order carries no meaning (sorted only for stable output).

use crate::model::permission::Permission;
use crate::model::principal::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A decoded grant list named the same principal more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGrantError {
    pub principal: Principal,
}

impl Display for DuplicateGrantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate grant for principal `{}`", self.principal)
    }
}

impl Error for DuplicateGrantError {}

/// Identity -> permission grants for one note.
///
/// Serialized as a sequence of `[identity, permission]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(Principal, Permission)>",
    into = "Vec<(Principal, Permission)>"
)]
pub struct PermissionTable {
    entries: BTreeMap<Principal, Permission>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, principal: &Principal) -> Option<Permission> {
        self.entries.get(principal).copied()
    }

    /// Inserts or replaces the grant for `principal`.
    ///
    /// Returns the replaced grant, if any.
    pub fn set(&mut self, principal: Principal, permission: Permission) -> Option<Permission> {
        self.entries.insert(principal, permission)
    }

    /// Removes the grant for `principal`. Absent entries are a no-op.
    pub fn remove(&mut self, principal: &Principal) -> Option<Permission> {
        self.entries.remove(principal)
    }

    pub fn contains(&self, principal: &Principal) -> bool {
        self.entries.contains_key(principal)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Principal, Permission)> + '_ {
        self.entries
            .iter()
            .map(|(principal, permission)| (principal, *permission))
    }
}

impl TryFrom<Vec<(Principal, Permission)>> for PermissionTable {
    type Error = DuplicateGrantError;

    fn try_from(value: Vec<(Principal, Permission)>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (principal, permission) in value {
            if entries.contains_key(&principal) {
                return Err(DuplicateGrantError { principal });
            }
            entries.insert(principal, permission);
        }
        Ok(Self { entries })
    }
}

impl From<PermissionTable> for Vec<(Principal, Permission)> {
    fn from(value: PermissionTable) -> Self {
        value.entries.into_iter().collect()
    }
}
