//! Caller identity value.
//!
//! # Responsibility
//! - Carry the already-authenticated caller identity through core APIs.
//!
//! # Invariants
//! - Identity comparison is exact equality on the underlying text.
//! - Core never parses, normalizes or authenticates identity values.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identity of a caller or share target.
///
/// Serialized as a plain string so the wire shape stays `identity: text`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}
