// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server identity types.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Client-chosen unique server id.
///
/// Unlike job ids these are never generated — the creating client picks
/// them, so this is a plain newtype with no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(pub SmolStr);

impl ServerId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        ServerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        ServerId::new(s)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        ServerId::new(s)
    }
}

impl std::borrow::Borrow<str> for ServerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifies a server to clients: its id plus the immutable type id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHandle {
    pub id: ServerId,
    pub type_id: String,
}

impl ServerHandle {
    pub fn new(id: impl Into<ServerId>, type_id: impl Into<String>) -> Self {
        ServerHandle { id: id.into(), type_id: type_id.into() }
    }
}
