// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish kinds, per-deployable publish states, and deployable references.

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::state::ServerState;

/// What a caller asked a publish operation to do. Serializes as its fixed
/// wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PublishKind {
    Incremental,
    Full,
    Clean,
    Auto,
}

impl From<PublishKind> for i32 {
    fn from(kind: PublishKind) -> i32 {
        kind.code()
    }
}

impl TryFrom<i32> for PublishKind {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        PublishKind::from_code(code).ok_or_else(|| format!("invalid publish kind code {code}"))
    }
}

impl PublishKind {
    pub fn code(self) -> i32 {
        match self {
            PublishKind::Incremental => 1,
            PublishKind::Full => 2,
            PublishKind::Clean => 3,
            PublishKind::Auto => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(PublishKind::Incremental),
            2 => Some(PublishKind::Full),
            3 => Some(PublishKind::Clean),
            4 => Some(PublishKind::Auto),
            _ => None,
        }
    }
}

crate::simple_display! {
    PublishKind {
        Incremental => "incremental",
        Full => "full",
        Clean => "clean",
        Auto => "auto",
    }
}

/// The recorded publish state of one deployable reference. Serializes as
/// its fixed wire code.
///
/// ADD/REMOVE precede a deployable's first successful publish or its
/// removal; NONE means up to date; UNKNOWN is the default for a reference
/// the tracker has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PublishState {
    None,
    Incremental,
    Full,
    Add,
    Remove,
    Unknown,
}

impl From<PublishState> for i32 {
    fn from(state: PublishState) -> i32 {
        state.code()
    }
}

impl TryFrom<i32> for PublishState {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        PublishState::from_code(code).ok_or_else(|| format!("invalid publish state code {code}"))
    }
}

impl PublishState {
    pub fn code(self) -> i32 {
        match self {
            PublishState::None => 1,
            PublishState::Incremental => 2,
            PublishState::Full => 3,
            PublishState::Add => 4,
            PublishState::Remove => 5,
            PublishState::Unknown => 6,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(PublishState::None),
            2 => Some(PublishState::Incremental),
            3 => Some(PublishState::Full),
            4 => Some(PublishState::Add),
            5 => Some(PublishState::Remove),
            6 => Some(PublishState::Unknown),
            _ => None,
        }
    }

    /// ADD/REMOVE left behind after a publish signal a failed or partial
    /// publish and must be surfaced.
    pub fn is_pending(self) -> bool {
        matches!(self, PublishState::Add | PublishState::Remove)
    }
}

crate::simple_display! {
    PublishState {
        None => "none",
        Incremental => "incremental",
        Full => "full",
        Add => "add",
        Remove => "remove",
        Unknown => "unknown",
    }
}

/// Identifies one unit of deployable content: a path plus an options bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployableReference {
    pub label: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub options: Attributes,
}

impl DeployableReference {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        DeployableReference { label: label.into(), path: path.into(), options: Attributes::new() }
    }

    /// Output name override from the options bag, else the final path segment.
    pub fn output_name(&self) -> &str {
        if let Some(name) = self.options.get_string(crate::workflow::DEPLOYMENT_OPTION_OUTPUT_NAME)
        {
            return name;
        }
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Snapshot of one deployable's publish and run state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployableState {
    pub reference: DeployableReference,
    pub publish_state: PublishState,
    pub run_state: ServerState,
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
