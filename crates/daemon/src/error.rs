// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! Every variant is recovered at the component boundary and surfaced to the
//! client as a [`Status`]-bearing response; no error crosses the protocol
//! boundary as an unhandled fault. Messages are stable — clients and tests
//! match on them.

use steward_core::{ServerId, Status, TransitionKind};
use steward_launch::LaunchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Server id cannot be null")]
    MissingServerId,

    #[error("Server {0} does not exist")]
    ServerNotFound(ServerId),

    #[error("Server {0} already exists")]
    ServerExists(ServerId),

    #[error("Server type {0} not found")]
    ServerTypeNotFound(String),

    #[error("Server {id}: {op} already in progress")]
    TransitionInProgress { id: ServerId, op: TransitionKind },

    /// Operation not legal in the server's current state.
    #[error("{0}")]
    Precondition(String),

    /// Missing or invalid request fields.
    #[error("{0}")]
    Validation(String),

    #[error("Action {0} not found")]
    ActionNotFound(String),

    #[error("No answer from client after {0} attempts")]
    PromptUnanswered(u32),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl ModelError {
    /// Surface this error as an ERROR status at the component boundary.
    pub fn into_status(self) -> Status {
        Status::error(self.to_string())
    }
}
