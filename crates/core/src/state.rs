// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server lifecycle states and poll directions.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a managed server. Serializes as its fixed wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ServerState {
    Unknown,
    Starting,
    Started,
    Stopping,
    Stopped,
}

impl From<ServerState> for i32 {
    fn from(state: ServerState) -> i32 {
        state.code()
    }
}

impl TryFrom<i32> for ServerState {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        ServerState::from_code(code).ok_or_else(|| format!("invalid server state code {code}"))
    }
}

impl ServerState {
    /// Fixed wire code (0=unknown .. 4=stopped).
    pub fn code(self) -> i32 {
        match self {
            ServerState::Unknown => 0,
            ServerState::Starting => 1,
            ServerState::Started => 2,
            ServerState::Stopping => 3,
            ServerState::Stopped => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ServerState::Unknown),
            1 => Some(ServerState::Starting),
            2 => Some(ServerState::Started),
            3 => Some(ServerState::Stopping),
            4 => Some(ServerState::Stopped),
            _ => None,
        }
    }

    /// A server may carry a launch mode only outside STOPPED/UNKNOWN.
    pub fn allows_mode(self) -> bool {
        !matches!(self, ServerState::Stopped | ServerState::Unknown)
    }
}

crate::simple_display! {
    ServerState {
        Unknown => "unknown",
        Starting => "starting",
        Started => "started",
        Stopping => "stopping",
        Stopped => "stopped",
    }
}

/// Direction a poller drives toward, and the result it reports.
///
/// A poll never produces a third value: timing out resolves to the
/// opposite of the requested direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Up,
    Down,
}

impl Availability {
    pub fn opposite(self) -> Self {
        match self {
            Availability::Up => Availability::Down,
            Availability::Down => Availability::Up,
        }
    }
}

crate::simple_display! {
    Availability {
        Up => "up",
        Down => "down",
    }
}

/// The kind of lifecycle transition currently in flight for a server.
///
/// At most one transition runs per server; a second start/stop request is
/// rejected while one of these is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Start,
    Stop,
}

crate::simple_display! {
    TransitionKind {
        Start => "start",
        Stop => "stop",
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
