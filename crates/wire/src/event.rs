// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-band notifications pushed to subscribed clients.

use serde::{Deserialize, Serialize};
use steward_core::{JobProgress, ServerHandle, Status};

use super::types::ServerStateSnapshot;

/// Output stream codes for process output events.
pub const STREAM_TYPE_SYSERR: i32 = 1;
pub const STREAM_TYPE_SYSOUT: i32 = 2;
pub const STREAM_TYPE_OTHER: i32 = 3;

/// Event pushed to clients on the subscription stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    /// A server was created
    ServerAdded { handle: ServerHandle },

    /// A server was deleted
    ServerRemoved { handle: ServerHandle },

    /// A server's lifecycle state changed
    ServerStateChanged { handle: ServerHandle, state: ServerStateSnapshot },

    /// The daemon launched a process for a server
    ServerProcessCreated { handle: ServerHandle, process_id: String },

    /// A launched process exited
    ServerProcessTerminated { handle: ServerHandle, process_id: String },

    /// A launched process wrote output
    ServerProcessOutput { handle: ServerHandle, process_id: String, stream_type: i32, text: String },

    /// A job entered the live set
    JobAdded { job: JobProgress },

    /// A job reported progress
    JobChanged { job: JobProgress },

    /// A job left the live set with its final status
    JobRemoved { job: JobProgress, status: Status },
}
