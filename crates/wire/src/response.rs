// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use steward_core::{JobProgress, ServerHandle, Status, WorkflowResponse};

use super::types::{
    DownloadRuntimeDescription, ListServerActionsResponse, PublishServerResponse,
    ServerStateSnapshot, ServerTypeDescription, StartServerResponse, StopServerResponse,
};

/// Response from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Uniform status-bearing result
    Status { status: Status },

    /// Registered server types
    ServerTypes { types: Vec<ServerTypeDescription> },

    /// All managed server handles
    ServerHandles { handles: Vec<ServerHandle> },

    /// State snapshot of one server
    ServerState { state: ServerStateSnapshot },

    /// Start acknowledgement
    StartServer { response: StartServerResponse },

    /// Stop acknowledgement
    StopServer { response: StopServerResponse },

    /// Publish acknowledgement
    PublishServer { response: PublishServerResponse },

    /// Actions offered by a server
    ServerActions { response: ListServerActionsResponse },

    /// One step of a workflow exchange
    Workflow { response: WorkflowResponse },

    /// Live job set
    Jobs { jobs: Vec<JobProgress> },

    /// Downloadable runtime descriptors
    Runtimes { runtimes: Vec<DownloadRuntimeDescription> },

    /// Connection switched to the event stream
    Subscribed,

    /// Daemon is shutting down
    ShuttingDown,

    /// Request could not be handled
    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
