// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use steward_core::{JobId, ServerId};

use super::types::{
    DownloadSingleRuntimeRequest, LaunchParameters, PublishParameters, ServerActionRequest,
    ServerAttributes, StopParameters,
};

/// Request from a client to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// List the registered server types
    GetServerTypes,

    /// Create a managed server, validated by its server type
    CreateServer { attrs: ServerAttributes },

    /// Delete a managed server
    DeleteServer { id: ServerId },

    /// List handles of all managed servers
    GetServerHandles,

    /// Get the state snapshot of one server
    GetServerState { id: ServerId },

    /// Start a server; returns an acknowledgement, real work runs as a job
    StartServerAsync { params: LaunchParameters },

    /// Stop a server; returns an acknowledgement, real work runs as a job
    StopServerAsync { params: StopParameters },

    /// Publish deployables against a started server
    PublishServer { params: PublishParameters },

    /// List the actions a server's type offers
    ListServerActions { id: ServerId },

    /// Execute one step of a server action workflow
    ExecuteServerAction { request: ServerActionRequest },

    /// Snapshot of the live job set
    GetJobs,

    /// Request cooperative cancellation of a job
    CancelJob { id: JobId },

    /// List runtimes available for download
    ListDownloadableRuntimes,

    /// One step of the download-runtime license workflow
    DownloadRuntime { request: DownloadSingleRuntimeRequest },

    /// Switch this connection to the out-of-band event stream
    Subscribe,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
