// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the IPC protocol.

use serde::{Deserialize, Serialize};
use steward_core::{
    Attributes, DeployableState, JobId, PublishKind, RequestId, ServerId, ServerState, Status,
    WorkflowData, WorkflowResponse,
};

/// Descriptor of one registered server type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTypeDescription {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Parameters for creating a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAttributes {
    pub id: ServerId,
    pub server_type: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

/// Parameters for starting a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    pub id: ServerId,
    /// Launch mode, e.g. "run" or "debug".
    pub mode: String,
}

/// Parameters for stopping a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopParameters {
    pub id: ServerId,
    #[serde(default)]
    pub force: bool,
}

/// Parameters for a publish request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishParameters {
    pub id: ServerId,
    pub kind: PublishKind,
}

/// The command line a server was (or would be) launched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLineDetails {
    pub cmd_line: Vec<String>,
    pub working_dir: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
}

/// Acknowledgement of an async start request.
///
/// The status reflects only request acceptance; the final outcome arrives
/// as a `ServerStateChanged` event once the start job resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartServerResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<CommandLineDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// Acknowledgement of an async stop request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopServerResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// Acknowledgement of an async publish request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishServerResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

/// Full state snapshot of one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStateSnapshot {
    pub state: ServerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployables: Vec<DeployableState>,
}

/// Request to execute a (possibly multi-step) server action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerActionRequest {
    pub server_id: ServerId,
    pub action_id: String,
    #[serde(default)]
    pub data: WorkflowData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

/// One action a server offers, with its initial workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerActionWorkflow {
    pub action_id: String,
    pub action_label: String,
    pub workflow: WorkflowResponse,
}

/// Response to `listServerActions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListServerActionsResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflows: Vec<ServerActionWorkflow>,
}

/// Descriptor of a runtime available for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRuntimeDescription {
    pub id: String,
    pub name: String,
    pub version: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_url: Option<String>,
    /// Download size if known, "?" otherwise.
    #[serde(default)]
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_method: Option<String>,
}

/// Request to download one runtime (a multi-step license workflow).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadSingleRuntimeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_id: Option<String>,
    #[serde(default)]
    pub data: WorkflowData,
}
