// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol for daemon communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod event;
mod framing;
mod request;
mod response;
mod types;

pub use event::{Event, STREAM_TYPE_OTHER, STREAM_TYPE_SYSERR, STREAM_TYPE_SYSOUT};
pub use framing::{decode, encode, read_message, write_message, ProtocolError, MAX_FRAME_SIZE};
pub use request::Request;
pub use response::Response;
pub use types::{
    CommandLineDetails, DownloadRuntimeDescription, DownloadSingleRuntimeRequest,
    LaunchParameters, ListServerActionsResponse, PublishParameters, PublishServerResponse,
    ServerActionRequest, ServerActionWorkflow, ServerAttributes, ServerStateSnapshot,
    ServerTypeDescription, StartServerResponse, StopParameters, StopServerResponse,
};

#[cfg(test)]
mod property_tests;
