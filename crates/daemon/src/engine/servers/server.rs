// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One managed server's mutable state.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use steward_core::{Attributes, ServerHandle, ServerId, ServerState, TransitionKind};
use steward_launch::LaunchedProcess;
use steward_wire::ServerStateSnapshot;
use tokio_util::sync::CancellationToken;

use crate::engine::publish::ServerPublishModel;

/// Strongly-typed per-server context shared between the start job and
/// later stop/terminate logic. The presence of `process` itself encodes
/// "something is running".
#[derive(Default)]
pub struct ServerContext {
    pub process: Option<Arc<LaunchedProcess>>,
}

pub(crate) struct ServerInner {
    pub attributes: Attributes,
    pub state: ServerState,
    /// Launch mode; non-None only outside STOPPED/UNKNOWN.
    pub mode: Option<String>,
    /// At most one lifecycle transition runs per server.
    pub in_flight: Option<TransitionKind>,
    /// Cancels the in-flight transition's poller (e.g. on process exit).
    pub transition_cancel: Option<CancellationToken>,
    pub context: ServerContext,
    pub publish: ServerPublishModel,
}

pub struct Server {
    id: ServerId,
    type_id: String,
    inner: Mutex<ServerInner>,
    /// Serializes publish passes for this server.
    publish_gate: tokio::sync::Mutex<()>,
}

impl Server {
    pub(crate) fn new(
        id: ServerId,
        type_id: String,
        attributes: Attributes,
        initial_state: ServerState,
    ) -> Arc<Self> {
        Arc::new(Server {
            id,
            type_id,
            inner: Mutex::new(ServerInner {
                attributes,
                state: initial_state,
                mode: None,
                in_flight: None,
                transition_cancel: None,
                context: ServerContext::default(),
                publish: ServerPublishModel::new(),
            }),
            publish_gate: tokio::sync::Mutex::new(()),
        })
    }

    pub fn id(&self) -> &ServerId {
        &self.id
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle::new(self.id.clone(), self.type_id.clone())
    }

    pub fn state(&self) -> ServerState {
        self.inner.lock().state
    }

    pub fn mode(&self) -> Option<String> {
        self.inner.lock().mode.clone()
    }

    pub fn attributes(&self) -> Attributes {
        self.inner.lock().attributes.clone()
    }

    pub fn has_process(&self) -> bool {
        self.inner.lock().context.process.is_some()
    }

    pub fn snapshot(&self) -> ServerStateSnapshot {
        let inner = self.inner.lock();
        ServerStateSnapshot {
            state: inner.state,
            mode: inner.mode.clone(),
            deployables: inner.publish.deployable_states(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ServerInner> {
        self.inner.lock()
    }

    pub(crate) fn publish_gate(&self) -> &tokio::sync::Mutex<()> {
        &self.publish_gate
    }
}
