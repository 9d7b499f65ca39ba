// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server registry and model.
//!
//! The model owns every managed server together with the delegate its type
//! produced for it. Servers are long-lived — they survive crashes of the
//! processes they manage and disappear only on explicit delete.

mod delegate;
mod lifecycle;
mod server;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use steward_core::{DeployableReference, ServerHandle, ServerId, Status, WorkflowResponse};
use steward_wire::{
    ListServerActionsResponse, ServerActionRequest, ServerAttributes, ServerStateSnapshot,
};
use tracing::info;

pub use delegate::{DelegateFactory, ServerDelegate, ServerTypeDescriptor};
pub use server::{Server, ServerContext};

use super::actions::ActionContext;
use super::jobs::JobManager;
use super::notify::ClientNotifier;
use crate::error::ModelError;

/// A server plus the delegate its type built for it.
#[derive(Clone)]
pub struct ManagedServer {
    pub server: Arc<Server>,
    pub delegate: Arc<dyn ServerDelegate>,
}

struct RegisteredType {
    descriptor: ServerTypeDescriptor,
    factory: DelegateFactory,
}

/// Registry of server types and live servers.
pub struct ServerModel {
    types: Mutex<HashMap<String, RegisteredType>>,
    servers: Mutex<HashMap<ServerId, ManagedServer>>,
    jobs: Arc<JobManager>,
    notifier: Arc<dyn ClientNotifier>,
}

impl ServerModel {
    pub fn new(jobs: Arc<JobManager>, notifier: Arc<dyn ClientNotifier>) -> Arc<Self> {
        Arc::new(ServerModel {
            types: Mutex::new(HashMap::new()),
            servers: Mutex::new(HashMap::new()),
            jobs,
            notifier,
        })
    }

    pub fn register_server_type(&self, descriptor: ServerTypeDescriptor, factory: DelegateFactory) {
        self.types.lock().insert(descriptor.id.clone(), RegisteredType { descriptor, factory });
    }

    pub fn server_types(&self) -> Vec<ServerTypeDescriptor> {
        self.types.lock().values().map(|t| t.descriptor.clone()).collect()
    }

    /// Create a server after the owning type validated it.
    pub fn create_server(&self, attrs: ServerAttributes) -> Result<ServerHandle, ModelError> {
        if attrs.id.is_empty() {
            return Err(ModelError::MissingServerId);
        }
        if self.servers.lock().contains_key(&attrs.id) {
            return Err(ModelError::ServerExists(attrs.id));
        }
        let factory = {
            let types = self.types.lock();
            match types.get(&attrs.server_type) {
                Some(registered) => Arc::clone(&registered.factory),
                None => return Err(ModelError::ServerTypeNotFound(attrs.server_type)),
            }
        };

        let handle = ServerHandle::new(attrs.id.clone(), attrs.server_type.clone());
        let delegate = factory(&handle);

        let mut attributes = attrs.attributes;
        delegate.set_defaults(&mut attributes);
        let validation = delegate.validate(&attributes);
        if !validation.is_ok() {
            return Err(ModelError::Validation(validation.message));
        }

        let server =
            Server::new(attrs.id.clone(), attrs.server_type, attributes, delegate.initial_state());
        self.servers.lock().insert(attrs.id, ManagedServer { server, delegate });
        info!(server = %handle.id, server_type = %handle.type_id, "server created");
        self.notifier.server_added(&handle);
        Ok(handle)
    }

    /// Explicitly delete a server. The managed process, if any, is left
    /// running — deletion removes management, it does not stop anything.
    pub fn delete_server(&self, id: &ServerId) -> Result<(), ModelError> {
        let removed = self.servers.lock().remove(id);
        match removed {
            Some(managed) => {
                info!(server = %id, "server deleted");
                self.notifier.server_removed(&managed.server.handle());
                Ok(())
            }
            None => Err(ModelError::ServerNotFound(id.clone())),
        }
    }

    pub fn get(&self, id: &ServerId) -> Result<ManagedServer, ModelError> {
        if id.is_empty() {
            return Err(ModelError::MissingServerId);
        }
        self.servers
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| ModelError::ServerNotFound(id.clone()))
    }

    pub fn handles(&self) -> Vec<ServerHandle> {
        self.servers.lock().values().map(|m| m.server.handle()).collect()
    }

    pub fn server_state(&self, id: &ServerId) -> Result<ServerStateSnapshot, ModelError> {
        Ok(self.get(id)?.server.snapshot())
    }

    /// Register a deployable against a server (publish state ADD).
    pub fn add_deployable(&self, id: &ServerId, reference: DeployableReference) -> Status {
        match self.get(id) {
            Ok(managed) => {
                let status = managed.server.lock().publish.add_deployable(reference);
                if status.is_ok() {
                    self.notify_state(&managed.server);
                }
                status
            }
            Err(err) => err.into_status(),
        }
    }

    /// Mark a deployable for removal (publish state REMOVE).
    pub fn remove_deployable(&self, id: &ServerId, reference: &DeployableReference) -> Status {
        match self.get(id) {
            Ok(managed) => {
                let status = managed.server.lock().publish.remove_deployable(reference);
                if status.is_ok() {
                    self.notify_state(&managed.server);
                }
                status
            }
            Err(err) => err.into_status(),
        }
    }

    /// List the actions a server's type offers. Available in any state.
    pub fn list_server_actions(&self, id: &ServerId) -> ListServerActionsResponse {
        match self.get(id) {
            Ok(managed) => {
                let ctx = action_context(&managed);
                ListServerActionsResponse {
                    status: Status::ok(),
                    workflows: managed.delegate.actions().list(&ctx),
                }
            }
            Err(err) => {
                ListServerActionsResponse { status: err.into_status(), workflows: Vec::new() }
            }
        }
    }

    /// Execute one step of a server action workflow. Available in any state.
    pub fn execute_server_action(&self, request: &ServerActionRequest) -> WorkflowResponse {
        let managed = match self.get(&request.server_id) {
            Ok(managed) => managed,
            Err(err) => return WorkflowResponse::error(err.to_string()),
        };
        let ctx = action_context(&managed);
        managed.delegate.execute_action(&ctx, request)
    }

    pub(crate) fn jobs(&self) -> &Arc<JobManager> {
        &self.jobs
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn ClientNotifier> {
        &self.notifier
    }

    pub(crate) fn notify_state(&self, server: &Arc<Server>) {
        notify_server(server, self.notifier.as_ref());
    }
}

fn action_context(managed: &ManagedServer) -> ActionContext {
    let inner = managed.server.lock();
    ActionContext {
        handle: managed.server.handle(),
        attributes: inner.attributes.clone(),
        deployables: inner.publish.deployable_states(),
    }
}

pub(crate) fn notify_server(server: &Arc<Server>, notifier: &dyn ClientNotifier) {
    let snapshot = server.snapshot();
    notifier.server_state_changed(&server.handle(), &snapshot);
}
