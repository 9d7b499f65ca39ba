// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The server-type capability contract.
//!
//! One [`ServerDelegate`] implementation exists per server type, selected
//! through a type-id lookup table — no inheritance chain. The generic
//! lifecycle machinery calls into it for everything type-specific:
//! validation, launch command, pollers, shutdown, actions, publishing.

use std::sync::Arc;

use async_trait::async_trait;
use steward_core::{
    Attributes, Availability, DeployableReference, PublishKind, ServerHandle, ServerState, Status,
    WorkflowResponse,
};
use steward_launch::{CommandDetails, LaunchedProcess};
use steward_wire::ServerActionRequest;

use crate::engine::actions::{ActionContext, ActionRegistry};
use crate::engine::poller::PollerSpec;
use crate::error::ModelError;

/// Immutable descriptor of one server type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTypeDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl ServerTypeDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ServerTypeDescriptor { id: id.into(), name: name.into(), description: description.into() }
    }
}

/// Creates the delegate for a newly created server of this type.
pub type DelegateFactory = Arc<dyn Fn(&ServerHandle) -> Arc<dyn ServerDelegate> + Send + Sync>;

#[async_trait]
pub trait ServerDelegate: Send + Sync {
    /// Validate a candidate server's attributes before creation.
    fn validate(&self, _attributes: &Attributes) -> Status {
        Status::ok()
    }

    /// Fill attribute defaults at create time.
    fn set_defaults(&self, _attributes: &mut Attributes) {}

    /// Lifecycle state a freshly created server starts in.
    fn initial_state(&self) -> ServerState {
        ServerState::Stopped
    }

    /// Type-specific start preconditions beyond the state check.
    fn can_start(&self, _mode: &str, _attributes: &Attributes) -> Status {
        Status::ok()
    }

    /// The command line this server starts with.
    fn start_command(
        &self,
        _mode: &str,
        _attributes: &Attributes,
    ) -> Result<CommandDetails, ModelError> {
        Err(ModelError::Validation("Server type does not define a start command".to_string()))
    }

    /// Launch the external process. `None` means the type manages no
    /// process of its own (state is learned purely through polling).
    async fn launch(
        &self,
        mode: &str,
        attributes: &Attributes,
    ) -> Result<Option<LaunchedProcess>, ModelError> {
        let details = self.start_command(mode, attributes)?;
        Ok(Some(LaunchedProcess::spawn(details)?))
    }

    /// Poller used to detect the given readiness direction.
    fn poller(&self, _direction: Availability, _attributes: &Attributes) -> PollerSpec {
        PollerSpec::automatic_success()
    }

    /// Graceful shutdown. The default asks the tracked process to
    /// terminate; types with a shutdown command override this.
    async fn stop(
        &self,
        process: Option<&LaunchedProcess>,
        force: bool,
        _attributes: &Attributes,
    ) -> Result<(), ModelError> {
        match process {
            Some(process) if force => Ok(process.kill()?),
            Some(process) => Ok(process.terminate()?),
            None => Ok(()),
        }
    }

    /// State to resolve to when the tracked process exits on its own.
    /// Must return STARTED or STOPPED; anything else is treated as STOPPED.
    fn on_process_terminated(&self, _observed: ServerState) -> ServerState {
        ServerState::Stopped
    }

    /// The actions this type offers.
    fn actions(&self) -> ActionRegistry {
        ActionRegistry::new()
    }

    /// Execute one step of an action workflow.
    fn execute_action(&self, ctx: &ActionContext, request: &ServerActionRequest) -> WorkflowResponse {
        match self.actions().find(&request.action_id) {
            Some(handler) => handler.handle(ctx, request),
            None => WorkflowResponse::error(
                ModelError::ActionNotFound(request.action_id.clone()).to_string(),
            ),
        }
    }

    /// Type-specific publish precondition.
    fn can_publish(&self) -> Status {
        Status::ok()
    }

    /// Called once before a publish pass.
    async fn publish_start(&self, _kind: PublishKind) -> Status {
        Status::ok()
    }

    /// Transfer one deployable's artifacts. The tracker records only the
    /// outcome; the transfer itself is entirely the delegate's.
    async fn publish_deployable(
        &self,
        _reference: &DeployableReference,
        _kind: PublishKind,
    ) -> Status {
        Status::ok()
    }

    /// Called once after a publish pass.
    async fn publish_finish(&self, _kind: PublishKind) -> Status {
        Status::ok()
    }
}
