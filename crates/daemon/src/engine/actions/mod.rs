// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server action handlers.
//!
//! An action is a named, possibly multi-step workflow a server type offers
//! its clients. Handlers must be safe to call repeatedly with
//! partially-filled data and answer identically given identical data —
//! each call recomputes which prompts are still unanswered by inspecting
//! the data bag, never by remembering where it was.

mod edit_config;
mod show_in_browser;

use std::sync::Arc;

use steward_core::{Attributes, DeployableState, ServerHandle, WorkflowResponse};
use steward_wire::{ServerActionRequest, ServerActionWorkflow};

pub use edit_config::{EditConfigAction, ATTR_CONFIG_FILE, EDIT_CONFIG_ACTION_ID};
pub use show_in_browser::{ShowInBrowserAction, ATTR_BASE_URL, SHOW_IN_BROWSER_ACTION_ID};

/// Read-only snapshot of the server an action runs against.
pub struct ActionContext {
    pub handle: ServerHandle,
    pub attributes: Attributes,
    pub deployables: Vec<DeployableState>,
}

/// One action a server type offers.
pub trait ActionHandler: Send + Sync {
    fn id(&self) -> &'static str;
    fn label(&self) -> &'static str;

    /// The workflow shown when actions are listed (usually the first
    /// prompt, so clients can render it without a round trip).
    fn initial_workflow(&self, ctx: &ActionContext) -> ServerActionWorkflow;

    /// Execute one step given the data accumulated so far.
    fn handle(&self, ctx: &ActionContext, request: &ServerActionRequest) -> WorkflowResponse;
}

/// Lookup table of a server type's actions.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: Vec<Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in generic actions.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ShowInBrowserAction));
        registry.register(Arc::new(EditConfigAction));
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        self.handlers.push(handler);
    }

    pub fn list(&self, ctx: &ActionContext) -> Vec<ServerActionWorkflow> {
        self.handlers.iter().map(|h| h.initial_workflow(ctx)).collect()
    }

    pub fn find(&self, action_id: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.iter().find(|h| h.id() == action_id).cloned()
    }
}
