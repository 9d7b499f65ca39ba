// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-server publish state tracking.
//!
//! The tracker never copies files — artifact transfer belongs to the server
//! delegate. It records only the resulting state per deployable reference
//! and recomputes it from publish-kind requests and handler outcomes.

use std::collections::HashMap;

use steward_core::{
    DeployableReference, DeployableState, PublishKind, PublishState, ServerState, Status,
};

/// Per-deployable-reference publish state for one server.
#[derive(Default)]
pub struct ServerPublishModel {
    states: HashMap<String, DeployableState>,
}

impl ServerPublishModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployable. Its state is ADD until the first successful
    /// publish.
    pub fn add_deployable(&mut self, reference: DeployableReference) -> Status {
        if self.states.contains_key(&reference.path) {
            return Status::error(format!("Deployable {} already exists", reference.path));
        }
        self.states.insert(
            reference.path.clone(),
            DeployableState {
                reference,
                publish_state: PublishState::Add,
                run_state: ServerState::Unknown,
            },
        );
        Status::ok()
    }

    /// Mark a deployable for removal. It leaves the tracker on the next
    /// successful publish.
    pub fn remove_deployable(&mut self, reference: &DeployableReference) -> Status {
        match self.states.get_mut(&reference.path) {
            Some(state) => {
                state.publish_state = PublishState::Remove;
                Status::ok()
            }
            None => Status::error(format!("Deployable {} does not exist", reference.path)),
        }
    }

    /// Current state of a reference; UNKNOWN for one never seen.
    pub fn state_of(&self, path: &str) -> PublishState {
        self.states.get(path).map(|s| s.publish_state).unwrap_or(PublishState::Unknown)
    }

    pub fn deployable_states(&self) -> Vec<DeployableState> {
        self.states.values().cloned().collect()
    }

    /// Mark a reference as needing a publish of the given kind (e.g. after
    /// its content changed on disk). Pending ADD/REMOVE markers win.
    pub fn mark_changed(&mut self, path: &str, kind: PublishKind) {
        if let Some(state) = self.states.get_mut(path) {
            if !state.publish_state.is_pending() {
                state.publish_state = match kind {
                    PublishKind::Incremental | PublishKind::Auto => PublishState::Incremental,
                    PublishKind::Full | PublishKind::Clean => PublishState::Full,
                };
            }
        }
    }

    /// Record the outcome of one deployable's publish and return its new
    /// state. A successful REMOVE drops the reference entirely; any other
    /// successful publish leaves the reference up to date (NONE) — never
    /// ADD/REMOVE. A failed publish leaves the previous state in place so
    /// stuck markers stay visible.
    pub fn publish_deployable(
        &mut self,
        reference: &DeployableReference,
        outcome: &Status,
    ) -> PublishState {
        let current = self.state_of(&reference.path);
        if !outcome.is_ok() {
            return current;
        }
        if current == PublishState::Remove {
            self.states.remove(&reference.path);
            return PublishState::Unknown;
        }
        match self.states.get_mut(&reference.path) {
            Some(state) => {
                state.publish_state = PublishState::None;
                state.run_state = ServerState::Started;
                PublishState::None
            }
            None => PublishState::Unknown,
        }
    }

    /// References still carrying ADD/REMOVE after a publish pass — evidence
    /// of a failed or partial publish.
    pub fn stuck_references(&self) -> Vec<&DeployableState> {
        self.states.values().filter(|s| s.publish_state.is_pending()).collect()
    }
}

/// Resolve the kind the handler should actually perform for one deployable.
///
/// AUTO publishes incrementally except for references that have never been
/// published; CLEAN is always a full publish.
pub fn resolve_kind(requested: PublishKind, current: PublishState) -> PublishKind {
    match requested {
        PublishKind::Auto => match current {
            PublishState::Unknown | PublishState::Add | PublishState::Full => PublishKind::Full,
            _ => PublishKind::Incremental,
        },
        PublishKind::Clean => PublishKind::Full,
        other => other,
    }
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
