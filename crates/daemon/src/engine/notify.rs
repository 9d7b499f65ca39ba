// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client notification and remote prompt channels.
//!
//! The engine pushes server/job events toward connected clients through
//! [`ClientNotifier`]; the broadcast-backed [`EventNotifier`] is the daemon's
//! production implementation, fanned out to subscribed connections by the
//! listener. [`RemotePrompt`] is the reverse channel: a handler running
//! inside a job may ask the connected client a question and await the
//! answer with a bounded number of attempts.

use std::sync::Arc;

use async_trait::async_trait;
use steward_core::{JobProgress, ServerHandle, Status};
use steward_wire::{Event, ServerStateSnapshot};
use tokio::sync::broadcast;
use tracing::debug;

use super::jobs::JobListener;
use crate::error::ModelError;

/// Push channel toward connected clients. Implementations must not block.
pub trait ClientNotifier: Send + Sync {
    fn server_added(&self, _handle: &ServerHandle) {}
    fn server_removed(&self, _handle: &ServerHandle) {}
    fn server_state_changed(&self, _handle: &ServerHandle, _state: &ServerStateSnapshot) {}
    fn process_created(&self, _handle: &ServerHandle, _process_id: &str) {}
    fn process_terminated(&self, _handle: &ServerHandle, _process_id: &str) {}
    fn process_output(
        &self,
        _handle: &ServerHandle,
        _process_id: &str,
        _stream_type: i32,
        _text: &str,
    ) {
    }
}

/// Broadcasts wire events to every subscribed connection.
pub struct EventNotifier {
    tx: broadcast::Sender<Event>,
}

impl EventNotifier {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(256);
        Arc::new(EventNotifier { tx })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    fn send(&self, event: Event) {
        // Lagging or absent subscribers are fine; events are advisory.
        let _ = self.tx.send(event);
    }
}

impl ClientNotifier for EventNotifier {
    fn server_added(&self, handle: &ServerHandle) {
        self.send(Event::ServerAdded { handle: handle.clone() });
    }

    fn server_removed(&self, handle: &ServerHandle) {
        self.send(Event::ServerRemoved { handle: handle.clone() });
    }

    fn server_state_changed(&self, handle: &ServerHandle, state: &ServerStateSnapshot) {
        debug!(server = %handle.id, state = %state.state, "server state changed");
        self.send(Event::ServerStateChanged { handle: handle.clone(), state: state.clone() });
    }

    fn process_created(&self, handle: &ServerHandle, process_id: &str) {
        self.send(Event::ServerProcessCreated {
            handle: handle.clone(),
            process_id: process_id.to_string(),
        });
    }

    fn process_terminated(&self, handle: &ServerHandle, process_id: &str) {
        self.send(Event::ServerProcessTerminated {
            handle: handle.clone(),
            process_id: process_id.to_string(),
        });
    }

    fn process_output(&self, handle: &ServerHandle, process_id: &str, stream_type: i32, text: &str) {
        self.send(Event::ServerProcessOutput {
            handle: handle.clone(),
            process_id: process_id.to_string(),
            stream_type,
            text: text.to_string(),
        });
    }
}

impl JobListener for EventNotifier {
    fn job_added(&self, job: &JobProgress) {
        self.send(Event::JobAdded { job: job.clone() });
    }

    fn job_changed(&self, job: &JobProgress) {
        self.send(Event::JobChanged { job: job.clone() });
    }

    fn job_removed(&self, job: &JobProgress, status: &Status) {
        self.send(Event::JobRemoved { job: job.clone(), status: status.clone() });
    }
}

/// Ask the connected client a question mid-operation.
///
/// Implementations bound their own wait; `None` means no answer arrived in
/// time. Handlers using this must run inside a job, never on the
/// protocol-dispatch thread.
#[async_trait]
pub trait RemotePrompt: Send + Sync {
    async fn ask(&self, question: &str, secret: bool) -> Option<String>;
}

/// Ask with a bounded retry count so an unanswering client cannot hang the
/// daemon.
pub async fn ask_with_retries(
    prompt: &dyn RemotePrompt,
    question: &str,
    secret: bool,
    attempts: u32,
) -> Result<String, ModelError> {
    for _ in 0..attempts {
        if let Some(answer) = prompt.ask(question, secret).await {
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }
    Err(ModelError::PromptUnanswered(attempts))
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
