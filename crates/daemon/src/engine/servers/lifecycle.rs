// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The server lifecycle state machine.
//!
//! Transitions are serialized per server: at most one start/stop is in
//! flight, and a second request is rejected with an explicit "already in
//! progress" error instead of racing the state field. The protocol thread
//! only validates and claims the transition; launching, polling, and the
//! final state flip all happen inside a scheduled job. Process exit is a
//! transition trigger of its own and always resolves to STARTED or
//! STOPPED, never an in-between state.

use std::sync::Arc;

use steward_core::{
    Availability, PublishKind, ServerState, Status, TransitionKind,
};
use steward_launch::ProcessEvent;
use steward_wire::{
    CommandLineDetails, LaunchParameters, PublishParameters, PublishServerResponse,
    StartServerResponse, StopParameters, StopServerResponse,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{notify_server, ManagedServer, Server, ServerDelegate, ServerModel};
use crate::engine::jobs::JobContext;
use crate::engine::notify::ClientNotifier;
use crate::engine::poller::{spawn_poll, PollOutcome};
use crate::engine::publish::resolve_kind;
use crate::error::ModelError;

impl ServerModel {
    /// Start a server. Returns an immediate acknowledgement; the launch,
    /// the UP poll, and the final transition run as a job.
    pub fn start_server(&self, params: &LaunchParameters) -> StartServerResponse {
        let managed = match self.get(&params.id) {
            Ok(managed) => managed,
            Err(err) => {
                return StartServerResponse { status: err.into_status(), details: None, job_id: None }
            }
        };
        let ManagedServer { server, delegate } = managed;
        let mode = params.mode.clone();
        let transition_cancel = CancellationToken::new();

        // Validate and claim the transition in one critical section.
        {
            let mut inner = server.lock();
            if let Some(op) = inner.in_flight {
                let err = ModelError::TransitionInProgress { id: params.id.clone(), op };
                return StartServerResponse { status: err.into_status(), details: None, job_id: None };
            }
            if !matches!(inner.state, ServerState::Stopped | ServerState::Unknown) {
                let err = ModelError::Precondition(format!(
                    "Server {} cannot be started while {}",
                    params.id, inner.state
                ));
                return StartServerResponse { status: err.into_status(), details: None, job_id: None };
            }
            let can = delegate.can_start(&mode, &inner.attributes);
            if !can.is_ok() {
                return StartServerResponse { status: can, details: None, job_id: None };
            }
            inner.in_flight = Some(TransitionKind::Start);
            inner.mode = Some(mode.clone());
            inner.state = ServerState::Starting;
            inner.transition_cancel = Some(transition_cancel.clone());
        }
        info!(server = %params.id, %mode, "start requested");
        self.notify_state(&server);

        let attributes = server.attributes();
        let details = delegate.start_command(&mode, &attributes).ok().map(|d| CommandLineDetails {
            cmd_line: d.cmd_line(),
            working_dir: d.working_dir.display().to_string(),
            env: d.env.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        });

        let notifier = Arc::clone(self.notifier());
        let job = self.jobs().schedule(format!("Start server: {}", server.id()), {
            let server = Arc::clone(&server);
            move |ctx| run_start_job(server, delegate, notifier, mode, transition_cancel, ctx)
        });

        StartServerResponse { status: Status::ok(), details, job_id: Some(job.id) }
    }

    /// Stop a server. A stop while already STOPPED is an OK no-op that
    /// invokes neither poller nor delegate.
    pub fn stop_server(&self, params: &StopParameters) -> StopServerResponse {
        let managed = match self.get(&params.id) {
            Ok(managed) => managed,
            Err(err) => return StopServerResponse { status: err.into_status(), job_id: None },
        };
        let ManagedServer { server, delegate } = managed;
        let transition_cancel = CancellationToken::new();

        {
            let mut inner = server.lock();
            if inner.state == ServerState::Stopped {
                return StopServerResponse { status: Status::ok(), job_id: None };
            }
            if let Some(op) = inner.in_flight {
                let err = ModelError::TransitionInProgress { id: params.id.clone(), op };
                return StopServerResponse { status: err.into_status(), job_id: None };
            }
            if inner.state == ServerState::Unknown {
                let err = ModelError::Precondition(format!(
                    "Server {} cannot be stopped while unknown",
                    params.id
                ));
                return StopServerResponse { status: err.into_status(), job_id: None };
            }
            inner.in_flight = Some(TransitionKind::Stop);
            inner.state = ServerState::Stopping;
            inner.transition_cancel = Some(transition_cancel.clone());
        }
        info!(server = %params.id, force = params.force, "stop requested");
        self.notify_state(&server);

        let notifier = Arc::clone(self.notifier());
        let force = params.force;
        let job = self.jobs().schedule(format!("Stop server: {}", server.id()), {
            let server = Arc::clone(&server);
            move |ctx| run_stop_job(server, delegate, notifier, force, transition_cancel, ctx)
        });

        StopServerResponse { status: Status::ok(), job_id: Some(job.id) }
    }

    /// Publish preconditions: only callable while STARTED.
    pub fn can_publish(&self, id: &steward_core::ServerId) -> Status {
        match self.get(id) {
            Ok(managed) => {
                if managed.server.state() != ServerState::Started {
                    return Status::error(format!("Server {id} must be started to publish"));
                }
                managed.delegate.can_publish()
            }
            Err(err) => err.into_status(),
        }
    }

    /// Publish against a started server. Returns an acknowledgement; the
    /// transfers run as a job.
    pub fn publish_server(&self, params: &PublishParameters) -> PublishServerResponse {
        let can = self.can_publish(&params.id);
        if !can.is_ok() {
            return PublishServerResponse { status: can, job_id: None };
        }
        // get() succeeded inside can_publish
        let Ok(ManagedServer { server, delegate }) = self.get(&params.id) else {
            return PublishServerResponse {
                status: ModelError::ServerNotFound(params.id.clone()).into_status(),
                job_id: None,
            };
        };

        let notifier = Arc::clone(self.notifier());
        let kind = params.kind;
        let job = self.jobs().schedule(format!("Publish server: {}", server.id()), {
            let server = Arc::clone(&server);
            move |ctx| run_publish_job(server, delegate, notifier, kind, ctx)
        });
        PublishServerResponse { status: Status::ok(), job_id: Some(job.id) }
    }
}

/// Merge two cancellation sources into one token.
fn linked_cancel(a: &CancellationToken, b: &CancellationToken) -> CancellationToken {
    let merged = CancellationToken::new();
    let out = merged.clone();
    let a = a.clone();
    let b = b.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = a.cancelled() => {}
            _ = b.cancelled() => {}
        }
        out.cancel();
    });
    merged
}

async fn run_start_job(
    server: Arc<Server>,
    delegate: Arc<dyn ServerDelegate>,
    notifier: Arc<dyn ClientNotifier>,
    mode: String,
    transition_cancel: CancellationToken,
    ctx: JobContext,
) -> Status {
    let attributes = server.attributes();

    let process = match delegate.launch(&mode, &attributes).await {
        Ok(process) => process,
        Err(err) => {
            warn!(server = %server.id(), %err, "launch failed");
            // Terminate anything partially started, then roll back.
            let changed = {
                let mut inner = server.lock();
                if inner.in_flight != Some(TransitionKind::Start) {
                    false
                } else {
                    if let Some(process) = inner.context.process.take() {
                        let _ = process.kill();
                    }
                    if let Some(token) = inner.transition_cancel.take() {
                        token.cancel();
                    }
                    inner.state = ServerState::Stopped;
                    inner.mode = None;
                    inner.in_flight = None;
                    true
                }
            };
            if changed {
                notify_server(&server, notifier.as_ref());
            }
            return Status::error(format!("Server {} failed to start: {err}", server.id()));
        }
    };

    if let Some(process) = process {
        attach_process(&server, &delegate, &notifier, process);
    }

    let spec = delegate.poller(Availability::Up, &attributes);
    let cancel = linked_cancel(&transition_cancel, ctx.cancel_token());
    let rx = spawn_poll(spec, Availability::Up, cancel);
    let outcome = rx.await.unwrap_or(PollOutcome::Cancelled);
    finish_start(&server, notifier.as_ref(), outcome)
}

fn finish_start(server: &Arc<Server>, notifier: &dyn ClientNotifier, outcome: PollOutcome) -> Status {
    let (status, changed) = {
        let mut inner = server.lock();
        if inner.in_flight != Some(TransitionKind::Start) {
            // Superseded: process exit already resolved the state.
            let status = if inner.state == ServerState::Started {
                Status::ok()
            } else {
                Status::cancel()
            };
            (status, false)
        } else {
            inner.in_flight = None;
            if let Some(token) = inner.transition_cancel.take() {
                token.cancel();
            }
            match outcome {
                PollOutcome::Reached => {
                    inner.state = ServerState::Started;
                    (Status::ok(), true)
                }
                PollOutcome::TimedOut | PollOutcome::Cancelled => {
                    // Poll never saw the server come up: terminate whatever
                    // was launched so state and reality agree.
                    if let Some(process) = inner.context.process.take() {
                        let _ = process.kill();
                    }
                    inner.state = ServerState::Stopped;
                    inner.mode = None;
                    let status = if outcome == PollOutcome::Cancelled {
                        Status::cancel()
                    } else {
                        Status::error(format!(
                            "Server {} did not become available before the timeout",
                            server.id()
                        ))
                    };
                    (status, true)
                }
            }
        }
    };
    if changed {
        info!(server = %server.id(), state = %server.state(), "start resolved");
        notify_server(server, notifier);
    }
    status
}

async fn run_stop_job(
    server: Arc<Server>,
    delegate: Arc<dyn ServerDelegate>,
    notifier: Arc<dyn ClientNotifier>,
    force: bool,
    transition_cancel: CancellationToken,
    ctx: JobContext,
) -> Status {
    let attributes = server.attributes();
    let spec = delegate.poller(Availability::Down, &attributes);
    let cancel = linked_cancel(&transition_cancel, ctx.cancel_token());
    let rx = spawn_poll(spec, Availability::Down, cancel);

    let process = server.lock().context.process.clone();
    let shutdown = if force {
        match process.as_deref() {
            Some(process) => process.kill().map_err(ModelError::from),
            None => Ok(()),
        }
    } else {
        delegate.stop(process.as_deref(), false, &attributes).await
    };

    if let Err(err) = shutdown {
        warn!(server = %server.id(), %err, "stop failed, rolling back to started");
        // Roll back to STARTED; the tracked process is left untouched —
        // a failed shutdown means the server is still running.
        let changed = {
            let mut inner = server.lock();
            if inner.in_flight != Some(TransitionKind::Stop) {
                false
            } else {
                if let Some(token) = inner.transition_cancel.take() {
                    token.cancel();
                }
                inner.state = ServerState::Started;
                inner.in_flight = None;
                true
            }
        };
        if changed {
            notify_server(&server, notifier.as_ref());
        }
        return Status::error(format!("Server {} failed to stop: {err}", server.id()));
    }

    let outcome = rx.await.unwrap_or(PollOutcome::Cancelled);
    finish_stop(&server, notifier.as_ref(), outcome)
}

fn finish_stop(server: &Arc<Server>, notifier: &dyn ClientNotifier, outcome: PollOutcome) -> Status {
    let (status, changed) = {
        let mut inner = server.lock();
        if inner.in_flight != Some(TransitionKind::Stop) {
            let status = if inner.state == ServerState::Stopped {
                Status::ok()
            } else {
                Status::cancel()
            };
            (status, false)
        } else {
            inner.in_flight = None;
            if let Some(token) = inner.transition_cancel.take() {
                token.cancel();
            }
            match outcome {
                PollOutcome::Reached => {
                    inner.state = ServerState::Stopped;
                    inner.mode = None;
                    inner.context.process = None;
                    (Status::ok(), true)
                }
                PollOutcome::TimedOut => {
                    // Shutdown never completed: roll back rather than stay
                    // stuck in STOPPING.
                    inner.state = ServerState::Started;
                    let status = Status::error(format!(
                        "Server {} did not stop before the timeout",
                        server.id()
                    ));
                    (status, true)
                }
                PollOutcome::Cancelled => {
                    inner.state = ServerState::Started;
                    (Status::cancel(), true)
                }
            }
        }
    };
    if changed {
        info!(server = %server.id(), state = %server.state(), "stop resolved");
        notify_server(server, notifier);
    }
    status
}

/// Store a freshly launched process in the server context, forward its
/// output to the client, and watch for its exit.
fn attach_process(
    server: &Arc<Server>,
    delegate: &Arc<dyn ServerDelegate>,
    notifier: &Arc<dyn ClientNotifier>,
    process: steward_launch::LaunchedProcess,
) {
    let process_id = process.process_id();
    let events = process.take_events();
    let process = Arc::new(process);
    {
        let mut inner = server.lock();
        inner.context.process = Some(Arc::clone(&process));
    }
    notifier.process_created(&server.handle(), &process_id);

    if let Some(mut events) = events {
        let notifier = Arc::clone(notifier);
        let handle = server.handle();
        let process_id = process_id.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let ProcessEvent::Output { stream, line } = event {
                    let stream_type = match stream {
                        steward_launch::OutputStream::Stdout => steward_wire::STREAM_TYPE_SYSOUT,
                        steward_launch::OutputStream::Stderr => steward_wire::STREAM_TYPE_SYSERR,
                    };
                    notifier.process_output(&handle, &process_id, stream_type, &line);
                }
            }
        });
    }

    let server = Arc::clone(server);
    let delegate = Arc::clone(delegate);
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        process.wait_exited().await;
        on_process_terminated(&server, delegate.as_ref(), notifier.as_ref(), &process_id);
    });
}

/// External process termination is a transition trigger in its own right:
/// it must resolve to STARTED or STOPPED per delegate policy, never leave
/// the server in STARTING/STOPPING.
pub(crate) fn on_process_terminated(
    server: &Arc<Server>,
    delegate: &dyn ServerDelegate,
    notifier: &dyn ClientNotifier,
    process_id: &str,
) {
    info!(server = %server.id(), process_id, "managed process exited");
    notifier.process_terminated(&server.handle(), process_id);
    {
        let mut inner = server.lock();
        inner.context.process = None;
        if let Some(token) = inner.transition_cancel.take() {
            token.cancel();
        }
        let target = match delegate.on_process_terminated(inner.state) {
            ServerState::Started => ServerState::Started,
            _ => ServerState::Stopped,
        };
        inner.state = target;
        if !target.allows_mode() {
            inner.mode = None;
        }
        inner.in_flight = None;
    }
    notify_server(server, notifier);
}

async fn run_publish_job(
    server: Arc<Server>,
    delegate: Arc<dyn ServerDelegate>,
    notifier: Arc<dyn ClientNotifier>,
    kind: PublishKind,
    ctx: JobContext,
) -> Status {
    // Publish passes for one server never interleave.
    let _gate = server.publish_gate().lock().await;

    if server.state() != ServerState::Started {
        return Status::error(format!("Server {} must be started to publish", server.id()));
    }
    let started = delegate.publish_start(kind).await;
    if !started.is_ok() {
        return started;
    }

    let snapshot = server.lock().publish.deployable_states();
    let mut failures = Vec::new();
    for deployable in snapshot {
        if ctx.cancelled() {
            return Status::cancel();
        }
        let resolved = resolve_kind(kind, deployable.publish_state);
        let outcome = delegate.publish_deployable(&deployable.reference, resolved).await;
        server.lock().publish.publish_deployable(&deployable.reference, &outcome);
        if !outcome.is_ok() {
            failures.push(format!("{}: {}", deployable.reference.path, outcome.message));
        }
    }

    let finished = delegate.publish_finish(kind).await;
    let stuck: Vec<String> = {
        let inner = server.lock();
        inner.publish.stuck_references().iter().map(|d| d.reference.path.clone()).collect()
    };
    notify_server(&server, notifier.as_ref());

    if !failures.is_empty() {
        Status::error(format!("Publish failed for {}", failures.join(", ")))
    } else if !finished.is_ok() {
        finished
    } else if !stuck.is_empty() {
        Status::warning(format!("Deployables pending after publish: {}", stuck.join(", ")))
    } else {
        Status::ok()
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
