// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes for engine tests: delegates with scripted behavior and a
//! notifier that records everything it is told.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use steward_core::{
    Attributes, Availability, DeployableReference, PublishKind, ServerHandle, ServerState, Status,
};
use steward_launch::{CommandDetails, LaunchedProcess};
use steward_wire::ServerStateSnapshot;

use super::actions::ActionRegistry;
use super::notify::ClientNotifier;
use super::poller::PollerSpec;
use super::servers::{DelegateFactory, ServerDelegate, ServerTypeDescriptor};
use crate::error::ModelError;

/// What a [`FakeDelegate`] does when asked to launch.
#[derive(Clone)]
pub enum FakeLaunch {
    /// No process; state is learned purely through polling.
    None,
    /// Spawn a real process with the given command.
    Spawn(CommandDetails),
    /// Fail the launch with this message.
    Fail(String),
}

/// Scripted server delegate for lifecycle tests.
pub struct FakeDelegate {
    pub launch: FakeLaunch,
    pub up_poller: PollerSpec,
    pub down_poller: PollerSpec,
    pub validation: Status,
    pub actions: ActionRegistry,
    pub publish_outcome: Status,
    pub stop_failure: Option<String>,
    pub publish_calls: Mutex<Vec<(String, PublishKind)>>,
    pub stop_calls: Mutex<u32>,
}

impl Default for FakeDelegate {
    fn default() -> Self {
        FakeDelegate {
            launch: FakeLaunch::None,
            up_poller: PollerSpec::automatic_success(),
            down_poller: PollerSpec::automatic_success(),
            validation: Status::ok(),
            actions: ActionRegistry::builtin(),
            publish_outcome: Status::ok(),
            stop_failure: None,
            publish_calls: Mutex::new(Vec::new()),
            stop_calls: Mutex::new(0),
        }
    }
}

impl FakeDelegate {
    pub fn instant() -> Self {
        Self::default()
    }

    pub fn failing_launch(message: impl Into<String>) -> Self {
        FakeDelegate { launch: FakeLaunch::Fail(message.into()), ..Self::default() }
    }

    pub fn with_up_poller(mut self, spec: PollerSpec) -> Self {
        self.up_poller = spec;
        self
    }

    pub fn with_down_poller(mut self, spec: PollerSpec) -> Self {
        self.down_poller = spec;
        self
    }

    pub fn with_stop_failure(mut self, message: impl Into<String>) -> Self {
        self.stop_failure = Some(message.into());
        self
    }
}

#[async_trait]
impl ServerDelegate for FakeDelegate {
    fn validate(&self, _attributes: &Attributes) -> Status {
        self.validation.clone()
    }

    fn set_defaults(&self, attributes: &mut Attributes) {
        attributes.set_default("server.timeout.startup", 120i64);
    }

    async fn launch(
        &self,
        _mode: &str,
        _attributes: &Attributes,
    ) -> Result<Option<LaunchedProcess>, ModelError> {
        match &self.launch {
            FakeLaunch::None => Ok(None),
            FakeLaunch::Spawn(details) => Ok(Some(LaunchedProcess::spawn(details.clone())?)),
            FakeLaunch::Fail(message) => Err(ModelError::Validation(message.clone())),
        }
    }

    fn poller(&self, direction: Availability, _attributes: &Attributes) -> PollerSpec {
        match direction {
            Availability::Up => self.up_poller.clone(),
            Availability::Down => self.down_poller.clone(),
        }
    }

    async fn stop(
        &self,
        process: Option<&LaunchedProcess>,
        force: bool,
        _attributes: &Attributes,
    ) -> Result<(), ModelError> {
        *self.stop_calls.lock() += 1;
        if let Some(message) = &self.stop_failure {
            return Err(ModelError::Precondition(message.clone()));
        }
        match process {
            Some(process) if force => Ok(process.kill()?),
            Some(process) => Ok(process.terminate()?),
            None => Ok(()),
        }
    }

    fn actions(&self) -> ActionRegistry {
        self.actions.clone()
    }

    async fn publish_deployable(
        &self,
        reference: &DeployableReference,
        kind: PublishKind,
    ) -> Status {
        self.publish_calls.lock().push((reference.path.clone(), kind));
        self.publish_outcome.clone()
    }
}

/// Factory wrapping one shared delegate instance.
pub fn fixed_delegate_factory(delegate: Arc<FakeDelegate>) -> DelegateFactory {
    Arc::new(move |_handle: &ServerHandle| {
        let delegate: Arc<dyn ServerDelegate> = delegate.clone();
        delegate
    })
}

/// The descriptor used by most tests.
pub fn test_server_type() -> ServerTypeDescriptor {
    ServerTypeDescriptor::new("fake.type", "Fake Server", "Scripted server type for tests")
}

/// A short poller spec useful for timeout tests.
pub fn short_noop_poller() -> PollerSpec {
    PollerSpec::noop().with_timeout(Duration::from_millis(50))
}

/// Notifier recording every push for later assertions.
#[derive(Default)]
pub struct CaptureNotifier {
    pub states: Mutex<Vec<(ServerHandle, ServerStateSnapshot)>>,
    pub processes_created: Mutex<Vec<String>>,
    pub processes_terminated: Mutex<Vec<String>>,
    pub output: Mutex<Vec<(i32, String)>>,
}

impl CaptureNotifier {
    pub fn state_codes(&self) -> Vec<ServerState> {
        self.states.lock().iter().map(|(_, s)| s.state).collect()
    }
}

impl ClientNotifier for CaptureNotifier {
    fn server_state_changed(&self, handle: &ServerHandle, state: &ServerStateSnapshot) {
        self.states.lock().push((handle.clone(), state.clone()));
    }

    fn process_created(&self, _handle: &ServerHandle, process_id: &str) {
        self.processes_created.lock().push(process_id.to_string());
    }

    fn process_terminated(&self, _handle: &ServerHandle, process_id: &str) {
        self.processes_terminated.lock().push(process_id.to_string());
    }

    fn process_output(&self, _handle: &ServerHandle, _process_id: &str, stream_type: i32, text: &str) {
        self.output.lock().push((stream_type, text.to_string()));
    }
}
