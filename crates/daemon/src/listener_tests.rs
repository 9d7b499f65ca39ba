// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use steward_core::{Attributes, ServerId, ServerState, Severity};
use steward_wire::{
    read_message, write_message, Event, LaunchParameters, Request, Response, ServerAttributes,
};
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;

use super::Listener;
use crate::engine::test_support::{fixed_delegate_factory, test_server_type, FakeDelegate};
use crate::engine::Engine;

struct Harness {
    dir: tempfile::TempDir,
    shutdown: CancellationToken,
}

impl Harness {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("stewardd.sock");
        let unix = UnixListener::bind(&socket_path).unwrap();

        let engine = Engine::new();
        engine.servers.register_server_type(
            test_server_type(),
            fixed_delegate_factory(Arc::new(FakeDelegate::instant())),
        );

        let shutdown = CancellationToken::new();
        tokio::spawn(Listener::new(unix, engine, shutdown.clone()).run());
        Harness { dir, shutdown }
    }

    async fn connect(&self) -> UnixStream {
        UnixStream::connect(self.dir.path().join("stewardd.sock")).await.unwrap()
    }

    async fn roundtrip(&self, request: Request) -> Response {
        let mut stream = self.connect().await;
        write_message(&mut stream, &request).await.unwrap();
        read_message(&mut stream).await.unwrap().unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[tokio::test]
async fn ping_pong() {
    let harness = Harness::start().await;
    assert_eq!(harness.roundtrip(Request::Ping).await, Response::Pong);
}

#[tokio::test]
async fn hello_reports_daemon_version() {
    let harness = Harness::start().await;
    let response = harness.roundtrip(Request::Hello { version: "client-0.1".into() }).await;
    match response {
        Response::Hello { version } => assert_eq!(version, env!("CARGO_PKG_VERSION")),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn server_types_lists_the_registered_type() {
    let harness = Harness::start().await;
    let response = harness.roundtrip(Request::GetServerTypes).await;
    match response {
        Response::ServerTypes { types } => {
            assert_eq!(types.len(), 1);
            assert_eq!(types[0].id, "fake.type");
            assert_eq!(types[0].name, "Fake Server");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn requests_share_one_connection() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    write_message(&mut stream, &Request::Ping).await.unwrap();
    let pong: Response = read_message(&mut stream).await.unwrap().unwrap();
    assert_eq!(pong, Response::Pong);

    write_message(&mut stream, &Request::GetServerHandles).await.unwrap();
    let handles: Response = read_message(&mut stream).await.unwrap().unwrap();
    assert_eq!(handles, Response::ServerHandles { handles: vec![] });
}

#[tokio::test]
async fn create_start_and_observe_state_over_the_wire() {
    let harness = Harness::start().await;

    // Subscribe on a second connection first so no event is missed.
    let mut events = harness.connect().await;
    write_message(&mut events, &Request::Subscribe).await.unwrap();
    let subscribed: Response = read_message(&mut events).await.unwrap().unwrap();
    assert_eq!(subscribed, Response::Subscribed);

    let created = harness
        .roundtrip(Request::CreateServer {
            attrs: ServerAttributes {
                id: ServerId::new("wfly"),
                server_type: "fake.type".to_string(),
                attributes: Attributes::new(),
            },
        })
        .await;
    match created {
        Response::Status { status } => assert!(status.is_ok()),
        other => panic!("unexpected response: {other:?}"),
    }

    let ack = harness
        .roundtrip(Request::StartServerAsync {
            params: LaunchParameters { id: ServerId::new("wfly"), mode: "run".to_string() },
        })
        .await;
    match ack {
        Response::StartServer { response } => {
            assert!(response.status.is_ok());
            assert!(response.job_id.is_some());
        }
        other => panic!("unexpected response: {other:?}"),
    }

    // The event stream sees the server reach STARTED.
    let mut saw_started = false;
    for _ in 0..20 {
        let event: Event = match read_message(&mut events).await.unwrap() {
            Some(event) => event,
            None => break,
        };
        if let Event::ServerStateChanged { state, .. } = event {
            if state.state == ServerState::Started {
                saw_started = true;
                break;
            }
        }
    }
    assert!(saw_started);

    let state = harness.roundtrip(Request::GetServerState { id: ServerId::new("wfly") }).await;
    match state {
        Response::ServerState { state } => {
            assert_eq!(state.state, ServerState::Started);
            assert_eq!(state.mode.as_deref(), Some("run"));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_server_surfaces_a_status_not_a_fault() {
    let harness = Harness::start().await;
    let response =
        harness.roundtrip(Request::GetServerState { id: ServerId::new("nemo") }).await;
    match response {
        Response::Status { status } => {
            assert_eq!(status.severity, Severity::Error);
            assert_eq!(status.message, "Server nemo does not exist");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn cancel_unknown_job_is_an_error_status() {
    let harness = Harness::start().await;
    let response = harness
        .roundtrip(Request::CancelJob { id: steward_core::JobId::new("job-ghost") })
        .await;
    match response {
        Response::Status { status } => {
            assert!(status.is_error());
            assert_eq!(status.message, "Job job-ghost not found");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
