// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use steward_core::{Attributes, ServerId};

#[test]
fn tagged_serialization_includes_type() {
    let json = serde_json::to_value(Request::Ping).unwrap();
    assert_eq!(json["type"], "Ping");

    let json =
        serde_json::to_value(Request::GetServerState { id: ServerId::new("wfly") }).unwrap();
    assert_eq!(json["type"], "GetServerState");
    assert_eq!(json["id"], "wfly");
}

#[test]
fn create_server_round_trip() {
    let mut attributes = Attributes::new();
    attributes.set("server.home.dir", "/opt/wildfly");
    let req = Request::CreateServer {
        attrs: ServerAttributes {
            id: ServerId::new("wfly"),
            server_type: "generic.web".to_string(),
            attributes,
        },
    };
    let json = serde_json::to_string(&req).unwrap();
    let parsed: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, req);
}

#[test]
fn action_request_defaults_optional_fields() {
    let json = r#"{
        "type": "ExecuteServerAction",
        "request": { "server_id": "wfly", "action_id": "ShowInBrowserActionHandler.actionId" }
    }"#;
    let parsed: Request = serde_json::from_str(json).unwrap();
    match parsed {
        Request::ExecuteServerAction { request } => {
            assert!(request.data.is_empty());
            assert!(request.request_id.is_none());
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn download_runtime_request_can_be_empty() {
    let json = r#"{ "type": "DownloadRuntime", "request": {} }"#;
    let parsed: Request = serde_json::from_str(json).unwrap();
    match parsed {
        Request::DownloadRuntime { request } => {
            assert!(request.runtime_id.is_none());
            assert!(request.request_id.is_none());
            assert!(request.data.is_empty());
        }
        other => panic!("unexpected request: {other:?}"),
    }
}
