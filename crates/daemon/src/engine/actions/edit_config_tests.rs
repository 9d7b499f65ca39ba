// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use steward_core::{Attributes, ServerHandle, ServerId, WorkflowData};

fn context(config_path: Option<&str>) -> ActionContext {
    let mut attributes = Attributes::new();
    if let Some(path) = config_path {
        attributes.set(ATTR_CONFIG_FILE, path);
    }
    ActionContext {
        handle: ServerHandle::new(ServerId::new("wfly"), "generic.web"),
        attributes,
        deployables: vec![],
    }
}

fn request(data: WorkflowData) -> ServerActionRequest {
    ServerActionRequest {
        server_id: ServerId::new("wfly"),
        action_id: EDIT_CONFIG_ACTION_ID.to_string(),
        data,
        request_id: None,
    }
}

#[test]
fn missing_config_attribute_is_an_error() {
    let resp = EditConfigAction.handle(&context(None), &request(WorkflowData::new()));
    assert!(resp.status.is_error());
    assert_eq!(resp.status.message, "Server wfly has no configuration file");
}

#[test]
fn first_call_returns_editor_item_with_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("standalone.xml");
    std::fs::write(&path, "<server/>").unwrap();

    let ctx = context(Some(path.to_str().unwrap()));
    let resp = EditConfigAction.handle(&ctx, &request(WorkflowData::new()));
    assert!(resp.status.is_ok());

    let item = &resp.items[0];
    assert_eq!(item.item_type, WorkflowItemType::OpenEditor);
    assert_eq!(
        item.properties.get(WORKFLOW_EDITOR_PROPERTY_PATH).map(String::as_str),
        path.to_str()
    );
    assert_eq!(
        item.properties.get(WORKFLOW_EDITOR_PROPERTY_CONTENT).map(String::as_str),
        Some("<server/>")
    );
}

#[test]
fn returned_content_is_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("standalone.xml");
    std::fs::write(&path, "<server/>").unwrap();

    let ctx = context(Some(path.to_str().unwrap()));
    let mut data = WorkflowData::new();
    data.insert(
        WORKFLOW_EDITOR_PROPERTY_CONTENT.to_string(),
        serde_json::Value::String("<server name=\"edited\"/>".to_string()),
    );
    let resp = EditConfigAction.handle(&ctx, &request(data));
    assert!(resp.status.is_ok());
    assert_eq!(resp.status.message, "Configuration saved");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<server name=\"edited\"/>");
}

#[test]
fn unreadable_file_is_a_specific_error() {
    let ctx = context(Some("/nonexistent/standalone.xml"));
    let resp = EditConfigAction.handle(&ctx, &request(WorkflowData::new()));
    assert!(resp.status.is_error());
    assert!(resp.status.message.starts_with("Could not read /nonexistent/standalone.xml"));
}
