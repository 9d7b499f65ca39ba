// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn cancel_response_has_empty_items() {
    let resp = WorkflowResponse::cancel();
    assert_eq!(resp.status.severity, crate::Severity::Cancel);
    assert!(resp.items.is_empty());
    assert!(resp.request_id.is_none());
    assert!(resp.job_id.is_none());
}

#[test]
fn error_response_carries_message() {
    let resp = WorkflowResponse::error("Server wfly does not exist");
    assert!(resp.status.is_error());
    assert_eq!(resp.status.message, "Server wfly does not exist");
}

#[test]
fn item_type_wire_tags() {
    assert_eq!(WorkflowItemType::PromptSmall.to_string(), "workflow.prompt.small");
    assert_eq!(WorkflowItemType::OpenBrowser.to_string(), "workflow.browser.open");

    let json = serde_json::to_string(&WorkflowItemType::OpenEditor).unwrap();
    assert_eq!(json, "\"workflow.editor.open\"");
}

#[test]
fn open_browser_item_carries_url() {
    let item = WorkflowItem::open_browser("http://localhost:8080/sample");
    assert_eq!(item.item_type, WorkflowItemType::OpenBrowser);
    assert_eq!(item.content.as_deref(), Some("http://localhost:8080/sample"));
    assert_eq!(item.label, "Open the following url: http://localhost:8080/sample");
}

#[test]
fn request_ids_are_prefixed_and_unique() {
    let a = RequestId::generate();
    let b = RequestId::generate();
    assert!(a.as_str().starts_with("req-"));
    assert_ne!(a, b);
}

#[test]
fn data_lookups() {
    let mut data = WorkflowData::new();
    data.insert("workflow.license.sign".to_string(), serde_json::Value::Bool(true));
    data.insert("choice".to_string(), serde_json::Value::String("Welcome Page (Index)".into()));

    assert_eq!(data_bool(&data, "workflow.license.sign"), Some(true));
    assert_eq!(data_string(&data, "choice"), Some("Welcome Page (Index)"));
    assert_eq!(data_string(&data, "workflow.license.sign"), None);
    assert_eq!(data_bool(&data, "missing"), None);
}

#[test]
fn workflow_response_serde_round_trip() {
    let resp = WorkflowResponse::info(
        "Please fill the required information",
        vec![WorkflowItem::prompt_small("workflow.license.sign", "Do you agree to the license?")],
    )
    .with_request_id(RequestId::new("req-fixed"));
    let json = serde_json::to_string(&resp).unwrap();
    let parsed: WorkflowResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, resp);
}
