// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use steward_core::{
    Attributes, DeployableReference, DeployableState, PublishState, ServerHandle, ServerId,
    ServerState, Severity, WorkflowItemType,
};

fn context_with_deployable() -> ActionContext {
    let mut attributes = Attributes::new();
    attributes.set(ATTR_BASE_URL, "http://localhost:8080");
    ActionContext {
        handle: ServerHandle::new(ServerId::new("wfly"), "generic.web"),
        attributes,
        deployables: vec![DeployableState {
            reference: DeployableReference::new("sample", "/deploy/sample.war"),
            publish_state: PublishState::None,
            run_state: ServerState::Started,
        }],
    }
}

fn request(data: steward_core::WorkflowData) -> ServerActionRequest {
    ServerActionRequest {
        server_id: ServerId::new("wfly"),
        action_id: SHOW_IN_BROWSER_ACTION_ID.to_string(),
        data,
        request_id: None,
    }
}

#[test]
fn initial_workflow_lists_root_and_deployments() {
    let ctx = context_with_deployable();
    let workflow = ShowInBrowserAction.initial_workflow(&ctx);
    assert_eq!(workflow.action_id, SHOW_IN_BROWSER_ACTION_ID);
    assert_eq!(workflow.action_label, "Show in browser...");

    let item = &workflow.workflow.items[0];
    let prompt = item.prompt.as_ref().unwrap();
    assert_eq!(
        prompt.valid_responses,
        vec![SHOW_IN_BROWSER_SERVER_ROOT.to_string(), "http://localhost:8080/sample".to_string()]
    );
}

#[test]
fn no_data_cancels_with_empty_items() {
    let ctx = context_with_deployable();
    let resp = ShowInBrowserAction.handle(&ctx, &request(Default::default()));
    assert_eq!(resp.status.severity, Severity::Cancel);
    assert!(resp.items.is_empty());
}

#[test]
fn root_choice_opens_the_base_url() {
    let ctx = context_with_deployable();
    let mut data = steward_core::WorkflowData::new();
    data.insert(
        SHOW_IN_BROWSER_PROMPT_ID.to_string(),
        serde_json::Value::String(SHOW_IN_BROWSER_SERVER_ROOT.to_string()),
    );
    let resp = ShowInBrowserAction.handle(&ctx, &request(data));
    assert!(resp.status.is_ok());
    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].item_type, WorkflowItemType::OpenBrowser);
    assert_eq!(resp.items[0].content.as_deref(), Some("http://localhost:8080"));
}

#[test]
fn deployable_path_choice_maps_to_context_root() {
    let ctx = context_with_deployable();
    let mut data = steward_core::WorkflowData::new();
    data.insert(
        SHOW_IN_BROWSER_PROMPT_ID.to_string(),
        serde_json::Value::String("/deploy/sample.war".to_string()),
    );
    let resp = ShowInBrowserAction.handle(&ctx, &request(data));
    assert!(resp.status.is_ok());
    assert_eq!(resp.items[0].content.as_deref(), Some("http://localhost:8080/sample"));
}

#[test]
fn handler_is_deterministic_for_identical_data() {
    let ctx = context_with_deployable();
    let mut data = steward_core::WorkflowData::new();
    data.insert(
        SHOW_IN_BROWSER_PROMPT_ID.to_string(),
        serde_json::Value::String("http://example.org/app".to_string()),
    );
    let first = ShowInBrowserAction.handle(&ctx, &request(data.clone()));
    let second = ShowInBrowserAction.handle(&ctx, &request(data));
    assert_eq!(first, second);
}
