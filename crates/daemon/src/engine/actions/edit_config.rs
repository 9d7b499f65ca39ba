// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! "Edit configuration file" action.
//!
//! First call returns an open-editor item carrying the file's path and
//! current content; a follow-up call with edited content writes it back.
//! Available in every lifecycle state — a stopped server's configuration
//! is still editable.

use std::collections::HashMap;

use steward_core::workflow::{
    data_string, WORKFLOW_EDITOR_PROPERTY_CONTENT, WORKFLOW_EDITOR_PROPERTY_PATH,
};
use steward_core::{WorkflowItem, WorkflowItemType, WorkflowResponse};
use steward_wire::{ServerActionRequest, ServerActionWorkflow};

use super::{ActionContext, ActionHandler};

pub const EDIT_CONFIG_ACTION_ID: &str = "EditServerConfigurationActionHandler.actionId";
pub const EDIT_CONFIG_ACTION_LABEL: &str = "Edit Configuration File...";

/// Attribute naming the server's primary configuration file.
pub const ATTR_CONFIG_FILE: &str = "server.config.file";

pub struct EditConfigAction;

impl ActionHandler for EditConfigAction {
    fn id(&self) -> &'static str {
        EDIT_CONFIG_ACTION_ID
    }

    fn label(&self) -> &'static str {
        EDIT_CONFIG_ACTION_LABEL
    }

    fn initial_workflow(&self, _ctx: &ActionContext) -> ServerActionWorkflow {
        ServerActionWorkflow {
            action_id: EDIT_CONFIG_ACTION_ID.to_string(),
            action_label: EDIT_CONFIG_ACTION_LABEL.to_string(),
            workflow: WorkflowResponse::info(EDIT_CONFIG_ACTION_LABEL, Vec::new()),
        }
    }

    fn handle(&self, ctx: &ActionContext, request: &ServerActionRequest) -> WorkflowResponse {
        let Some(path) = ctx.attributes.get_string(ATTR_CONFIG_FILE) else {
            return WorkflowResponse::error(format!(
                "Server {} has no configuration file",
                ctx.handle.id
            ));
        };

        // Second round trip: edited content comes back for write-out.
        if let Some(content) = data_string(&request.data, WORKFLOW_EDITOR_PROPERTY_CONTENT) {
            return match std::fs::write(path, content) {
                Ok(()) => WorkflowResponse::ok_with("Configuration saved", Vec::new()),
                Err(err) => {
                    WorkflowResponse::error(format!("Could not write {path}: {err}"))
                }
            };
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut properties = HashMap::new();
                properties.insert(WORKFLOW_EDITOR_PROPERTY_PATH.to_string(), path.to_string());
                properties.insert(WORKFLOW_EDITOR_PROPERTY_CONTENT.to_string(), content);
                let item = WorkflowItem {
                    id: format!("{EDIT_CONFIG_ACTION_ID}.editor"),
                    item_type: WorkflowItemType::OpenEditor,
                    label: EDIT_CONFIG_ACTION_LABEL.to_string(),
                    content: None,
                    prompt: None,
                    properties,
                };
                WorkflowResponse::ok_with("ok", vec![item])
            }
            Err(err) => WorkflowResponse::error(format!("Could not read {path}: {err}")),
        }
    }
}

#[cfg(test)]
#[path = "edit_config_tests.rs"]
mod tests;
