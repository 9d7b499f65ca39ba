// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! "Show in browser" action: pick the server root or a deployment and emit
//! an open-browser item for it.

use steward_core::workflow::data_string;
use steward_core::{WorkflowItem, WorkflowResponse};
use steward_wire::{ServerActionRequest, ServerActionWorkflow};

use super::{ActionContext, ActionHandler};

pub const SHOW_IN_BROWSER_ACTION_ID: &str = "ShowInBrowserActionHandler.actionId";
pub const SHOW_IN_BROWSER_ACTION_LABEL: &str = "Show in browser...";
pub const SHOW_IN_BROWSER_PROMPT_ID: &str = "ShowInBrowserActionHandler.selection.id";
pub const SHOW_IN_BROWSER_PROMPT_LABEL: &str =
    "Which deployment do you want to show in the web browser?";
pub const SHOW_IN_BROWSER_SERVER_ROOT: &str = "Welcome Page (Index)";

/// Attribute naming the server's base URL.
pub const ATTR_BASE_URL: &str = "server.base.url";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub struct ShowInBrowserAction;

impl ShowInBrowserAction {
    fn base_url(ctx: &ActionContext) -> String {
        ctx.attributes
            .get_string(ATTR_BASE_URL)
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Context root of one deployable: its output name minus any suffix.
    fn context_root(output_name: &str) -> &str {
        match output_name.rfind('.') {
            Some(idx) if idx > 0 => &output_name[..idx],
            _ => output_name,
        }
    }

    fn choices(ctx: &ActionContext) -> Vec<String> {
        let base = Self::base_url(ctx);
        let mut choices = vec![SHOW_IN_BROWSER_SERVER_ROOT.to_string()];
        for deployable in &ctx.deployables {
            let root = Self::context_root(deployable.reference.output_name());
            choices.push(format!("{base}/{root}"));
        }
        choices
    }
}

impl ActionHandler for ShowInBrowserAction {
    fn id(&self) -> &'static str {
        SHOW_IN_BROWSER_ACTION_ID
    }

    fn label(&self) -> &'static str {
        SHOW_IN_BROWSER_ACTION_LABEL
    }

    fn initial_workflow(&self, ctx: &ActionContext) -> ServerActionWorkflow {
        let mut item =
            WorkflowItem::prompt_small(SHOW_IN_BROWSER_PROMPT_ID, SHOW_IN_BROWSER_PROMPT_LABEL);
        if let Some(prompt) = item.prompt.as_mut() {
            prompt.valid_responses = Self::choices(ctx);
        }
        let workflow = WorkflowResponse::info(SHOW_IN_BROWSER_ACTION_LABEL, vec![item]);
        ServerActionWorkflow {
            action_id: SHOW_IN_BROWSER_ACTION_ID.to_string(),
            action_label: SHOW_IN_BROWSER_ACTION_LABEL.to_string(),
            workflow,
        }
    }

    fn handle(&self, ctx: &ActionContext, request: &ServerActionRequest) -> WorkflowResponse {
        let Some(choice) = data_string(&request.data, SHOW_IN_BROWSER_PROMPT_ID) else {
            return WorkflowResponse::cancel();
        };
        let choice = choice.trim();
        let base = Self::base_url(ctx);

        let url = if choice == SHOW_IN_BROWSER_SERVER_ROOT {
            Some(base)
        } else if choice.starts_with("http") {
            Some(choice.to_string())
        } else {
            ctx.deployables.iter().find(|d| d.reference.path == choice).map(|d| {
                let root = Self::context_root(d.reference.output_name());
                format!("{base}/{root}")
            })
        };

        match url {
            Some(url) => WorkflowResponse::ok_with("ok", vec![WorkflowItem::open_browser(url)]),
            None => WorkflowResponse::cancel(),
        }
    }
}

#[cfg(test)]
#[path = "show_in_browser_tests.rs"]
mod tests;
