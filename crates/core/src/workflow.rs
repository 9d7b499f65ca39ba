// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive workflow exchange types.
//!
//! A handler that needs client input returns a [`WorkflowResponse`] whose
//! items describe what to collect; the client re-issues the same request
//! with accumulated answers (and the echoed request id) until the handler
//! reaches a terminal OK/ERROR/CANCEL. Handlers are pure functions of the
//! accumulated data — there is no suspended server-side continuation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::AttributeKind;
use crate::job::JobId;
use crate::status::Status;

crate::define_id! {
    /// Correlates the calls of one multi-step workflow exchange.
    ///
    /// Issued by the server on the first INFO response that needs a second
    /// round trip; echoed back by the client on every follow-up call.
    pub struct RequestId("req-");
}

/// Fixed wire tags for workflow item types.
pub const WORKFLOW_TYPE_PROMPT_SMALL: &str = "workflow.prompt.small";
pub const WORKFLOW_TYPE_PROMPT_LARGE: &str = "workflow.prompt.large";
pub const WORKFLOW_TYPE_OPEN_EDITOR: &str = "workflow.editor.open";
pub const WORKFLOW_TYPE_OPEN_BROWSER: &str = "workflow.browser.open";

/// Well-known item ids used by the built-in workflows.
pub const WORKFLOW_LICENSE_ID: &str = "workflow.license";
pub const WORKFLOW_LICENSE_URL_ID: &str = "workflow.license.url";
pub const WORKFLOW_LICENSE_SIGN_ID: &str = "workflow.license.sign";
pub const WORKFLOW_EDITOR_PROPERTY_PATH: &str = "workflow.editor.file.path";
pub const WORKFLOW_EDITOR_PROPERTY_CONTENT: &str = "workflow.editor.file.content";

/// Option key naming the artifact a deployable publishes as.
pub const DEPLOYMENT_OPTION_OUTPUT_NAME: &str = "deployment.output.name";

/// What kind of UI element a workflow item asks the client to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowItemType {
    #[serde(rename = "workflow.prompt.small")]
    PromptSmall,
    #[serde(rename = "workflow.prompt.large")]
    PromptLarge,
    #[serde(rename = "workflow.editor.open")]
    OpenEditor,
    #[serde(rename = "workflow.browser.open")]
    OpenBrowser,
}

crate::simple_display! {
    WorkflowItemType {
        PromptSmall => WORKFLOW_TYPE_PROMPT_SMALL,
        PromptLarge => WORKFLOW_TYPE_PROMPT_LARGE,
        OpenEditor => WORKFLOW_TYPE_OPEN_EDITOR,
        OpenBrowser => WORKFLOW_TYPE_OPEN_BROWSER,
    }
}

/// Details for a prompt item: what answer kind is expected and, optionally,
/// the closed set of valid answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPrompt {
    pub response_type: AttributeKind,
    #[serde(default)]
    pub response_secret: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_responses: Vec<String>,
}

impl WorkflowPrompt {
    pub fn of(response_type: AttributeKind) -> Self {
        WorkflowPrompt { response_type, response_secret: false, valid_responses: Vec::new() }
    }
}

/// One renderable element of a workflow response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowItem {
    pub id: String,
    pub item_type: WorkflowItemType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<WorkflowPrompt>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl WorkflowItem {
    pub fn prompt_small(id: impl Into<String>, label: impl Into<String>) -> Self {
        WorkflowItem {
            id: id.into(),
            item_type: WorkflowItemType::PromptSmall,
            label: label.into(),
            content: None,
            prompt: Some(WorkflowPrompt::of(AttributeKind::String)),
            properties: HashMap::new(),
        }
    }

    pub fn prompt_large(id: impl Into<String>, label: impl Into<String>) -> Self {
        WorkflowItem {
            id: id.into(),
            item_type: WorkflowItemType::PromptLarge,
            label: label.into(),
            content: None,
            prompt: Some(WorkflowPrompt::of(AttributeKind::String)),
            properties: HashMap::new(),
        }
    }

    pub fn open_browser(url: impl Into<String>) -> Self {
        let url = url.into();
        WorkflowItem {
            id: WORKFLOW_TYPE_OPEN_BROWSER.to_string(),
            item_type: WorkflowItemType::OpenBrowser,
            label: format!("Open the following url: {url}"),
            content: Some(url),
            prompt: None,
            properties: HashMap::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: WorkflowPrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// The uniform response of every action/workflow entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WorkflowItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

impl WorkflowResponse {
    /// Terminal success: the action's side effect has been produced and no
    /// further round trip is needed.
    pub fn ok_with(status_message: impl Into<String>, items: Vec<WorkflowItem>) -> Self {
        WorkflowResponse {
            status: Status::ok_with(status_message),
            request_id: None,
            items,
            job_id: None,
        }
    }

    /// More data is required; the items say what to collect next.
    pub fn info(message: impl Into<String>, items: Vec<WorkflowItem>) -> Self {
        WorkflowResponse { status: Status::info(message), request_id: None, items, job_id: None }
    }

    /// A precondition failed. The message must be specific and stable.
    pub fn error(message: impl Into<String>) -> Self {
        WorkflowResponse { status: Status::error(message), request_id: None, items: Vec::new(), job_id: None }
    }

    /// The client supplied no usable data; the exchange is abandoned.
    /// A cancel response always carries an empty item list.
    pub fn cancel() -> Self {
        WorkflowResponse { status: Status::cancel(), request_id: None, items: Vec::new(), job_id: None }
    }

    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn with_job_id(mut self, id: JobId) -> Self {
        self.job_id = Some(id);
        self
    }
}

/// The data bag a client sends back with answers, keyed by item id.
pub type WorkflowData = HashMap<String, Value>;

/// String answer lookup in a workflow data bag.
pub fn data_string<'a>(data: &'a WorkflowData, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

/// Bool answer lookup in a workflow data bag.
pub fn data_bool(data: &WorkflowData, key: &str) -> Option<bool> {
    data.get(key).and_then(Value::as_bool)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
