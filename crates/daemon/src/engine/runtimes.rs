// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downloadable runtimes.
//!
//! Providers contribute descriptors of runtimes a client can install; the
//! download itself is a multi-step license workflow that ends in a
//! scheduled job. The descriptor cache is owned here, lazily initialized,
//! and explicitly invalidated when the provider set changes — there is no
//! process-wide singleton.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use steward_core::workflow::{
    data_bool, WORKFLOW_LICENSE_ID, WORKFLOW_LICENSE_SIGN_ID, WORKFLOW_LICENSE_URL_ID,
};
use steward_core::{
    AttributeKind, Status, WorkflowData, WorkflowItem, WorkflowPrompt, WorkflowResponse,
};
use steward_wire::{DownloadRuntimeDescription, DownloadSingleRuntimeRequest};
use tracing::info;

use super::jobs::{JobContext, JobManager};
use super::workflow::WorkflowRequestRegistry;

/// Stable message shown when more workflow data is required.
pub const INFO_REQUIRED_MESSAGE: &str = "Please fill the required information";
/// Stable message once the download job has been scheduled.
pub const DOWNLOAD_IN_PROGRESS: &str = "Download In Progress";
/// Stable message for an unknown or missing runtime id.
pub const NO_EXECUTOR_MESSAGE: &str = "Unable to find an executor for the given download runtime";

/// Contributes downloadable runtime descriptors.
pub trait DownloadRuntimeProvider: Send + Sync {
    fn id(&self) -> &str;
    fn runtimes(&self) -> Vec<DownloadRuntimeDescription>;
    fn executor(&self) -> Arc<dyn DownloadExecutor>;
}

/// Performs the actual fetch/unpack of one runtime. Runs inside a job.
#[async_trait]
pub trait DownloadExecutor: Send + Sync {
    async fn download(
        &self,
        runtime: &DownloadRuntimeDescription,
        data: &WorkflowData,
        ctx: &JobContext,
    ) -> Status;
}

struct CachedRuntime {
    description: DownloadRuntimeDescription,
    provider: Arc<dyn DownloadRuntimeProvider>,
}

/// Registry + cache of downloadable runtimes and the license workflow.
pub struct DownloadRuntimeModel {
    providers: Mutex<Vec<Arc<dyn DownloadRuntimeProvider>>>,
    cache: Mutex<Option<HashMap<String, Arc<CachedRuntime>>>>,
    requests: WorkflowRequestRegistry,
    jobs: Arc<JobManager>,
}

impl DownloadRuntimeModel {
    pub fn new(jobs: Arc<JobManager>) -> Arc<Self> {
        Arc::new(DownloadRuntimeModel {
            providers: Mutex::new(Vec::new()),
            cache: Mutex::new(None),
            requests: WorkflowRequestRegistry::new(),
            jobs,
        })
    }

    pub fn add_provider(&self, provider: Arc<dyn DownloadRuntimeProvider>) {
        self.providers.lock().push(provider);
        self.invalidate_cache();
    }

    /// Drop the descriptor cache; it reloads on next use.
    pub fn invalidate_cache(&self) {
        *self.cache.lock() = None;
    }

    pub fn list(&self) -> Vec<DownloadRuntimeDescription> {
        self.with_cache(|cache| cache.values().map(|c| c.description.clone()).collect())
    }

    fn find(&self, id: &str) -> Option<Arc<CachedRuntime>> {
        self.with_cache(|cache| cache.get(id).cloned())
    }

    fn with_cache<T>(&self, f: impl FnOnce(&HashMap<String, Arc<CachedRuntime>>) -> T) -> T {
        let mut cache = self.cache.lock();
        let loaded = cache.get_or_insert_with(|| {
            let providers = self.providers.lock();
            let mut map = HashMap::new();
            for provider in providers.iter() {
                for description in provider.runtimes() {
                    map.insert(
                        description.id.clone(),
                        Arc::new(CachedRuntime { description, provider: Arc::clone(provider) }),
                    );
                }
            }
            map
        });
        f(loaded)
    }

    /// One step of the download-runtime workflow.
    ///
    /// First call (id only): INFO with the license prompts and a fresh
    /// request id. Follow-up echoing the request id with the license
    /// signed: OK plus the id of the scheduled download job. A rejected
    /// license cancels the exchange.
    pub fn download_runtime(&self, request: &DownloadSingleRuntimeRequest) -> WorkflowResponse {
        let Some(runtime) =
            request.runtime_id.as_deref().and_then(|id| self.find(id))
        else {
            return WorkflowResponse::error(NO_EXECUTOR_MESSAGE);
        };

        let request_id = match &request.request_id {
            None => {
                let id = self
                    .requests
                    .issue(Value::String(runtime.description.id.clone()));
                return license_step(&runtime.description).with_request_id(id);
            }
            Some(id) => {
                if self.requests.recall(id).is_none() {
                    return WorkflowResponse::error("Workflow request has expired");
                }
                id.clone()
            }
        };

        match data_bool(&request.data, WORKFLOW_LICENSE_SIGN_ID) {
            Some(true) => {
                self.requests.remove(&request_id);
                let description = runtime.description.clone();
                let executor = runtime.provider.executor();
                let data = request.data.clone();
                info!(runtime = %description.id, "runtime download scheduled");
                let job = self
                    .jobs
                    .schedule(format!("Download runtime: {}", description.name), move |ctx| {
                        async move { executor.download(&description, &data, &ctx).await }
                    });
                WorkflowResponse::ok_with(DOWNLOAD_IN_PROGRESS, Vec::new())
                    .with_request_id(request_id)
                    .with_job_id(job.id)
            }
            Some(false) => {
                self.requests.remove(&request_id);
                WorkflowResponse::cancel()
            }
            // Re-invocation with the license still unanswered: same prompts.
            None => license_step(&runtime.description).with_request_id(request_id),
        }
    }
}

fn license_step(runtime: &DownloadRuntimeDescription) -> WorkflowResponse {
    let license_url = runtime.license_url.clone().unwrap_or_default();
    let mut license = WorkflowItem::prompt_large(
        WORKFLOW_LICENSE_ID,
        "Please approve the following license:",
    )
    .with_content("The license must be accepted before the runtime can be downloaded.");
    if let Some(prompt) = license.prompt.as_mut() {
        prompt.response_type = AttributeKind::None;
    }

    let url_item = WorkflowItem::prompt_small(WORKFLOW_LICENSE_URL_ID, "License URL:")
        .with_content(license_url)
        .with_prompt(WorkflowPrompt::of(AttributeKind::None));

    let sign = WorkflowItem::prompt_small(
        WORKFLOW_LICENSE_SIGN_ID,
        "Do you agree to the license?",
    )
    .with_prompt(WorkflowPrompt::of(AttributeKind::Bool));

    WorkflowResponse::info(INFO_REQUIRED_MESSAGE, vec![license, url_item, sign])
}

#[cfg(test)]
#[path = "runtimes_tests.rs"]
mod tests;
