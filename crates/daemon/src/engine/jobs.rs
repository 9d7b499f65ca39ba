// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job scheduler.
//!
//! Named units of work run on a bounded worker pool. A job enters the live
//! set and fires `job_added` synchronously at schedule time; it leaves the
//! set exactly once — on completion, success or failure — with `job_removed`
//! carrying the final status. Failure is terminal for a job instance; there
//! is no retry. Cancellation is cooperative: the unit polls its token.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use steward_core::{JobId, JobProgress, Status, PROGRESS_UNKNOWN};
use tokio::sync::{watch, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Worker pool size. Oversubscription queues; no backpressure is exposed.
pub const POOL_SIZE: usize = 5;

/// Observer of job set changes. Calls are delivered on whatever task
/// performed the change — listener code must not block.
pub trait JobListener: Send + Sync {
    fn job_added(&self, job: &JobProgress);
    fn job_changed(&self, _job: &JobProgress) {}
    fn job_removed(&self, job: &JobProgress, status: &Status);
}

/// Cancellable progress handle passed into every scheduled unit.
pub struct JobContext {
    id: JobId,
    name: String,
    cancel: CancellationToken,
    manager: Weak<JobManager>,
}

impl JobContext {
    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once cancellation has been requested. Units must poll this
    /// and unwind; nothing interrupts them forcibly.
    pub fn cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Report progress (0–100). Out-of-range values are clamped.
    pub fn set_progress(&self, value: f64) {
        if let Some(manager) = self.manager.upgrade() {
            manager.set_progress(&self.id, value.clamp(0.0, 100.0));
        }
    }
}

/// Handle returned from `schedule`; lets callers await completion.
pub struct JobHandle {
    pub id: JobId,
    pub name: String,
    finished: watch::Receiver<Option<Status>>,
}

impl JobHandle {
    /// Wait for the job's final status.
    pub async fn wait(&self) -> Status {
        let mut rx = self.finished.clone();
        loop {
            if let Some(status) = rx.borrow().clone() {
                return status;
            }
            if rx.changed().await.is_err() {
                return Status::error("job runner dropped without completing");
            }
        }
    }
}

struct ActiveJob {
    name: String,
    progress: f64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, ActiveJob>,
    listeners: Vec<Arc<dyn JobListener>>,
}

/// Tracks the live job set and runs units on the worker pool.
pub struct JobManager {
    inner: Mutex<Inner>,
    permits: Arc<Semaphore>,
}

impl JobManager {
    pub fn new() -> Arc<Self> {
        Arc::new(JobManager {
            inner: Mutex::new(Inner::default()),
            permits: Arc::new(Semaphore::new(POOL_SIZE)),
        })
    }

    pub fn add_listener(self: &Arc<Self>, listener: Arc<dyn JobListener>) {
        self.inner.lock().listeners.push(listener);
    }

    /// Snapshot of the live job set.
    pub fn jobs(&self) -> Vec<JobProgress> {
        let inner = self.inner.lock();
        inner
            .jobs
            .iter()
            .map(|(id, job)| JobProgress {
                id: id.clone(),
                name: job.name.clone(),
                progress: job.progress,
            })
            .collect()
    }

    /// Request cooperative cancellation. Returns false for unknown ids.
    pub fn cancel(&self, id: &JobId) -> bool {
        let inner = self.inner.lock();
        match inner.jobs.get(id) {
            Some(job) => {
                job.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Schedule an async unit of work.
    pub fn schedule<F, Fut>(self: &Arc<Self>, name: impl Into<String>, unit: F) -> JobHandle
    where
        F: FnOnce(JobContext) -> Fut + Send + 'static,
        Fut: Future<Output = Status> + Send + 'static,
    {
        let (ctx, handle, finished) = self.register(name.into());
        let manager = Arc::clone(self);
        let id = ctx.id.clone();
        tokio::spawn(async move {
            let _permit = manager.permits.acquire().await.ok();
            // Run the unit on its own task so a panic is captured as an
            // ERROR status instead of taking the runner down with it.
            let status = match tokio::spawn(unit(ctx)).await {
                Ok(status) => status,
                Err(err) => Status::error(format!("job failed: {err}")),
            };
            manager.complete(&id, status.clone());
            let _ = finished.send(Some(status));
        });
        handle
    }

    /// Schedule a blocking unit of work on the blocking pool.
    ///
    /// Same semantics as [`schedule`](Self::schedule), second call shape.
    pub fn schedule_blocking<F>(self: &Arc<Self>, name: impl Into<String>, unit: F) -> JobHandle
    where
        F: FnOnce(&JobContext) -> Status + Send + 'static,
    {
        let (ctx, handle, finished) = self.register(name.into());
        let manager = Arc::clone(self);
        let id = ctx.id.clone();
        tokio::spawn(async move {
            let _permit = manager.permits.acquire().await.ok();
            let status = match tokio::task::spawn_blocking(move || unit(&ctx)).await {
                Ok(status) => status,
                Err(err) => Status::error(format!("job failed: {err}")),
            };
            manager.complete(&id, status.clone());
            let _ = finished.send(Some(status));
        });
        handle
    }

    fn register(
        self: &Arc<Self>,
        name: String,
    ) -> (JobContext, JobHandle, watch::Sender<Option<Status>>) {
        let id = JobId::generate();
        let cancel = CancellationToken::new();
        {
            let mut inner = self.inner.lock();
            inner.jobs.insert(
                id.clone(),
                ActiveJob {
                    name: name.clone(),
                    progress: PROGRESS_UNKNOWN,
                    cancel: cancel.clone(),
                },
            );
        }
        debug!(job_id = %id, job_name = %name, "job scheduled");

        let snapshot = JobProgress::new(id.clone(), name.clone());
        for listener in self.listeners() {
            listener.job_added(&snapshot);
        }

        let (tx, rx) = watch::channel(None);
        let ctx = JobContext {
            id: id.clone(),
            name: name.clone(),
            cancel,
            manager: Arc::downgrade(self),
        };
        let handle = JobHandle { id, name, finished: rx };
        (ctx, handle, tx)
    }

    fn set_progress(&self, id: &JobId, value: f64) {
        let snapshot = {
            let mut inner = self.inner.lock();
            match inner.jobs.get_mut(id) {
                Some(job) => {
                    job.progress = value;
                    Some(JobProgress { id: id.clone(), name: job.name.clone(), progress: value })
                }
                None => None,
            }
        };
        if let Some(snapshot) = snapshot {
            for listener in self.listeners() {
                listener.job_changed(&snapshot);
            }
        }
    }

    fn complete(&self, id: &JobId, status: Status) {
        let removed = {
            let mut inner = self.inner.lock();
            inner.jobs.remove(id)
        };
        let Some(job) = removed else {
            return;
        };
        debug!(job_id = %id, status = %status, "job complete");
        let snapshot = JobProgress { id: id.clone(), name: job.name, progress: job.progress };
        for listener in self.listeners() {
            listener.job_removed(&snapshot, &status);
        }
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        self.inner.lock().listeners.clone()
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
