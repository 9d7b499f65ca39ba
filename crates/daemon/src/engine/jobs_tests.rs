// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

/// Records job notifications for assertions.
#[derive(Default)]
struct RecordingListener {
    added: Mutex<Vec<JobProgress>>,
    removed: Mutex<Vec<(JobProgress, Status)>>,
    changed: Mutex<Vec<JobProgress>>,
}

impl JobListener for RecordingListener {
    fn job_added(&self, job: &JobProgress) {
        self.added.lock().push(job.clone());
    }

    fn job_changed(&self, job: &JobProgress) {
        self.changed.lock().push(job.clone());
    }

    fn job_removed(&self, job: &JobProgress, status: &Status) {
        self.removed.lock().push((job.clone(), status.clone()));
    }
}

#[tokio::test]
async fn added_fires_synchronously_at_schedule_time() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    let handle = manager.schedule("Start server: wfly", |_ctx| async { Status::ok() });
    // No await between schedule and this assertion: the added notification
    // is synchronous so a client can immediately see the new job.
    assert_eq!(listener.added.lock().len(), 1);
    assert_eq!(listener.added.lock()[0].id, handle.id);
    assert_eq!(listener.added.lock()[0].name, "Start server: wfly");

    handle.wait().await;
}

#[tokio::test]
async fn add_and_remove_are_paired_one_to_one() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| manager.schedule(format!("job {i}"), |_ctx| async { Status::ok() }))
        .collect();
    for handle in &handles {
        handle.wait().await;
    }

    let added = listener.added.lock();
    let removed = listener.removed.lock();
    assert_eq!(added.len(), 8);
    assert_eq!(removed.len(), 8);
    for job in added.iter() {
        assert_eq!(removed.iter().filter(|(r, _)| r.id == job.id).count(), 1);
    }
    // The live set is empty after all removals.
    assert!(manager.jobs().is_empty());
}

#[tokio::test]
async fn final_status_reaches_the_removal_listener() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    let handle =
        manager.schedule("doomed", |_ctx| async { Status::error("launch failed: no binary") });
    let status = handle.wait().await;
    assert!(status.is_error());

    let removed = listener.removed.lock();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].1.message, "launch failed: no binary");
}

#[tokio::test]
async fn panicking_unit_is_captured_as_error_and_removed() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    #[allow(clippy::panic)]
    let handle = manager.schedule("exploder", |_ctx| async { panic!("boom") });
    let status = handle.wait().await;
    assert!(status.is_error());
    // Never stuck in the live set.
    assert!(manager.jobs().is_empty());
    assert_eq!(listener.removed.lock().len(), 1);
}

#[tokio::test]
async fn cancellation_is_cooperative() {
    let manager = JobManager::new();
    let handle = manager.schedule("long poll", |ctx| async move {
        loop {
            if ctx.cancelled() {
                return Status::cancel();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    assert!(manager.cancel(&handle.id));
    let status = handle.wait().await;
    assert_eq!(status.severity, steward_core::Severity::Cancel);
}

#[tokio::test]
async fn cancel_unknown_job_returns_false() {
    let manager = JobManager::new();
    assert!(!manager.cancel(&JobId::new("job-missing")));
}

#[tokio::test]
async fn progress_updates_are_clamped_and_reported() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    let handle = manager.schedule("Download runtime: wildfly", |ctx| async move {
        ctx.set_progress(50.0);
        ctx.set_progress(250.0);
        Status::ok()
    });
    handle.wait().await;

    let changed = listener.changed.lock();
    assert_eq!(changed.len(), 2);
    assert_eq!(changed[0].progress, 50.0);
    assert_eq!(changed[1].progress, 100.0);
}

#[tokio::test]
async fn pool_queues_oversubscription_without_dropping_jobs() {
    let manager = JobManager::new();
    let handles: Vec<_> = (0..POOL_SIZE * 3)
        .map(|i| {
            manager.schedule(format!("burst {i}"), |_ctx| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Status::ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.wait().await.is_ok());
    }
    assert!(manager.jobs().is_empty());
}

#[tokio::test]
async fn blocking_shape_has_the_same_semantics() {
    let manager = JobManager::new();
    let listener = Arc::new(RecordingListener::default());
    manager.add_listener(listener.clone());

    let handle = manager.schedule_blocking("sync unit", |ctx| {
        assert!(!ctx.cancelled());
        Status::ok_with("done")
    });
    let status = handle.wait().await;
    assert_eq!(status.message, "done");
    assert_eq!(listener.added.lock().len(), 1);
    assert_eq!(listener.removed.lock().len(), 1);
}
