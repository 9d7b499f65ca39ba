// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestration engine: job scheduler, pollers, publish tracking,
//! server lifecycle, workflows, and downloadable runtimes.

pub mod actions;
pub mod discovery;
pub mod jobs;
pub mod notify;
pub mod poller;
pub mod publish;
pub mod runtimes;
pub mod servers;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::sync::Arc;

use self::jobs::JobManager;
use self::notify::{ClientNotifier, EventNotifier};
use self::runtimes::DownloadRuntimeModel;
use self::servers::ServerModel;

/// Everything a connection handler needs, cheaply cloneable.
#[derive(Clone)]
pub struct Engine {
    pub servers: Arc<ServerModel>,
    pub jobs: Arc<JobManager>,
    pub runtimes: Arc<DownloadRuntimeModel>,
    pub events: Arc<EventNotifier>,
}

impl Engine {
    /// Engine wired to a broadcast event notifier (the production shape).
    pub fn new() -> Self {
        let events = EventNotifier::new();
        let notifier: Arc<dyn ClientNotifier> = events.clone();
        let jobs = JobManager::new();
        jobs.add_listener(events.clone());
        let servers = ServerModel::new(Arc::clone(&jobs), notifier);
        let runtimes = DownloadRuntimeModel::new(Arc::clone(&jobs));
        Engine { servers, jobs, runtimes, events }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
