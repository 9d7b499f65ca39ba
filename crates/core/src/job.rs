// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity and progress reporting.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for one scheduled job.
    ///
    /// Generated at schedule time; a job id never reappears in the live set
    /// after the job's removal notification has fired.
    pub struct JobId("job-");
}

/// Progress value meaning "not known".
pub const PROGRESS_UNKNOWN: f64 = -1.0;

/// Snapshot of one live job for `getJobs` and job notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub id: JobId,
    pub name: String,
    /// 0–100, or [`PROGRESS_UNKNOWN`].
    pub progress: f64,
}

impl JobProgress {
    pub fn new(id: JobId, name: impl Into<String>) -> Self {
        JobProgress { id, name: name.into(), progress: PROGRESS_UNKNOWN }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
