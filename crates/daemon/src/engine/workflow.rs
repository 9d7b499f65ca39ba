// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow request correlation.
//!
//! Handlers are pure functions of `(data, request_id)` — suspension is the
//! client re-invoking the same method with accumulated answers. The only
//! server-side state a multi-step exchange may keep is what a handler
//! stores here, keyed by request id, and it expires: an abandoned exchange
//! leaks nothing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use steward_core::{Clock, RequestId, SystemClock};

/// How long a pending exchange survives without a follow-up call.
pub const REQUEST_TTL: Duration = Duration::from_secs(600);

struct PendingExchange {
    created: Instant,
    payload: Value,
}

/// Time-expiring store of per-request intermediate state.
pub struct WorkflowRequestRegistry<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    entries: Mutex<HashMap<RequestId, PendingExchange>>,
}

impl WorkflowRequestRegistry<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for WorkflowRequestRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> WorkflowRequestRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        WorkflowRequestRegistry { clock, ttl: REQUEST_TTL, entries: Mutex::new(HashMap::new()) }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a fresh request id holding the given payload. Expired entries
    /// are swept on every insert.
    pub fn issue(&self, payload: Value) -> RequestId {
        let id = RequestId::generate();
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        entries.retain(|_, e| now.saturating_duration_since(e.created) < self.ttl);
        entries.insert(id.clone(), PendingExchange { created: now, payload });
        id
    }

    /// Look up the payload for an echoed request id, refreshing its expiry.
    pub fn recall(&self, id: &RequestId) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(id)?;
        if now.saturating_duration_since(entry.created) >= self.ttl {
            entries.remove(id);
            return None;
        }
        entry.created = now;
        Some(entry.payload.clone())
    }

    /// Drop an exchange once its workflow reaches a terminal response.
    pub fn remove(&self, id: &RequestId) {
        self.entries.lock().remove(id);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
