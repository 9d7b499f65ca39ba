// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State pollers.
//!
//! A poller probes an externally observable signal until the server has
//! reached the requested direction (became available / became unavailable),
//! the timeout elapses, or the owning job is cancelled. The poller never
//! mutates server state — it delivers exactly one terminal outcome to its
//! listener, and a timed-out poll still delivers its (negative) result so
//! the state machine is never left waiting.

use std::time::Duration;

use steward_core::Availability;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// How a poller observes the server.
#[derive(Debug, Clone)]
pub enum PollStrategy {
    /// Resolves immediately to the requested direction — used when no real
    /// signal is available and success is assumed on request.
    AutomaticSuccess,
    /// Repeatedly issues an HTTP request: any response satisfies UP,
    /// connection refusal satisfies DOWN.
    WebPort { url: Url },
    /// Never resolves proactively; state is learned through other means
    /// (e.g. process exit).
    NoOp,
}

/// A stateless descriptor of one poll invocation.
#[derive(Debug, Clone)]
pub struct PollerSpec {
    pub strategy: PollStrategy,
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollerSpec {
    pub fn automatic_success() -> Self {
        PollerSpec {
            strategy: PollStrategy::AutomaticSuccess,
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn web_port(url: Url) -> Self {
        PollerSpec {
            strategy: PollStrategy::WebPort { url },
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn noop() -> Self {
        PollerSpec {
            strategy: PollStrategy::NoOp,
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Terminal outcome of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The requested direction was observed.
    Reached,
    /// The timeout elapsed without observing it.
    TimedOut,
    /// The owning job was cancelled.
    Cancelled,
}

impl PollOutcome {
    /// Resolve to an availability: a poll has no third result — anything
    /// short of reaching the requested direction resolves to its opposite.
    pub fn resolve(self, requested: Availability) -> Availability {
        match self {
            PollOutcome::Reached => requested,
            PollOutcome::TimedOut | PollOutcome::Cancelled => requested.opposite(),
        }
    }
}

/// Run a poll on its own background task. The returned receiver delivers
/// exactly one outcome.
pub fn spawn_poll(
    spec: PollerSpec,
    direction: Availability,
    cancel: CancellationToken,
) -> oneshot::Receiver<PollOutcome> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = run_poll(spec, direction, cancel).await;
        debug!(?outcome, %direction, "poll resolved");
        let _ = tx.send(outcome);
    });
    rx
}

async fn run_poll(
    spec: PollerSpec,
    direction: Availability,
    cancel: CancellationToken,
) -> PollOutcome {
    match spec.strategy {
        PollStrategy::AutomaticSuccess => PollOutcome::Reached,
        PollStrategy::NoOp => {
            tokio::select! {
                _ = cancel.cancelled() => PollOutcome::Cancelled,
                _ = tokio::time::sleep(spec.timeout) => PollOutcome::TimedOut,
            }
        }
        PollStrategy::WebPort { ref url } => {
            poll_web_port(url, direction, spec.timeout, spec.interval, cancel).await
        }
    }
}

async fn poll_web_port(
    url: &Url,
    direction: Availability,
    timeout: Duration,
    interval: Duration,
    cancel: CancellationToken,
) -> PollOutcome {
    let client = match reqwest::Client::builder()
        .connect_timeout(interval)
        .timeout(interval.max(Duration::from_secs(1)))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!(%err, "web poller could not build HTTP client");
            return PollOutcome::TimedOut;
        }
    };

    let deadline = Instant::now() + timeout;
    loop {
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        if probe(&client, url, direction).await {
            return PollOutcome::Reached;
        }
        if Instant::now() + interval > deadline {
            return PollOutcome::TimedOut;
        }
        tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// One probe: did we observe the requested direction?
async fn probe(client: &reqwest::Client, url: &Url, direction: Availability) -> bool {
    match client.get(url.clone()).send().await {
        // Any HTTP-level response means something is listening.
        Ok(_) => direction == Availability::Up,
        // Connection refused means nothing is listening.
        Err(err) if err.is_connect() => direction == Availability::Down,
        // Timeouts and other transport errors are not a definitive signal.
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
