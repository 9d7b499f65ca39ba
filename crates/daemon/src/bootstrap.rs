// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: state directory, lock file, socket, engine wiring.

use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::engine::Engine;
use crate::env;
use crate::listener::Listener;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("No state directory available")]
    NoStateDir,

    #[error("Another daemon already holds the lock")]
    LockFailed(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolved daemon paths.
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, BootstrapError> {
        let state_dir = env::state_dir()?;
        Ok(Config {
            socket_path: env::socket_path(&state_dir),
            lock_path: state_dir.join("stewardd.lock"),
            state_dir,
        })
    }
}

/// A started daemon: engine plus the listener ready to run.
pub struct Daemon {
    pub engine: Engine,
    pub listener: Listener,
    pub shutdown: CancellationToken,
    // Held for the daemon's lifetime; releasing it frees the lock.
    _lock_file: std::fs::File,
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon").finish_non_exhaustive()
    }
}

pub async fn startup(config: &Config) -> Result<Daemon, BootstrapError> {
    std::fs::create_dir_all(&config.state_dir)?;
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Acquire the lock before touching anything else. Open without
    // truncating so a failed lock does not wipe the running daemon's PID.
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(BootstrapError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // We hold the lock, so any existing socket file is stale.
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let unix = UnixListener::bind(&config.socket_path)?;
    info!(socket = %config.socket_path.display(), "listening");

    let engine = Engine::new();
    let shutdown = CancellationToken::new();
    let listener = Listener::new(unix, engine.clone(), shutdown.clone());
    Ok(Daemon { engine, listener, shutdown, _lock_file: lock_file })
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
