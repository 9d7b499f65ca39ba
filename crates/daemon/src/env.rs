// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::bootstrap::BootstrapError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: STEWARD_STATE_DIR > XDG_STATE_HOME/steward >
/// ~/.local/state/steward
pub fn state_dir() -> Result<PathBuf, BootstrapError> {
    if let Ok(dir) = std::env::var("STEWARD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("steward"));
    }
    match dirs::home_dir() {
        Some(home) => Ok(home.join(".local/state/steward")),
        None => Err(BootstrapError::NoStateDir),
    }
}

/// Socket path override (`STEWARD_SOCKET`), else `<state_dir>/stewardd.sock`.
pub fn socket_path(state_dir: &std::path::Path) -> PathBuf {
    match std::env::var("STEWARD_SOCKET") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => state_dir.join("stewardd.sock"),
    }
}
