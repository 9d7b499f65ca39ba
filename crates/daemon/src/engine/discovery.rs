// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installation discovery collaborator interface.
//!
//! Delegates validating a server-home attribute call into an
//! implementation of this trait; the on-disk discovery logic itself lives
//! outside the daemon core.

use std::path::Path;

use steward_core::{Attributes, Status};

/// Attribute naming the directory a server is installed in.
pub const ATTR_SERVER_HOME_DIR: &str = "server.home.dir";

pub trait InstallationDiscovery: Send + Sync {
    /// Identify which server type, if any, is installed at the given
    /// directory. Returns the server type id.
    fn identify(&self, path: &Path) -> Option<String>;

    /// Whether the directory holds a valid installation of the given type.
    fn validates(&self, path: &Path, server_type_id: &str) -> bool {
        self.identify(path).as_deref() == Some(server_type_id)
    }
}

/// Validate a candidate server's home directory against discovery.
///
/// The standard create-time check a delegate performs when its type is
/// identified by an installation on disk.
pub fn validate_server_home(
    discovery: &dyn InstallationDiscovery,
    attributes: &Attributes,
    server_type_id: &str,
) -> Status {
    let failed = Status::error("Server type not found at given server home");
    let Some(home) = attributes.get_string(ATTR_SERVER_HOME_DIR) else {
        return failed;
    };
    let path = Path::new(home);
    if !path.is_dir() {
        return failed;
    }
    if !discovery.validates(path, server_type_id) {
        return failed;
    }
    Status::ok()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
