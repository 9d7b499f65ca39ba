// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct MarkerDiscovery;

impl InstallationDiscovery for MarkerDiscovery {
    fn identify(&self, path: &Path) -> Option<String> {
        path.join("marker.txt").exists().then(|| "fake.type".to_string())
    }
}

#[test]
fn missing_home_attribute_fails() {
    let status = validate_server_home(&MarkerDiscovery, &Attributes::new(), "fake.type");
    assert!(status.is_error());
    assert_eq!(status.message, "Server type not found at given server home");
}

#[test]
fn nonexistent_directory_fails() {
    let mut attributes = Attributes::new();
    attributes.set(ATTR_SERVER_HOME_DIR, "/nonexistent/server/home");
    let status = validate_server_home(&MarkerDiscovery, &attributes, "fake.type");
    assert!(status.is_error());
}

#[test]
fn identified_installation_validates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), b"").unwrap();

    let mut attributes = Attributes::new();
    attributes.set(ATTR_SERVER_HOME_DIR, dir.path().to_str().unwrap());

    assert!(validate_server_home(&MarkerDiscovery, &attributes, "fake.type").is_ok());
    // A different type id at the same home does not validate.
    assert!(validate_server_home(&MarkerDiscovery, &attributes, "other.type").is_error());
}
