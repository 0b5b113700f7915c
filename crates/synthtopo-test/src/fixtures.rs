//! Test fixtures for common topology patterns
//!
//! Topologies are built as `serde_json::Value` documents in the on-disk
//! format and can be written to a temporary file for the provider to load.

use std::io::Write;

use serde_json::{json, Map, Value};
use synthtopo_types::{ConnectPoint, DeviceId};
use tempfile::NamedTempFile;

/// Parses a connect point, panicking on malformed input
pub fn cp(s: &str) -> ConnectPoint {
    s.parse()
        .unwrap_or_else(|e| panic!("bad connect point fixture '{s}': {e}"))
}

/// Parses a device id, panicking on malformed input
pub fn dev(s: &str) -> DeviceId {
    s.parse()
        .unwrap_or_else(|e| panic!("bad device id fixture '{s}': {e}"))
}

/// Builds a topology document from device ids and link keys
pub fn topology_document(devices: &[&str], links: &[&str]) -> Value {
    let devices: Map<String, Value> = devices
        .iter()
        .map(|d| ((*d).to_string(), json!({})))
        .collect();
    let links: Map<String, Value> = links
        .iter()
        .map(|l| ((*l).to_string(), json!({})))
        .collect();
    json!({ "devices": devices, "links": links })
}

/// Writes a topology document to a temporary file
///
/// The file is removed when the returned handle is dropped.
pub fn write_topology_file(document: &Value) -> NamedTempFile {
    write_raw_topology_file(&document.to_string())
}

/// Writes arbitrary text to a temporary file, for malformed-input tests
pub fn write_raw_topology_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("temp file: {e}"));
    file.write_all(text.as_bytes())
        .unwrap_or_else(|e| panic!("write topology fixture: {e}"));
    file
}

/// Common topology fixtures
pub mod topology_fixtures {
    use super::*;

    pub const A1: &str = "testprovider:a1";
    pub const A2: &str = "testprovider:a2";
    pub const A3: &str = "testprovider:a3";

    /// Two switches joined on port 1
    pub fn two_switch() -> Value {
        topology_document(&[A1, A2], &["testprovider:a1/1-testprovider:a2/1"])
    }

    /// Three switches in a line: a1/1-a2/1 and a2/2-a3/1
    pub fn chain() -> Value {
        topology_document(
            &[A1, A2, A3],
            &[
                "testprovider:a1/1-testprovider:a2/1",
                "testprovider:a2/2-testprovider:a3/1",
            ],
        )
    }

    /// Devices without links
    pub fn devices_only() -> Value {
        json!({ "devices": { A1: {}, A2: {} } })
    }

    /// Document with neither section
    pub fn empty() -> Value {
        json!({})
    }

    /// Link whose key has three endpoints
    pub fn malformed_link_key() -> Value {
        topology_document(
            &[A1, A2],
            &["testprovider:a1/1-testprovider:a2/1-testprovider:a2/2"],
        )
    }

    /// One port cabled to two different peers
    pub fn shared_endpoint() -> Value {
        topology_document(
            &[A1, A2, A3],
            &[
                "testprovider:a1/1-testprovider:a2/1",
                "testprovider:a1/1-testprovider:a3/1",
            ],
        )
    }

    /// Port cabled to itself
    pub fn self_loop() -> Value {
        topology_document(&[A1], &["testprovider:a1/1-testprovider:a1/1"])
    }

    /// Link to a device that is not declared
    pub fn dangling_link() -> Value {
        topology_document(&[A1], &["testprovider:a1/1-testprovider:a2/1"])
    }
}

#[cfg(test)]
mod tests {
    use super::topology_fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_switch_document() {
        let doc = two_switch();
        assert_eq!(doc["devices"].as_object().unwrap().len(), 2);
        assert!(doc["links"]
            .as_object()
            .unwrap()
            .contains_key("testprovider:a1/1-testprovider:a2/1"));
    }

    #[test]
    fn test_write_topology_file() {
        let file = write_topology_file(&chain());
        let text = std::fs::read_to_string(file.path()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, chain());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(cp("testprovider:a1/3").port().as_u64(), 3);
        assert_eq!(dev(A1).as_str(), A1);
    }
}
