//! Topology description parser.
//!
//! File format:
//! ```json
//! {
//!   "devices": {
//!     "testprovider:a1": {},
//!     "testprovider:a2": {}
//!   },
//!   "links": {
//!     "testprovider:a1/1-testprovider:a2/1": {}
//!   }
//! }
//! ```
//!
//! Device metadata and link values are ignored. Both sections are optional;
//! entries are returned in document order.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value};
use synthtopo_common::{TopoError, TopoResult};
use synthtopo_types::{ConnectPoint, DeviceId, LinkKey};
use tracing::{debug, info};

/// Top-level key of the device section.
pub const DEVICES_SECTION: &str = "devices";

/// Top-level key of the link section.
pub const LINKS_SECTION: &str = "links";

/// Parsed topology description: what the builder has to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologySpec {
    /// Devices to create, in document order.
    pub devices: Vec<DeviceId>,
    /// `(src, dst)` link pairs to bring up, in document order.
    pub links: Vec<(ConnectPoint, ConnectPoint)>,
}

impl TopologySpec {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.links.is_empty()
    }
}

/// Reads and parses a topology file.
///
/// The file is opened, parsed completely and closed before returning.
pub fn load_topology_file(path: impl AsRef<Path>) -> TopoResult<TopologySpec> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| TopoError::config_read(path, e))?;
    let reader = BufReader::new(file);
    let json: Value = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            TopoError::config_read(path, e.into())
        } else {
            TopoError::config_parse("document", format!("{}: {}", path.display(), e))
        }
    })?;

    let spec = parse_topology_value(&json)?;
    info!(
        "Loaded topology from {}: {} devices, {} links",
        path.display(),
        spec.devices.len(),
        spec.links.len()
    );
    Ok(spec)
}

/// Parses a topology description from JSON text.
pub fn parse_topology_str(text: &str) -> TopoResult<TopologySpec> {
    let json: Value = serde_json::from_str(text)
        .map_err(|e| TopoError::config_parse("document", e.to_string()))?;
    parse_topology_value(&json)
}

/// Parses an already decoded topology description.
pub fn parse_topology_value(json: &Value) -> TopoResult<TopologySpec> {
    let Value::Object(root) = json else {
        return Err(TopoError::config_parse(
            "document",
            "topology description is not a JSON object",
        ));
    };

    let devices = match section(root, DEVICES_SECTION)? {
        Some(entries) => parse_devices(entries)?,
        None => Vec::new(),
    };
    let links = match section(root, LINKS_SECTION)? {
        Some(entries) => parse_links(entries)?,
        None => Vec::new(),
    };

    Ok(TopologySpec { devices, links })
}

/// Looks up an optional object-valued section. `null` counts as absent.
fn section<'a>(root: &'a Map<String, Value>, name: &str) -> TopoResult<Option<&'a Map<String, Value>>> {
    match root.get(name) {
        None | Some(Value::Null) => {
            debug!("Section '{}' absent", name);
            Ok(None)
        }
        Some(Value::Object(entries)) => Ok(Some(entries)),
        Some(other) => Err(TopoError::config_parse(
            name,
            format!("expected an object, found {}", json_kind(other)),
        )),
    }
}

fn parse_devices(entries: &Map<String, Value>) -> TopoResult<Vec<DeviceId>> {
    entries
        .keys()
        .map(|key| {
            key.parse::<DeviceId>()
                .map_err(|e| TopoError::config_parse(DEVICES_SECTION, e.to_string()))
        })
        .collect()
}

fn parse_links(entries: &Map<String, Value>) -> TopoResult<Vec<(ConnectPoint, ConnectPoint)>> {
    entries
        .keys()
        .map(|key| {
            key.parse::<LinkKey>()
                .map(LinkKey::into_pair)
                .map_err(|e| TopoError::config_parse(LINKS_SECTION, e.to_string()))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
