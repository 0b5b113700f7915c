//! Device identity and description.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a switch, conventionally `scheme:name`.
///
/// The identifier is opaque apart from two reserved characters: `/`
/// separates the device from the port in a [`ConnectPoint`](crate::ConnectPoint)
/// and `-` separates the two endpoints of a [`LinkKey`](crate::LinkKey).
///
/// # Examples
///
/// ```
/// use synthtopo_types::DeviceId;
///
/// let id: DeviceId = "testprovider:a1".parse().unwrap();
/// assert_eq!(id.scheme(), Some("testprovider"));
/// assert_eq!(id.name(), "a1");
///
/// assert!("".parse::<DeviceId>().is_err());
/// assert!("a1/1".parse::<DeviceId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device id, rejecting empty ids and reserved separators.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
        let id = id.into();
        let valid = !id.is_empty()
            && !id.contains(['/', '-'])
            && !id.chars().any(char::is_whitespace);
        if valid {
            Ok(DeviceId(id))
        } else {
            Err(ParseError::InvalidDeviceId(id))
        }
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URI scheme, if the id has one.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scheme, _)| scheme)
    }

    /// Returns the part after the scheme (the whole id if there is none).
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(_, name)| name)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceId::new(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DeviceId::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Declared device type. Only switches are synthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Switch,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Switch => write!(f, "switch"),
        }
    }
}

/// Chassis identifier reported with a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChassisId(pub u64);

impl fmt::Display for ChassisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Description of a device as announced to the controller.
///
/// The vendor/hardware/software strings are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescription {
    pub uri: DeviceId,
    pub device_type: DeviceType,
    pub manufacturer: String,
    pub hw_version: String,
    pub sw_version: String,
    pub serial_number: String,
    pub chassis_id: ChassisId,
}

impl DeviceDescription {
    /// Manufacturer string reported for synthesised switches.
    pub const SYNTHETIC_MANUFACTURER: &'static str = "test";

    /// Describes a synthesised switch: fixed manufacturer, blank versions,
    /// chassis id 1.
    pub fn synthetic_switch(id: DeviceId) -> Self {
        Self {
            uri: id,
            device_type: DeviceType::Switch,
            manufacturer: Self::SYNTHETIC_MANUFACTURER.to_string(),
            hw_version: String::new(),
            sw_version: String::new(),
            serial_number: String::new(),
            chassis_id: ChassisId(1),
        }
    }
}
