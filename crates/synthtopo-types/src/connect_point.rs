//! Link endpoint addressing.

use crate::{DeviceId, ParseError, PortNumber};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Addressable `(device, port)` pair a link endpoint attaches to.
///
/// Textual form is `<deviceId>/<portNumber>`; equality is structural.
///
/// # Examples
///
/// ```
/// use synthtopo_types::{ConnectPoint, PortNumber};
///
/// let cp: ConnectPoint = "testprovider:a1/1".parse().unwrap();
/// assert_eq!(cp.device_id().as_str(), "testprovider:a1");
/// assert_eq!(cp.port(), PortNumber::new(1));
/// assert_eq!(cp.to_string(), "testprovider:a1/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectPoint {
    device_id: DeviceId,
    port: PortNumber,
}

impl ConnectPoint {
    pub fn new(device_id: DeviceId, port: PortNumber) -> Self {
        Self { device_id, port }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn port(&self) -> PortNumber {
        self.port
    }
}

impl fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

impl FromStr for ConnectPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidConnectPoint(s.to_string());

        let (device, port) = s.rsplit_once('/').ok_or_else(invalid)?;
        let device_id = DeviceId::new(device).map_err(|_| invalid())?;
        let port = port.parse::<PortNumber>().map_err(|_| invalid())?;

        Ok(ConnectPoint::new(device_id, port))
    }
}

impl TryFrom<String> for ConnectPoint {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectPoint> for String {
    fn from(cp: ConnectPoint) -> Self {
        cp.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_display() {
        let cp: ConnectPoint = "testprovider:a2/3".parse().unwrap();
        assert_eq!(cp.device_id().as_str(), "testprovider:a2");
        assert_eq!(cp.port().as_u64(), 3);
        assert_eq!(cp.to_string(), "testprovider:a2/3");
    }

    #[test]
    fn test_structural_equality() {
        let a: ConnectPoint = "a1/1".parse().unwrap();
        let b = ConnectPoint::new(DeviceId::new("a1").unwrap(), PortNumber::new(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["a1", "a1/", "/1", "a1/x", "a1/1/2", "a-1/1"] {
            assert_eq!(
                bad.parse::<ConnectPoint>().unwrap_err(),
                ParseError::InvalidConnectPoint(bad.to_string()),
                "input {bad:?}"
            );
        }
    }
}
