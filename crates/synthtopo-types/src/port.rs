//! Port number and port description.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Port index on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNumber(u64);

impl PortNumber {
    /// Creates a port number.
    pub const fn new(number: u64) -> Self {
        PortNumber(number)
    }

    /// Returns the raw port number.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PortNumber {
    fn from(number: u64) -> Self {
        PortNumber(number)
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PortNumber {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', which is not a port number.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidPortNumber(s.to_string()));
        }
        s.parse::<u64>()
            .map(PortNumber)
            .map_err(|_| ParseError::InvalidPortNumber(s.to_string()))
    }
}

/// Port as announced to the controller: number plus enabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortDescription {
    pub number: PortNumber,
    pub enabled: bool,
}

impl PortDescription {
    pub const fn new(number: PortNumber, enabled: bool) -> Self {
        Self { number, enabled }
    }
}
