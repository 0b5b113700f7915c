//! Provider identity and mastership roles.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a provider towards the controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId {
    /// URI scheme of the devices this provider owns (e.g. `testprovider`).
    pub scheme: String,
    /// Provider name, conventionally a reverse-DNS string.
    pub id: String,
}

impl ProviderId {
    pub fn new(scheme: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.id)
    }
}

/// Mastership role a controller instance holds for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MastershipRole {
    Master,
    Standby,
    #[default]
    None,
}

impl fmt::Display for MastershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MastershipRole::Master => write!(f, "master"),
            MastershipRole::Standby => write!(f, "standby"),
            MastershipRole::None => write!(f, "none"),
        }
    }
}

impl FromStr for MastershipRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "master" => Ok(MastershipRole::Master),
            "standby" => Ok(MastershipRole::Standby),
            "none" => Ok(MastershipRole::None),
            _ => Err(ParseError::InvalidMastershipRole(s.to_string())),
        }
    }
}
