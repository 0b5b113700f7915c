//! Error types for topology provider operations.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use std::path::PathBuf;

use synthtopo_types::{ConnectPoint, DeviceId};
use thiserror::Error;

/// Result type alias for topology provider operations.
pub type TopoResult<T> = Result<T, TopoError>;

/// Errors that can occur while loading, building or mutating a topology.
#[derive(Debug, Error)]
pub enum TopoError {
    /// Topology file missing or unreadable.
    #[error("Failed to read topology file '{}': {source}", path.display())]
    ConfigRead {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Topology description is malformed.
    #[error("Invalid topology description in section '{section}': {message}")]
    ConfigParse {
        /// Section being parsed (`document`, `devices` or `links`).
        section: String,
        /// Error message.
        message: String,
    },

    /// A connect point that was never created by the builder.
    #[error("Unknown endpoint '{connect_point}'")]
    UnknownEndpoint {
        /// The offending connect point.
        connect_point: ConnectPoint,
    },

    /// A link endpoint already attached to a different peer.
    #[error("Endpoint '{connect_point}' is already linked to '{peer}'")]
    ConflictingLink {
        /// The endpoint being linked again.
        connect_point: ConnectPoint,
        /// Its existing peer.
        peer: ConnectPoint,
    },

    /// A link whose two ends are the same connect point.
    #[error("Link from '{connect_point}' to itself")]
    SelfLoop {
        /// The connect point used for both ends.
        connect_point: ConnectPoint,
    },

    /// A device that was never created by the builder.
    #[error("Unknown device '{device}'")]
    UnknownDevice {
        /// The offending device id.
        device: DeviceId,
    },

    /// The provider has not been activated (no controller registration).
    #[error("Provider is not active")]
    NotActive,

    /// Provider settings failed validation.
    #[error("Invalid settings for {field}: {message}")]
    InvalidSettings {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// IO error outside of topology loading (settings files, command input).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl TopoError {
    /// Creates a topology read error.
    pub fn config_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a topology parse error.
    pub fn config_parse(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            section: section.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown endpoint error.
    pub fn unknown_endpoint(connect_point: &ConnectPoint) -> Self {
        Self::UnknownEndpoint {
            connect_point: connect_point.clone(),
        }
    }

    /// Creates a conflicting link error.
    pub fn conflicting_link(connect_point: &ConnectPoint, peer: &ConnectPoint) -> Self {
        Self::ConflictingLink {
            connect_point: connect_point.clone(),
            peer: peer.clone(),
        }
    }

    /// Creates a self-loop error.
    pub fn self_loop(connect_point: &ConnectPoint) -> Self {
        Self::SelfLoop {
            connect_point: connect_point.clone(),
        }
    }

    /// Creates an unknown device error.
    pub fn unknown_device(device: &DeviceId) -> Self {
        Self::UnknownDevice {
            device: device.clone(),
        }
    }

    /// Creates an invalid settings error.
    pub fn invalid_settings(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error happened while loading the topology
    /// description (read or parse). Such errors leave the provider
    /// registered with an empty topology.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TopoError::ConfigRead { .. } | TopoError::ConfigParse { .. }
        )
    }
}
