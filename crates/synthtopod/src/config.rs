//! Daemon settings for synthtopod
//!
//! Loads and validates settings from a TOML file.
//! Default location: /etc/synthtopo/synthtopod.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use synthtopo_common::{TopoError, TopoResult};
use synthtopo_types::ProviderId;
use tracing::{info, warn};

/// Default settings file location.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/synthtopo/synthtopod.toml";

/// Topology source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologySettings {
    /// Path of the JSON topology description
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Port range size N: every device gets ports 1..N-1
    #[serde(default = "default_ports_per_device")]
    pub ports_per_device: u32,
}

/// Provider identity towards the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Device URI scheme owned by this provider
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Provider name
    #[serde(default = "default_provider_id")]
    pub id: String,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Complete synthtopod settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub topology: TopologySettings,

    #[serde(default)]
    pub provider: ProviderIdentity,

    #[serde(default)]
    pub logging: LoggingSettings,
}

// Default functions
fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/synthtopo/topology.json")
}

fn default_ports_per_device() -> u32 {
    5
}

fn default_scheme() -> String {
    "testprovider".to_string()
}

fn default_provider_id() -> String {
    "org.synthtopo.provider".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TopologySettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            ports_per_device: default_ports_per_device(),
        }
    }
}

impl Default for ProviderIdentity {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            id: default_provider_id(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ProviderSettings {
    /// Load settings from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> TopoResult<Self> {
        let path = path.as_ref();

        let settings = match fs::read_to_string(path) {
            Ok(content) => {
                info!("Loading settings from {}", path.display());
                Self::from_toml_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Settings file {} not found, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(TopoError::Io(e)),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> TopoResult<Self> {
        toml::from_str(content)
            .map_err(|e| TopoError::invalid_settings("settings", format!("Failed to parse: {}", e)))
    }

    /// Serialize settings to TOML
    pub fn to_toml_string(&self) -> TopoResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            TopoError::invalid_settings("settings", format!("Failed to serialize: {}", e))
        })
    }

    /// Validate settings
    pub fn validate(&self) -> TopoResult<()> {
        if self.topology.ports_per_device == 0 {
            return Err(TopoError::invalid_settings(
                "topology.ports_per_device",
                "must be at least 1",
            ));
        }

        if self.provider.scheme.is_empty() {
            return Err(TopoError::invalid_settings(
                "provider.scheme",
                "must not be empty",
            ));
        }

        if self.provider.id.is_empty() {
            return Err(TopoError::invalid_settings("provider.id", "must not be empty"));
        }

        Ok(())
    }

    /// Provider identity used for registration
    pub fn provider_id(&self) -> ProviderId {
        ProviderId::new(&self.provider.scheme, &self.provider.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.topology.ports_per_device, 5);
        assert_eq!(
            settings.topology.config_path,
            PathBuf::from("/etc/synthtopo/topology.json")
        );
        assert_eq!(settings.provider.scheme, "testprovider");
        assert_eq!(settings.logging.level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = ProviderSettings::from_toml_str(
            r#"
            [topology]
            config_path = "/tmp/topo.json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.topology.config_path, PathBuf::from("/tmp/topo.json"));
        assert_eq!(settings.topology.ports_per_device, 5);
        assert_eq!(settings.provider, ProviderIdentity::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ProviderSettings::from_toml_str("[topology\nports_per_device = ").unwrap_err();
        assert!(matches!(err, TopoError::InvalidSettings { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_ports() {
        let mut settings = ProviderSettings::default();
        settings.topology.ports_per_device = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_scheme() {
        let mut settings = ProviderSettings::default();
        settings.provider.scheme.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = ProviderSettings::load_or_default("/nonexistent/synthtopod.toml").unwrap();
        assert_eq!(settings, ProviderSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[topology]\nports_per_device = 9\n[logging]\nlevel = \"debug\"").unwrap();

        let settings = ProviderSettings::load_or_default(file.path()).unwrap();
        assert_eq!(settings.topology.ports_per_device, 9);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_shipped_settings_file() {
        let text = include_str!("../../../config/synthtopod.toml");
        let settings = ProviderSettings::from_toml_str(text).unwrap();
        assert_eq!(settings, ProviderSettings::default());
    }

    #[test]
    fn test_round_trip_toml() {
        let settings = ProviderSettings::default();
        let text = settings.to_toml_string().unwrap();
        assert_eq!(ProviderSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_provider_id() {
        let id = ProviderSettings::default().provider_id();
        assert_eq!(id.scheme, "testprovider");
        assert_eq!(id.id, "org.synthtopo.provider");
    }
}
