//! Synthetic network topology provider.
//!
//! This crate implements the `synthtopod` daemon, which builds an in-memory
//! switch topology from a declarative JSON description, announces it to a
//! controller and keeps link state consistent as ports are administratively
//! enabled and disabled.
//!
//! # Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`loader`] | Parses the topology file into device ids and link pairs |
//! | [`builder`] | Creates devices, ports and initial links |
//! | [`link_state`] | Decides link up/down transitions on port changes |
//! | [`topology`] | Authoritative device, port, link and down-link tables |
//! | [`provider`] | Lock-guarded provider exposed to the controller |
//! | [`config`] | Daemon settings (TOML) |
//! | [`controller`] | Logging controller used by the standalone daemon |
//! | [`command`] | Inbound port-state commands read by the daemon |
//!
//! # Example
//!
//! ```ignore
//! use synthtopod::{ProviderSettings, TopologyProvider};
//!
//! let provider = TopologyProvider::new(ProviderSettings::default());
//! provider.activate(&registry)?;
//! provider.change_port_state(&device_id, PortNumber::new(1), false)?;
//! ```

pub mod builder;
pub mod command;
pub mod config;
pub mod controller;
pub mod link_state;
pub mod loader;
pub mod provider;
pub mod topology;

pub use builder::TopologyBuilder;
pub use command::{Command, CommandParseError};
pub use config::{LoggingSettings, ProviderIdentity, ProviderSettings, TopologySettings};
pub use controller::{EventCounts, LoggingController, LoggingRegistry};
pub use link_state::LinkStateController;
pub use loader::{load_topology_file, parse_topology_str, parse_topology_value, TopologySpec};
pub use provider::TopologyProvider;
pub use topology::TopologyState;
