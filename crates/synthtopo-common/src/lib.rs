//! Common infrastructure shared by the synthetic topology provider.
//!
//! - [`ControllerInterface`]: Callbacks the provider uses to report devices,
//!   ports and links to the hosting controller
//! - [`ProviderRegistry`]: Registration boundary that hands out a
//!   [`ControllerInterface`] to a provider
//! - [`DeviceProvider`], [`LinkProvider`], [`FlowRuleProvider`]: Capabilities
//!   a provider exposes to the controller
//! - [`SyncMap`]: Map wrapper whose lookups never create entries
//! - [`error`]: Error types for provider operations
//!
//! # Architecture
//!
//! The controller drives the provider, the provider reports back:
//!
//! 1. The provider registers with a [`ProviderRegistry`] and receives a
//!    [`ControllerInterface`]
//! 2. The topology is built and announced: devices, then ports, then links
//! 3. The controller calls [`DeviceProvider::change_port_state`] at runtime
//! 4. The provider reports port status and link re-detection events
//!
//! # Example
//!
//! ```ignore
//! use synthtopo_common::{ControllerInterface, TopoResult};
//! use synthtopo_types::{DeviceDescription, DeviceId};
//!
//! fn announce(ctrl: &dyn ControllerInterface, id: DeviceId) -> TopoResult<()> {
//!     ctrl.device_connected(&id, &DeviceDescription::synthetic_switch(id.clone()));
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
pub mod provider;
pub mod sync_map;

pub use controller::{ControllerInterface, ProviderRegistry};
pub use error::{TopoError, TopoResult};
pub use provider::{DeviceProvider, FlowRuleProvider, LinkProvider, LinkTransition, Provider};
pub use sync_map::{SyncMap, SyncMapError};
