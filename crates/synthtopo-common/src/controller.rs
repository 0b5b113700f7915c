//! Controller-facing boundary.
//!
//! The provider calls into the controller through [`ControllerInterface`];
//! the controller never calls back through it. Implementations are shared
//! across threads, so all methods take `&self`.

use std::sync::Arc;

use synthtopo_types::{DeviceDescription, DeviceId, LinkDescription, PortDescription, ProviderId};

/// Event sink of the hosting controller.
pub trait ControllerInterface: Send + Sync {
    /// A device has been discovered.
    fn device_connected(&self, device_id: &DeviceId, description: &DeviceDescription);

    /// Full port list of a device.
    fn update_ports(&self, device_id: &DeviceId, ports: &[PortDescription]);

    /// A single port changed its enabled state.
    fn port_status_changed(&self, device_id: &DeviceId, port: &PortDescription);

    /// One direction of a link has been detected.
    fn link_detected(&self, link: &LinkDescription);
}

/// Registration boundary of the hosting controller.
pub trait ProviderRegistry: Send + Sync {
    /// Registers a provider and returns the service it reports to.
    fn register(&self, provider: &ProviderId) -> Arc<dyn ControllerInterface>;

    /// Withdraws a provider registration.
    fn unregister(&self, provider: &ProviderId);
}
