//! Controller used when synthtopod runs standalone.
//!
//! No external controller is attached in that mode, so every event is
//! written to the log and counted.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use synthtopo_common::{ControllerInterface, ProviderRegistry};
use synthtopo_types::{DeviceDescription, DeviceId, LinkDescription, PortDescription, ProviderId};
use tracing::{info, warn};

/// Event counters of a [`LoggingController`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub devices_connected: usize,
    pub port_updates: usize,
    pub port_status_changes: usize,
    pub links_detected: usize,
}

/// Controller that logs every event it receives.
#[derive(Debug, Default)]
pub struct LoggingController {
    devices_connected: AtomicUsize,
    port_updates: AtomicUsize,
    port_status_changes: AtomicUsize,
    links_detected: AtomicUsize,
}

impl LoggingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> EventCounts {
        EventCounts {
            devices_connected: self.devices_connected.load(Ordering::Relaxed),
            port_updates: self.port_updates.load(Ordering::Relaxed),
            port_status_changes: self.port_status_changes.load(Ordering::Relaxed),
            links_detected: self.links_detected.load(Ordering::Relaxed),
        }
    }
}

impl ControllerInterface for LoggingController {
    fn device_connected(&self, device_id: &DeviceId, description: &DeviceDescription) {
        self.devices_connected.fetch_add(1, Ordering::Relaxed);
        info!(
            "deviceConnected {} type={} manufacturer={:?} chassis={}",
            device_id, description.device_type, description.manufacturer, description.chassis_id
        );
    }

    fn update_ports(&self, device_id: &DeviceId, ports: &[PortDescription]) {
        self.port_updates.fetch_add(1, Ordering::Relaxed);
        let numbers: Vec<String> = ports.iter().map(|p| p.number.to_string()).collect();
        info!("updatePorts {} [{}]", device_id, numbers.join(","));
    }

    fn port_status_changed(&self, device_id: &DeviceId, port: &PortDescription) {
        self.port_status_changes.fetch_add(1, Ordering::Relaxed);
        let status = if port.enabled { "enabled" } else { "disabled" };
        info!("portStatusChanged {}/{} {}", device_id, port.number, status);
    }

    fn link_detected(&self, link: &LinkDescription) {
        self.links_detected.fetch_add(1, Ordering::Relaxed);
        info!("linkDetected {}", link);
    }
}

/// Registry handing out a shared [`LoggingController`].
#[derive(Debug, Default)]
pub struct LoggingRegistry {
    controller: Arc<LoggingController>,
    registered: Mutex<HashSet<ProviderId>>,
}

impl LoggingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self) -> &Arc<LoggingController> {
        &self.controller
    }

    pub fn is_registered(&self, provider: &ProviderId) -> bool {
        self.registered.lock().contains(provider)
    }
}

impl ProviderRegistry for LoggingRegistry {
    fn register(&self, provider: &ProviderId) -> Arc<dyn ControllerInterface> {
        if !self.registered.lock().insert(provider.clone()) {
            warn!("Provider {} registered twice", provider);
        }
        info!("Registered provider {}", provider);
        self.controller.clone()
    }

    fn unregister(&self, provider: &ProviderId) {
        if self.registered.lock().remove(provider) {
            info!("Unregistered provider {}", provider);
        } else {
            warn!("Provider {} was not registered", provider);
        }
    }
}
