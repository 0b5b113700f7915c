//! Recording controller and registry
//!
//! Captures every controller callback in arrival order so tests can assert
//! on both the events and their sequence.

use std::sync::Arc;

use parking_lot::Mutex;
use synthtopo_common::{ControllerInterface, ProviderRegistry};
use synthtopo_types::{
    ConnectPoint, DeviceDescription, DeviceId, LinkDescription, PortDescription, ProviderId,
};

/// One controller callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    DeviceConnected {
        device_id: DeviceId,
        description: DeviceDescription,
    },
    PortsUpdated {
        device_id: DeviceId,
        ports: Vec<PortDescription>,
    },
    PortStatusChanged {
        device_id: DeviceId,
        port: PortDescription,
    },
    LinkDetected(LinkDescription),
}

impl ControllerEvent {
    /// Short label used in ordering checks
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeviceConnected { .. } => "device",
            Self::PortsUpdated { .. } => "ports",
            Self::PortStatusChanged { .. } => "port-status",
            Self::LinkDetected(_) => "link",
        }
    }
}

/// Controller recording every event it receives
#[derive(Debug, Default)]
pub struct RecordingController {
    events: Mutex<Vec<ControllerEvent>>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<ControllerEvent> {
        self.events.lock().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Drops everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Takes the recorded events, leaving the recorder empty
    pub fn drain(&self) -> Vec<ControllerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Detected links as `(src, dst)` pairs, in order
    pub fn detected_links(&self) -> Vec<(ConnectPoint, ConnectPoint)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::LinkDetected(link) => Some((link.src.clone(), link.dst.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn connected_devices(&self) -> Vec<DeviceId> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::DeviceConnected { device_id, .. } => Some(device_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Port status notifications as `(device, port)` pairs
    pub fn port_status_changes(&self) -> Vec<(DeviceId, PortDescription)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::PortStatusChanged { device_id, port } => {
                    Some((device_id.clone(), *port))
                }
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ControllerEvent) {
        self.events.lock().push(event);
    }
}

impl ControllerInterface for RecordingController {
    fn device_connected(&self, device_id: &DeviceId, description: &DeviceDescription) {
        self.push(ControllerEvent::DeviceConnected {
            device_id: device_id.clone(),
            description: description.clone(),
        });
    }

    fn update_ports(&self, device_id: &DeviceId, ports: &[PortDescription]) {
        self.push(ControllerEvent::PortsUpdated {
            device_id: device_id.clone(),
            ports: ports.to_vec(),
        });
    }

    fn port_status_changed(&self, device_id: &DeviceId, port: &PortDescription) {
        self.push(ControllerEvent::PortStatusChanged {
            device_id: device_id.clone(),
            port: *port,
        });
    }

    fn link_detected(&self, link: &LinkDescription) {
        self.push(ControllerEvent::LinkDetected(link.clone()));
    }
}

/// Registry handing out a shared [`RecordingController`]
///
/// Keeps the full registration history rather than a set, so double
/// registration shows up in tests.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    controller: Arc<RecordingController>,
    registered: Mutex<Vec<ProviderId>>,
    unregistered: Mutex<Vec<ProviderId>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self) -> &RecordingController {
        &self.controller
    }

    pub fn registrations(&self) -> Vec<ProviderId> {
        self.registered.lock().clone()
    }

    pub fn unregistrations(&self) -> Vec<ProviderId> {
        self.unregistered.lock().clone()
    }

    /// True if the provider registered more times than it unregistered
    pub fn is_registered(&self, provider: &ProviderId) -> bool {
        let up = self.registered.lock().iter().filter(|p| *p == provider).count();
        let down = self
            .unregistered
            .lock()
            .iter()
            .filter(|p| *p == provider)
            .count();
        up > down
    }
}

impl ProviderRegistry for RecordingRegistry {
    fn register(&self, provider: &ProviderId) -> Arc<dyn ControllerInterface> {
        self.registered.lock().push(provider.clone());
        self.controller.clone()
    }

    fn unregister(&self, provider: &ProviderId) {
        self.unregistered.lock().push(provider.clone());
    }
}
