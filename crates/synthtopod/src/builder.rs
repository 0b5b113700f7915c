//! Topology construction from a parsed topology description.

use std::collections::{HashMap, HashSet};

use synthtopo_common::{ControllerInterface, TopoError, TopoResult};
use synthtopo_types::{ConnectPoint, DeviceDescription, DeviceId, PortDescription, PortNumber};
use tracing::{debug, info, instrument};

use crate::link_state::LinkStateController;
use crate::loader::TopologySpec;
use crate::topology::TopologyState;

/// Default port range size: ports 1..4 on every device.
pub const DEFAULT_PORTS_PER_DEVICE: u32 = 5;

/// Creates devices, ports and links and announces them to the controller.
///
/// Construction order is fixed: all devices, then all port lists, then all
/// links. Link endpoints are validated up front so an invalid description
/// publishes nothing.
#[derive(Debug, Clone, Copy)]
pub struct TopologyBuilder {
    ports_per_device: u32,
}

impl TopologyBuilder {
    /// Creates a builder giving every device ports `1..ports_per_device-1`.
    pub fn new(ports_per_device: u32) -> Self {
        Self { ports_per_device }
    }

    /// Port list every device receives, all enabled.
    pub fn port_template(&self) -> Vec<PortDescription> {
        (1..u64::from(self.ports_per_device))
            .map(|n| PortDescription::new(PortNumber::new(n), true))
            .collect()
    }

    /// Builds the topology and emits the discovery events.
    #[instrument(skip(self, spec, controller), fields(devices = spec.devices.len(), links = spec.links.len()))]
    pub fn build(
        &self,
        spec: &TopologySpec,
        controller: &dyn ControllerInterface,
    ) -> TopoResult<TopologyState> {
        self.validate(spec)?;

        let mut state = TopologyState::new();

        for device_id in &spec.devices {
            let description = DeviceDescription::synthetic_switch(device_id.clone());
            controller.device_connected(device_id, &description);
            state.insert_device(description);
            debug!("Device connected: {}", device_id);
        }

        let ports = self.port_template();
        for device_id in &spec.devices {
            controller.update_ports(device_id, &ports);
            state.insert_ports(device_id.clone(), ports.clone());
        }

        let mut links = LinkStateController::new(&mut state, controller);
        for (src, dst) in &spec.links {
            links.link_up(src, dst)?;
        }

        info!(
            "Topology built: {} devices, {} ports each, {} links",
            state.device_count(),
            ports.len(),
            spec.links.len()
        );
        Ok(state)
    }

    /// Checks that every link endpoint refers to a port that will exist and
    /// that no port is cabled to itself or to two different peers.
    fn validate(&self, spec: &TopologySpec) -> TopoResult<()> {
        let devices: HashSet<&DeviceId> = spec.devices.iter().collect();
        let mut peers: HashMap<&ConnectPoint, &ConnectPoint> = HashMap::new();
        let check = |cp: &ConnectPoint| {
            let port = cp.port().as_u64();
            let in_range = port >= 1 && port < u64::from(self.ports_per_device);
            if devices.contains(cp.device_id()) && in_range {
                Ok(())
            } else {
                Err(TopoError::unknown_endpoint(cp))
            }
        };

        for (src, dst) in &spec.links {
            check(src)?;
            check(dst)?;
            if src == dst {
                return Err(TopoError::self_loop(src));
            }
            for (end, far) in [(src, dst), (dst, src)] {
                match peers.insert(end, far) {
                    Some(previous) if previous != far => {
                        return Err(TopoError::conflicting_link(end, previous));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PORTS_PER_DEVICE)
    }
}
