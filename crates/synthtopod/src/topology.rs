//! Authoritative topology tables.
//!
//! Holds the device, port, link and down-link tables built at startup. The
//! tables are only mutated through [`TopologyBuilder`](crate::TopologyBuilder)
//! and [`LinkStateController`](crate::LinkStateController); everything else
//! reads.
//!
//! Invariants:
//! - `links[a] == b` implies `links[b] == a`
//! - every key of `down_links` is also a key of `links`
//! - link entries are never removed, only marked down

use std::collections::HashMap;

use synthtopo_common::{SyncMap, TopoError, TopoResult};
use synthtopo_types::{ConnectPoint, DeviceDescription, DeviceId, PortDescription};

/// In-memory topology.
#[derive(Debug, Clone, Default)]
pub struct TopologyState {
    devices: SyncMap<DeviceId, DeviceDescription>,
    ports: SyncMap<DeviceId, Vec<PortDescription>>,
    links: SyncMap<ConnectPoint, ConnectPoint>,
    down_links: SyncMap<ConnectPoint, ConnectPoint>,
}

impl TopologyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_device(&mut self, description: DeviceDescription) {
        self.devices.insert(description.uri.clone(), description);
    }

    pub(crate) fn insert_ports(&mut self, device_id: DeviceId, ports: Vec<PortDescription>) {
        self.ports.insert(device_id, ports);
    }

    /// Records both directions of a link.
    pub(crate) fn record_link(&mut self, src: &ConnectPoint, dst: &ConnectPoint) {
        self.links.insert(src.clone(), dst.clone());
        self.links.insert(dst.clone(), src.clone());
    }

    /// Copies the live link entry of `cp` into the down-link set.
    ///
    /// Returns the peer, or `None` (and no change) if `cp` has no link.
    pub(crate) fn mark_down(&mut self, cp: &ConnectPoint) -> Option<ConnectPoint> {
        let peer = self.links.get(cp)?.clone();
        self.down_links.insert(cp.clone(), peer.clone());
        Some(peer)
    }

    /// Removes `cp` from the down-link set only; the peer's entry is kept.
    pub(crate) fn clear_down(&mut self, cp: &ConnectPoint) -> Option<ConnectPoint> {
        self.down_links.remove(cp)
    }

    /// Sets the enabled flag of an existing port and returns its new description.
    pub(crate) fn set_port_enabled(
        &mut self,
        cp: &ConnectPoint,
        enabled: bool,
    ) -> TopoResult<PortDescription> {
        let ports = self
            .ports
            .require_mut(cp.device_id())
            .map_err(|_| TopoError::unknown_endpoint(cp))?;
        let port = ports
            .iter_mut()
            .find(|p| p.number == cp.port())
            .ok_or_else(|| TopoError::unknown_endpoint(cp))?;

        port.enabled = enabled;
        Ok(*port)
    }

    /// Fails with `UnknownEndpoint` unless `cp` names a created port.
    pub fn require_endpoint(&self, cp: &ConnectPoint) -> TopoResult<&PortDescription> {
        self.port(cp).ok_or_else(|| TopoError::unknown_endpoint(cp))
    }

    /// Returns the description of a device.
    pub fn device(&self, device_id: &DeviceId) -> TopoResult<&DeviceDescription> {
        self.devices
            .require(device_id)
            .map_err(|_| TopoError::unknown_device(device_id))
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    /// Returns the ports of a device.
    pub fn ports(&self, device_id: &DeviceId) -> Option<&[PortDescription]> {
        self.ports.get(device_id).map(Vec::as_slice)
    }

    /// Number of devices with a port list.
    pub fn port_list_count(&self) -> usize {
        self.ports.len()
    }

    /// Returns the port a connect point refers to.
    pub fn port(&self, cp: &ConnectPoint) -> Option<&PortDescription> {
        self.ports(cp.device_id())?
            .iter()
            .find(|p| p.number == cp.port())
    }

    /// Returns the far end of the link attached to `cp`.
    pub fn link_peer(&self, cp: &ConnectPoint) -> Option<&ConnectPoint> {
        self.links.get(cp)
    }

    /// Returns the down-link entry of `cp`.
    pub fn down_peer(&self, cp: &ConnectPoint) -> Option<&ConnectPoint> {
        self.down_links.get(cp)
    }

    /// Returns true if `cp` is in the down-link set.
    pub fn is_down(&self, cp: &ConnectPoint) -> bool {
        self.down_links.contains_key(cp)
    }

    /// Number of directed link entries (two per link).
    pub fn link_entry_count(&self) -> usize {
        self.links.len()
    }

    pub fn down_link_count(&self) -> usize {
        self.down_links.len()
    }

    /// Copy of the link table.
    pub fn links(&self) -> HashMap<ConnectPoint, ConnectPoint> {
        self.links.snapshot()
    }

    /// Copy of the down-link set.
    pub fn down_links(&self) -> HashMap<ConnectPoint, ConnectPoint> {
        self.down_links.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use synthtopo_types::PortNumber;

    fn cp(s: &str) -> ConnectPoint {
        s.parse().unwrap()
    }

    fn state_with_two_devices() -> TopologyState {
        let mut state = TopologyState::new();
        for name in ["a1", "a2"] {
            let id = DeviceId::new(name).unwrap();
            state.insert_device(DeviceDescription::synthetic_switch(id.clone()));
            let ports = (1..5)
                .map(|n| PortDescription::new(PortNumber::new(n), true))
                .collect();
            state.insert_ports(id, ports);
        }
        state
    }

    #[test]
    fn test_record_link_is_symmetric() {
        let mut state = state_with_two_devices();
        state.record_link(&cp("a1/1"), &cp("a2/1"));

        assert_eq!(state.link_peer(&cp("a1/1")), Some(&cp("a2/1")));
        assert_eq!(state.link_peer(&cp("a2/1")), Some(&cp("a1/1")));
        assert_eq!(state.link_entry_count(), 2);
    }

    #[test]
    fn test_mark_down_requires_link() {
        let mut state = state_with_two_devices();
        assert_eq!(state.mark_down(&cp("a1/2")), None);
        assert_eq!(state.down_link_count(), 0);

        state.record_link(&cp("a1/1"), &cp("a2/1"));
        assert_eq!(state.mark_down(&cp("a1/1")), Some(cp("a2/1")));
        assert!(state.is_down(&cp("a1/1")));
        assert!(!state.is_down(&cp("a2/1")));
        // Link table untouched.
        assert_eq!(state.link_entry_count(), 2);
    }

    #[test]
    fn test_clear_down_leaves_peer() {
        let mut state = state_with_two_devices();
        state.record_link(&cp("a1/1"), &cp("a2/1"));
        state.mark_down(&cp("a1/1"));
        state.mark_down(&cp("a2/1"));

        assert_eq!(state.clear_down(&cp("a1/1")), Some(cp("a2/1")));
        assert!(!state.is_down(&cp("a1/1")));
        assert!(state.is_down(&cp("a2/1")));
    }

    #[test]
    fn test_set_port_enabled() {
        let mut state = state_with_two_devices();

        let port = state.set_port_enabled(&cp("a1/3"), false).unwrap();
        assert!(!port.enabled);
        assert!(!state.port(&cp("a1/3")).unwrap().enabled);
        assert!(state.port(&cp("a1/2")).unwrap().enabled);
    }

    #[test]
    fn test_unknown_endpoints() {
        let mut state = state_with_two_devices();

        assert!(matches!(
            state.set_port_enabled(&cp("a9/1"), false),
            Err(TopoError::UnknownEndpoint { .. })
        ));
        assert!(matches!(
            state.set_port_enabled(&cp("a1/5"), false),
            Err(TopoError::UnknownEndpoint { .. })
        ));
        assert!(state.require_endpoint(&cp("a1/0")).is_err());
        assert!(state.require_endpoint(&cp("a1/4")).is_ok());
    }

    #[test]
    fn test_device_lookup() {
        let state = state_with_two_devices();
        let id = DeviceId::new("a1").unwrap();
        assert_eq!(state.device(&id).unwrap().uri, id);

        let missing = DeviceId::new("a3").unwrap();
        assert!(matches!(
            state.device(&missing),
            Err(TopoError::UnknownDevice { .. })
        ));
        assert_eq!(state.device_count(), 2);
        assert_eq!(state.port_list_count(), 2);
    }
}
