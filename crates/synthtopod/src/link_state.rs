//! Link up/down decisions driven by port-state changes.
//!
//! Per connect point with a link the state is `Up` or `Down`:
//!
//! ```text
//!            disable (link exists)
//!      Up  ─────────────────────────▶  Down
//!       ▲                               │
//!       └───────────────────────────────┘
//!            enable (peer not Down)
//! ```
//!
//! A successful re-enable clears only that port's own down entry. Once both
//! ends of a link have been disabled, each end keeps seeing the other's down
//! entry, so re-enabling either end reports `PeerStillDown` and the link is
//! not re-detected.

use synthtopo_common::{ControllerInterface, LinkTransition, TopoError, TopoResult};
use synthtopo_types::{ConnectPoint, LinkDescription};
use tracing::{debug, info};

use crate::topology::TopologyState;

/// Applies link operations to a topology and reports them to the controller.
///
/// Callers must hold exclusive access to the topology for the whole call;
/// the provider does this with its state lock.
pub struct LinkStateController<'a> {
    state: &'a mut TopologyState,
    controller: &'a dyn ControllerInterface,
}

impl<'a> LinkStateController<'a> {
    pub fn new(state: &'a mut TopologyState, controller: &'a dyn ControllerInterface) -> Self {
        Self { state, controller }
    }

    /// Establishes (or re-establishes) a bidirectional link.
    ///
    /// Emits one `link_detected` per direction and records both table
    /// entries. Repeated calls re-send the detection events; suppressing
    /// duplicates is up to the caller. An endpoint already linked to a
    /// different peer is refused, as is a link from a port to itself.
    pub fn link_up(&mut self, src: &ConnectPoint, dst: &ConnectPoint) -> TopoResult<()> {
        self.state.require_endpoint(src)?;
        self.state.require_endpoint(dst)?;
        if src == dst {
            return Err(TopoError::self_loop(src));
        }
        for (end, far) in [(src, dst), (dst, src)] {
            if let Some(peer) = self.state.link_peer(end) {
                if peer != far {
                    return Err(TopoError::conflicting_link(end, peer));
                }
            }
        }

        let link = LinkDescription::direct(src.clone(), dst.clone());
        self.controller.link_detected(&link);
        self.controller.link_detected(&link.reversed());
        self.state.record_link(src, dst);

        info!("Link up: {} <-> {}", src, dst);
        Ok(())
    }

    /// Handles an administrative port enable/disable.
    ///
    /// The port status notification is always sent for a known port. Unknown
    /// connect points fail with `UnknownEndpoint` before anything is sent or
    /// changed.
    pub fn port_state_change(
        &mut self,
        cp: &ConnectPoint,
        enabled: bool,
    ) -> TopoResult<LinkTransition> {
        let port = self.state.set_port_enabled(cp, enabled)?;
        self.controller.port_status_changed(cp.device_id(), &port);

        if enabled {
            self.port_enabled(cp)
        } else {
            Ok(self.port_disabled(cp))
        }
    }

    fn port_enabled(&mut self, cp: &ConnectPoint) -> TopoResult<LinkTransition> {
        let Some(peer) = self.state.down_peer(cp).cloned() else {
            debug!("{} enabled, link not down", cp);
            return Ok(LinkTransition::Unchanged);
        };

        if self.state.is_down(&peer) {
            info!("{} enabled, waiting for peer {} before restoring link", cp, peer);
            return Ok(LinkTransition::PeerStillDown);
        }

        // The link table is authoritative for the far end.
        let dst = self.state.link_peer(cp).cloned().unwrap_or(peer);
        self.link_up(cp, &dst)?;
        self.state.clear_down(cp);

        Ok(LinkTransition::Up)
    }

    fn port_disabled(&mut self, cp: &ConnectPoint) -> LinkTransition {
        match self.state.mark_down(cp) {
            Some(peer) => {
                info!("Link down: {} <-> {} (disabled at {})", cp, peer, cp);
                LinkTransition::Down
            }
            None => {
                debug!("{} disabled, no link attached", cp);
                LinkTransition::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use synthtopo_types::{DeviceDescription, DeviceId, PortDescription, PortNumber};

    /// Minimal in-module recorder; the integration tests use synthtopo-test.
    #[derive(Default)]
    struct Events {
        links: Mutex<Vec<LinkDescription>>,
        ports: Mutex<Vec<(DeviceId, PortDescription)>>,
    }

    impl ControllerInterface for Events {
        fn device_connected(&self, _: &DeviceId, _: &DeviceDescription) {}

        fn update_ports(&self, _: &DeviceId, _: &[PortDescription]) {}

        fn port_status_changed(&self, device_id: &DeviceId, port: &PortDescription) {
            self.ports.lock().push((device_id.clone(), *port));
        }

        fn link_detected(&self, link: &LinkDescription) {
            self.links.lock().push(link.clone());
        }
    }

    fn cp(s: &str) -> ConnectPoint {
        s.parse().unwrap()
    }

    fn state() -> TopologyState {
        let mut state = TopologyState::new();
        for name in ["a1", "a2", "a3"] {
            let id = DeviceId::new(name).unwrap();
            state.insert_device(DeviceDescription::synthetic_switch(id.clone()));
            state.insert_ports(
                id,
                (1..5)
                    .map(|n| PortDescription::new(PortNumber::new(n), true))
                    .collect(),
            );
        }
        state
    }

    fn linked_state(events: &Events) -> TopologyState {
        let mut state = state();
        LinkStateController::new(&mut state, events)
            .link_up(&cp("a1/1"), &cp("a2/1"))
            .unwrap();
        events.links.lock().clear();
        state
    }

    #[test]
    fn test_link_up_both_directions() {
        let events = Events::default();
        let mut state = state();

        LinkStateController::new(&mut state, &events)
            .link_up(&cp("a1/1"), &cp("a2/1"))
            .unwrap();

        assert_eq!(state.link_peer(&cp("a1/1")), Some(&cp("a2/1")));
        assert_eq!(state.link_peer(&cp("a2/1")), Some(&cp("a1/1")));

        let links = events.links.lock();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], LinkDescription::direct(cp("a1/1"), cp("a2/1")));
        assert_eq!(links[1], LinkDescription::direct(cp("a2/1"), cp("a1/1")));
    }

    #[test]
    fn test_link_up_repeated_resends_events() {
        let events = Events::default();
        let mut state = linked_state(&events);

        LinkStateController::new(&mut state, &events)
            .link_up(&cp("a1/1"), &cp("a2/1"))
            .unwrap();

        assert_eq!(events.links.lock().len(), 2);
        assert_eq!(state.link_entry_count(), 2);
    }

    #[test]
    fn test_link_up_unknown_endpoint() {
        let events = Events::default();
        let mut state = state();

        let err = LinkStateController::new(&mut state, &events)
            .link_up(&cp("a1/1"), &cp("a9/1"))
            .unwrap_err();

        assert!(matches!(err, TopoError::UnknownEndpoint { ref connect_point } if *connect_point == cp("a9/1")));
        assert!(events.links.lock().is_empty());
        assert_eq!(state.link_entry_count(), 0);
    }

    #[test]
    fn test_link_up_refuses_second_peer() {
        let events = Events::default();
        let mut state = linked_state(&events);
        let mut ctrl = LinkStateController::new(&mut state, &events);

        let err = ctrl.link_up(&cp("a1/1"), &cp("a3/1")).unwrap_err();
        assert!(matches!(
            err,
            TopoError::ConflictingLink { ref connect_point, ref peer }
                if *connect_point == cp("a1/1") && *peer == cp("a2/1")
        ));

        // The far end is checked too.
        let err = ctrl.link_up(&cp("a3/1"), &cp("a2/1")).unwrap_err();
        assert!(matches!(err, TopoError::ConflictingLink { ref connect_point, .. } if *connect_point == cp("a2/1")));

        assert!(events.links.lock().is_empty());
        assert_eq!(state.link_entry_count(), 2);
        assert_eq!(state.link_peer(&cp("a2/1")), Some(&cp("a1/1")));
        assert_eq!(state.link_peer(&cp("a3/1")), None);
    }

    #[test]
    fn test_link_up_reversed_pair_is_same_link() {
        let events = Events::default();
        let mut state = linked_state(&events);

        LinkStateController::new(&mut state, &events)
            .link_up(&cp("a2/1"), &cp("a1/1"))
            .unwrap();

        assert_eq!(events.links.lock().len(), 2);
        assert_eq!(state.link_entry_count(), 2);
    }

    #[test]
    fn test_link_up_refuses_self_loop() {
        let events = Events::default();
        let mut state = state();

        let err = LinkStateController::new(&mut state, &events)
            .link_up(&cp("a1/1"), &cp("a1/1"))
            .unwrap_err();

        assert!(matches!(err, TopoError::SelfLoop { .. }));
        assert!(events.links.lock().is_empty());
        assert_eq!(state.link_entry_count(), 0);
    }

    #[test]
    fn test_disable_marks_down_without_touching_links() {
        let events = Events::default();
        let mut state = linked_state(&events);

        let transition = LinkStateController::new(&mut state, &events)
            .port_state_change(&cp("a1/1"), false)
            .unwrap();

        assert_eq!(transition, LinkTransition::Down);
        assert_eq!(state.down_peer(&cp("a1/1")), Some(&cp("a2/1")));
        assert_eq!(state.link_peer(&cp("a1/1")), Some(&cp("a2/1")));
        assert_eq!(state.link_entry_count(), 2);
        assert!(events.links.lock().is_empty());
        assert!(!state.port(&cp("a1/1")).unwrap().enabled);
    }

    #[test]
    fn test_disable_then_enable_restores_link() {
        let events = Events::default();
        let mut state = linked_state(&events);
        let mut ctrl = LinkStateController::new(&mut state, &events);

        ctrl.port_state_change(&cp("a1/1"), false).unwrap();
        let transition = ctrl.port_state_change(&cp("a1/1"), true).unwrap();

        assert_eq!(transition, LinkTransition::Up);
        assert!(!state.is_down(&cp("a1/1")));
        assert_eq!(events.links.lock().len(), 2);
        assert_eq!(events.ports.lock().len(), 2);
    }

    #[test]
    fn test_both_ends_down_then_one_enabled() {
        let events = Events::default();
        let mut state = linked_state(&events);
        let mut ctrl = LinkStateController::new(&mut state, &events);

        ctrl.port_state_change(&cp("a1/1"), false).unwrap();
        ctrl.port_state_change(&cp("a2/1"), false).unwrap();
        let transition = ctrl.port_state_change(&cp("a1/1"), true).unwrap();

        assert_eq!(transition, LinkTransition::PeerStillDown);
        assert!(events.links.lock().is_empty());
        assert_eq!(state.down_peer(&cp("a1/1")), Some(&cp("a2/1")));
        assert_eq!(state.down_peer(&cp("a2/1")), Some(&cp("a1/1")));
    }

    #[test]
    fn test_both_ends_down_stay_down() {
        let events = Events::default();
        let mut state = linked_state(&events);
        let mut ctrl = LinkStateController::new(&mut state, &events);

        ctrl.port_state_change(&cp("a1/1"), false).unwrap();
        ctrl.port_state_change(&cp("a2/1"), false).unwrap();

        // Each end still sees the other's down entry, so neither restores.
        for end in ["a1/1", "a2/1", "a1/1"] {
            let transition = ctrl.port_state_change(&cp(end), true).unwrap();
            assert_eq!(transition, LinkTransition::PeerStillDown, "enabling {end}");
        }

        assert!(events.links.lock().is_empty());
        assert_eq!(state.down_link_count(), 2);
        assert!(state.port(&cp("a1/1")).unwrap().enabled);
        assert!(state.port(&cp("a2/1")).unwrap().enabled);
    }

    #[test]
    fn test_one_end_down_twice_then_enabled() {
        let events = Events::default();
        let mut state = linked_state(&events);
        let mut ctrl = LinkStateController::new(&mut state, &events);

        assert_eq!(
            ctrl.port_state_change(&cp("a2/1"), false).unwrap(),
            LinkTransition::Down
        );
        assert_eq!(
            ctrl.port_state_change(&cp("a2/1"), false).unwrap(),
            LinkTransition::Down
        );
        assert_eq!(
            ctrl.port_state_change(&cp("a2/1"), true).unwrap(),
            LinkTransition::Up
        );

        let links = events.links.lock();
        assert_eq!(links[0], LinkDescription::direct(cp("a2/1"), cp("a1/1")));
        assert_eq!(links[1], LinkDescription::direct(cp("a1/1"), cp("a2/1")));
        assert_eq!(state.down_link_count(), 0);
    }

    #[test]
    fn test_enable_port_without_down_link() {
        let events = Events::default();
        let mut state = linked_state(&events);

        let transition = LinkStateController::new(&mut state, &events)
            .port_state_change(&cp("a1/1"), true)
            .unwrap();

        assert_eq!(transition, LinkTransition::Unchanged);
        assert!(events.links.lock().is_empty());
        assert_eq!(events.ports.lock().len(), 1);
    }

    #[test]
    fn test_disable_unlinked_port() {
        let events = Events::default();
        let mut state = linked_state(&events);

        let transition = LinkStateController::new(&mut state, &events)
            .port_state_change(&cp("a3/2"), false)
            .unwrap();

        assert_eq!(transition, LinkTransition::Unchanged);
        assert_eq!(state.down_link_count(), 0);
        let ports = events.ports.lock();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].1, PortDescription::new(PortNumber::new(2), false));
    }

    #[test]
    fn test_port_state_change_unknown_endpoint() {
        let events = Events::default();
        let mut state = linked_state(&events);

        let err = LinkStateController::new(&mut state, &events)
            .port_state_change(&cp("a1/7"), false)
            .unwrap_err();

        assert!(matches!(err, TopoError::UnknownEndpoint { .. }));
        assert!(events.ports.lock().is_empty());
        assert_eq!(state.down_link_count(), 0);
    }
}
