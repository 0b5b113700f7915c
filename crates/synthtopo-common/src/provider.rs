//! Capabilities a topology provider exposes to the controller.

use std::fmt;

use synthtopo_types::{
    ApplicationId, DeviceId, FlowRule, FlowRuleBatchOperation, MastershipRole, PortNumber,
    ProviderId,
};

use crate::TopoResult;

/// Outcome of a port-state change for the link attached to the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTransition {
    /// No link action: the port has no link, or its link was not down.
    Unchanged,
    /// The link was marked administratively down.
    Down,
    /// The link was re-detected in both directions.
    Up,
    /// The port came back but its peer is still down.
    PeerStillDown,
}

impl fmt::Display for LinkTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkTransition::Unchanged => "unchanged",
            LinkTransition::Down => "down",
            LinkTransition::Up => "up",
            LinkTransition::PeerStillDown => "peer-still-down",
        };
        write!(f, "{}", s)
    }
}

/// Base trait for providers.
pub trait Provider: Send + Sync {
    /// Returns the identity used when registering with the controller.
    fn id(&self) -> &ProviderId;
}

/// Device-level capabilities.
pub trait DeviceProvider: Provider {
    /// Asks the provider to re-probe a device.
    fn trigger_probe(&self, device_id: &DeviceId);

    /// Notifies the provider that the local mastership role changed.
    fn role_changed(&self, device_id: &DeviceId, role: MastershipRole);

    /// Returns true if the device can be reached.
    fn is_reachable(&self, device_id: &DeviceId) -> bool;

    /// Administratively enables or disables a port.
    ///
    /// This is the runtime entry point of the provider.
    fn change_port_state(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        enable: bool,
    ) -> TopoResult<LinkTransition>;
}

/// Link-level capabilities. Links are pushed, so there is nothing to pull.
pub trait LinkProvider: Provider {}

/// Flow-rule capabilities.
pub trait FlowRuleProvider: Provider {
    fn apply_flow_rules(&self, rules: &[FlowRule]);

    fn remove_flow_rules(&self, rules: &[FlowRule]);

    fn remove_rules_by_id(&self, app_id: ApplicationId, rules: &[FlowRule]);

    fn execute_batch(&self, batch: &FlowRuleBatchOperation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_transition_display() {
        assert_eq!(LinkTransition::Up.to_string(), "up");
        assert_eq!(LinkTransition::PeerStillDown.to_string(), "peer-still-down");
        assert_eq!(LinkTransition::Unchanged.to_string(), "unchanged");
    }
}
