//! TopologyProvider - the component the controller talks to.
//!
//! Owns the topology behind a single lock. Every port-state change runs its
//! read-check-write sequence and its notifications under that lock, so
//! concurrent callers toggling the same connect point are serialized.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use synthtopo_common::{
    ControllerInterface, DeviceProvider, FlowRuleProvider, LinkProvider, LinkTransition, Provider,
    ProviderRegistry, TopoError, TopoResult,
};
use synthtopo_types::{
    ApplicationId, ConnectPoint, DeviceDescription, DeviceId, FlowRule, FlowRuleBatchOperation,
    MastershipRole, PortDescription, PortNumber, ProviderId,
};
use tracing::{debug, error, info, instrument, warn};

use crate::builder::TopologyBuilder;
use crate::config::ProviderSettings;
use crate::link_state::LinkStateController;
use crate::loader;
use crate::topology::TopologyState;

/// Synthetic topology provider.
///
/// Lifecycle:
/// 1. [`activate`](Self::activate): register, load the topology file, build
/// 2. [`change_port_state`](DeviceProvider::change_port_state): runtime updates
/// 3. [`deactivate`](Self::deactivate): unregister
pub struct TopologyProvider {
    id: ProviderId,
    settings: ProviderSettings,
    state: Mutex<TopologyState>,
    controller: RwLock<Option<Arc<dyn ControllerInterface>>>,
}

impl TopologyProvider {
    /// Creates an inactive provider with an empty topology.
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            id: settings.provider_id(),
            settings,
            state: Mutex::new(TopologyState::new()),
            controller: RwLock::new(None),
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Returns true between `activate` and `deactivate`.
    pub fn is_active(&self) -> bool {
        self.controller.read().is_some()
    }

    /// Registers with the controller and builds the configured topology.
    ///
    /// A topology that cannot be read, parsed or built is reported through
    /// the returned error, but the provider stays registered with an empty
    /// topology so the controller keeps a live provider.
    pub fn activate(&self, registry: &dyn ProviderRegistry) -> TopoResult<()> {
        let mut slot = self.controller.write();
        if slot.is_some() {
            warn!("Provider {} already active", self.id);
            return Ok(());
        }

        info!("Topology provider {} started", self.id);
        let controller = registry.register(&self.id);

        // Callers that see the handle must queue behind the build.
        let mut state = self.state.lock();
        *slot = Some(Arc::clone(&controller));
        drop(slot);

        let path = &self.settings.topology.config_path;
        let builder = TopologyBuilder::new(self.settings.topology.ports_per_device);
        let built = loader::load_topology_file(path)
            .and_then(|spec| builder.build(&spec, controller.as_ref()));

        match built {
            Ok(topology) => {
                *state = topology;
                Ok(())
            }
            Err(e) => {
                error!(
                    "Error loading topology from {}: {}; continuing with empty topology",
                    path.display(),
                    e
                );
                *state = TopologyState::new();
                Err(e)
            }
        }
    }

    /// Withdraws the registration. The topology tables are kept.
    pub fn deactivate(&self, registry: &dyn ProviderRegistry) {
        if self.controller.write().take().is_none() {
            debug!("Provider {} not active, nothing to deactivate", self.id);
            return;
        }

        registry.unregister(&self.id);
        info!("Topology provider {} stopped", self.id);
    }

    fn active_controller(&self) -> TopoResult<Arc<dyn ControllerInterface>> {
        self.controller.read().clone().ok_or(TopoError::NotActive)
    }

    /// Brings a link up between two existing ports.
    pub fn link_up(&self, src: &ConnectPoint, dst: &ConnectPoint) -> TopoResult<()> {
        let controller = self.active_controller()?;
        let mut state = self.state.lock();
        LinkStateController::new(&mut state, controller.as_ref()).link_up(src, dst)
    }

    pub fn device_count(&self) -> usize {
        self.state.lock().device_count()
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self.state.lock().device_ids().cloned().collect();
        ids.sort();
        ids
    }

    /// Description of a device.
    pub fn device(&self, device_id: &DeviceId) -> TopoResult<DeviceDescription> {
        self.state.lock().device(device_id).cloned()
    }

    /// Ports of a device, if it exists.
    pub fn ports(&self, device_id: &DeviceId) -> Option<Vec<PortDescription>> {
        self.state.lock().ports(device_id).map(<[_]>::to_vec)
    }

    pub fn link_peer(&self, cp: &ConnectPoint) -> Option<ConnectPoint> {
        self.state.lock().link_peer(cp).cloned()
    }

    pub fn down_peer(&self, cp: &ConnectPoint) -> Option<ConnectPoint> {
        self.state.lock().down_peer(cp).cloned()
    }

    /// Copy of the link table.
    pub fn links(&self) -> HashMap<ConnectPoint, ConnectPoint> {
        self.state.lock().links()
    }

    /// Copy of the down-link set.
    pub fn down_links(&self) -> HashMap<ConnectPoint, ConnectPoint> {
        self.state.lock().down_links()
    }
}

impl Provider for TopologyProvider {
    fn id(&self) -> &ProviderId {
        &self.id
    }
}

impl DeviceProvider for TopologyProvider {
    fn trigger_probe(&self, device_id: &DeviceId) {
        debug!("Probe requested for {}; synthetic devices need none", device_id);
    }

    fn role_changed(&self, device_id: &DeviceId, role: MastershipRole) {
        debug!("Mastership role for {} is now {}", device_id, role);
    }

    fn is_reachable(&self, _device_id: &DeviceId) -> bool {
        true
    }

    #[instrument(skip(self, device_id, port), fields(device = %device_id, port = %port))]
    fn change_port_state(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        enable: bool,
    ) -> TopoResult<LinkTransition> {
        let controller = self.active_controller()?;
        let cp = ConnectPoint::new(device_id.clone(), port);

        let mut state = self.state.lock();
        let result =
            LinkStateController::new(&mut state, controller.as_ref()).port_state_change(&cp, enable);

        match &result {
            Ok(transition) => {
                let action = if enable { "enabled" } else { "disabled" };
                debug!("Port {} {}: link {}", cp, action, transition);
            }
            Err(e) => warn!("Rejected port state change for {}: {}", cp, e),
        }
        result
    }
}

impl LinkProvider for TopologyProvider {}

impl FlowRuleProvider for TopologyProvider {
    fn apply_flow_rules(&self, rules: &[FlowRule]) {
        debug!("Ignoring {} flow rules to apply", rules.len());
    }

    fn remove_flow_rules(&self, rules: &[FlowRule]) {
        debug!("Ignoring {} flow rules to remove", rules.len());
    }

    fn remove_rules_by_id(&self, app_id: ApplicationId, rules: &[FlowRule]) {
        debug!("Ignoring removal of {} flow rules for app {}", rules.len(), app_id.0);
    }

    fn execute_batch(&self, batch: &FlowRuleBatchOperation) {
        debug!(
            "Ignoring flow rule batch {} for {} ({} operations)",
            batch.batch_id,
            batch.device_id,
            batch.operations.len()
        );
    }
}
