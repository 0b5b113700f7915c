//! Flow-rule types accepted by the flow-rule capability.
//!
//! The synthetic provider never programs flows; these types exist so the
//! capability has typed signatures a controller can call.

use crate::DeviceId;
use serde::{Deserialize, Serialize};

/// Application that owns a set of flow rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub u16);

/// A flow rule targeted at one device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowRule {
    pub id: u64,
    pub device_id: DeviceId,
    pub app_id: ApplicationId,
    pub priority: u16,
}

/// Operation applied to a flow rule inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRuleOperation {
    Add,
    Modify,
    Remove,
}

/// Batch of flow-rule operations for a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRuleBatchOperation {
    pub batch_id: u64,
    pub device_id: DeviceId,
    pub operations: Vec<(FlowRuleOperation, FlowRule)>,
}
