//! Topology model types for the synthetic topology provider.
//!
//! This crate provides type-safe representations of the entities a topology
//! provider reports to its controller:
//!
//! - [`DeviceId`]: Switch identifier (`scheme:name`)
//! - [`PortNumber`]: Port index on a device
//! - [`ConnectPoint`]: `(device, port)` link endpoint
//! - [`LinkDescription`]: One direction of a discovered link
//! - [`LinkKey`]: The `"A-B"` link key used by topology files
//! - [`ProviderId`]: Identity of a provider towards the controller
//!
//! The types carry no behaviour beyond parsing, formatting and structural
//! equality. All state transitions live in the provider daemon.

mod connect_point;
mod device;
mod flow;
mod link;
mod port;
mod provider;

pub use connect_point::ConnectPoint;
pub use device::{ChassisId, DeviceDescription, DeviceId, DeviceType};
pub use flow::{ApplicationId, FlowRule, FlowRuleBatchOperation, FlowRuleOperation};
pub use link::{LinkDescription, LinkKey, LinkType};
pub use port::{PortDescription, PortNumber};
pub use provider::{MastershipRole, ProviderId};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid device id: {0:?}")]
    InvalidDeviceId(String),

    #[error("invalid port number: {0:?}")]
    InvalidPortNumber(String),

    #[error("invalid connect point: {0:?} (expected <device>/<port>)")]
    InvalidConnectPoint(String),

    #[error("invalid link key: {0:?} (expected <connectPoint>-<connectPoint>)")]
    InvalidLinkKey(String),

    #[error("invalid mastership role: {0:?}")]
    InvalidMastershipRole(String),
}
