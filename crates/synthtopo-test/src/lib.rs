//! Test infrastructure for the synthetic topology provider
//!
//! Provides:
//! - A recording controller and provider registry
//! - Topology file fixtures
//! - Event ordering and link verification helpers

pub mod fixtures;
mod recorder;
mod verification;

pub use fixtures::*;
pub use recorder::{ControllerEvent, RecordingController, RecordingRegistry};
pub use verification::*;
