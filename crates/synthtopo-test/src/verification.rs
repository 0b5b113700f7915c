//! Verification helpers for testing the topology provider
//!
//! Provides assertion helpers over the events captured by a
//! [`RecordingController`].

use synthtopo_types::{ConnectPoint, DeviceId};
use thiserror::Error;

use crate::recorder::{ControllerEvent, RecordingController};

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Expected link {src} -> {dst} was not detected")]
    LinkNotDetected { src: String, dst: String },

    #[error("Expected device '{device}' was not connected")]
    DeviceNotConnected { device: String },

    #[error("Expected {expected} '{kind}' events, found {actual}")]
    EventCountMismatch {
        kind: String,
        expected: usize,
        actual: usize,
    },

    #[error("Event {index} ('{kind}') arrived after a later construction phase")]
    OutOfOrder { index: usize, kind: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Controller event verifier
pub struct EventVerifier<'a> {
    controller: &'a RecordingController,
}

impl<'a> EventVerifier<'a> {
    pub fn new(controller: &'a RecordingController) -> Self {
        Self { controller }
    }

    /// Verify that a link was detected in the given direction
    pub fn assert_link_detected(&self, src: &ConnectPoint, dst: &ConnectPoint) -> VerifyResult<()> {
        let found = self
            .controller
            .detected_links()
            .iter()
            .any(|(s, d)| s == src && d == dst);
        if !found {
            return Err(VerificationError::LinkNotDetected {
                src: src.to_string(),
                dst: dst.to_string(),
            });
        }
        Ok(())
    }

    /// Verify that a link was detected in both directions
    pub fn assert_bidirectional(&self, a: &ConnectPoint, b: &ConnectPoint) -> VerifyResult<()> {
        self.assert_link_detected(a, b)?;
        self.assert_link_detected(b, a)
    }

    pub fn assert_device_connected(&self, device: &DeviceId) -> VerifyResult<()> {
        if !self.controller.connected_devices().contains(device) {
            return Err(VerificationError::DeviceNotConnected {
                device: device.to_string(),
            });
        }
        Ok(())
    }

    /// Verify the number of events of one kind (`device`, `ports`,
    /// `port-status` or `link`)
    pub fn assert_event_count(&self, kind: &str, expected: usize) -> VerifyResult<()> {
        let actual = self
            .controller
            .events()
            .iter()
            .filter(|e| e.kind() == kind)
            .count();
        if actual != expected {
            return Err(VerificationError::EventCountMismatch {
                kind: kind.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Verify construction order: all devices, then all port lists, then
    /// all links
    pub fn assert_construction_order(&self) -> VerifyResult<()> {
        let mut phase = 0;
        for (index, event) in self.controller.events().iter().enumerate() {
            let rank = match event {
                ControllerEvent::DeviceConnected { .. } => 0,
                ControllerEvent::PortsUpdated { .. } => 1,
                ControllerEvent::LinkDetected(_) => 2,
                ControllerEvent::PortStatusChanged { .. } => continue,
            };
            if rank < phase {
                return Err(VerificationError::OutOfOrder {
                    index,
                    kind: event.kind().to_string(),
                });
            }
            phase = rank;
        }
        Ok(())
    }
}
