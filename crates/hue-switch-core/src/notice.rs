//! Operator-facing status notices
//!
//! Every observable outcome of the controller surfaces as a [`Notice`]. They
//! are logged when raised and handed back to the caller in a
//! [`Reaction`](crate::controller::Reaction).

use core::fmt;

use log::{info, warn};

use crate::registry::NodeId;
use crate::stack::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The stack accepted the formation request
    NetworkCreationStarted,
    NetworkCreationFailed(Status),
    /// BTN0 was pressed while the node already has (or is joining) a network
    AlreadyInNetwork,
    /// Result of opening the network for joining
    OpenNetwork(Status),
    NetworkDown,
    /// BTN1 was pressed before any device joined
    DeviceNotJoined,
    /// A device joined and is now the toggle target
    DeviceCaptured(NodeId),
    ToggleRequested(NodeId),
    ToggleSent,
    ToggleFailed(Status),
    SteeringComplete(Status),
}

impl Notice {
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NetworkCreationFailed(_) | Self::ToggleFailed(_) | Self::NetworkDown
        ) || matches!(self, Self::OpenNetwork(status) if !status.is_success())
    }

    /// Write the notice to the log
    pub fn emit(&self) {
        if self.is_failure() {
            warn!("{}", self);
        } else {
            info!("{}", self);
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkCreationStarted => f.write_str("Network Creation success"),
            Self::NetworkCreationFailed(status) => write!(f, "Network Creation failed: {status}"),
            Self::AlreadyInNetwork => f.write_str("Already in a network"),
            Self::OpenNetwork(status) => write!(f, "open-network -> {status}"),
            Self::NetworkDown => f.write_str("Network down"),
            Self::DeviceNotJoined => f.write_str("Device yet to join the network"),
            Self::DeviceCaptured(node) => write!(f, "Captured device short ID: {node}"),
            Self::ToggleRequested(node) => write!(f, "Sending on-off Toggle to {node}"),
            Self::ToggleSent => f.write_str("Command is successfully sent"),
            Self::ToggleFailed(status) => write!(f, "Failed to send, status code: {status}"),
            Self::SteeringComplete(status) => write!(f, "Join network complete: {status}"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::NetworkCreationStarted.to_string(),
            "Network Creation success"
        );
        assert_eq!(
            Notice::OpenNetwork(Status::SUCCESS).to_string(),
            "open-network -> 0x00"
        );
        assert_eq!(
            Notice::DeviceCaptured(NodeId(0x1234)).to_string(),
            "Captured device short ID: 0x1234"
        );
        assert_eq!(
            Notice::ToggleFailed(Status::DELIVERY_FAILED).to_string(),
            "Failed to send, status code: 0x66"
        );
    }

    #[test]
    fn test_failure_classification() {
        assert!(!Notice::OpenNetwork(Status::SUCCESS).is_failure());
        assert!(Notice::OpenNetwork(Status::INVALID_CALL).is_failure());
        assert!(Notice::ToggleFailed(Status::NO_BUFFERS).is_failure());
        assert!(!Notice::ToggleSent.is_failure());
    }
}
