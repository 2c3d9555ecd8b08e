//! Zigbee stack collaborator interface
//!
//! The radio stack is owned by an external framework. The controller talks to
//! it through [`ZigbeeStack`] for outbound requests, and receives its callbacks
//! as [`StackNotification`]s queued on a [`NotificationChannel`].

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::error::StackError;
use crate::registry::{JoinNotification, NodeId};
use crate::zcl::OutgoingCommand;

/// Channel capacity for stack notifications.
/// A formation cycle produces at most a handful of callbacks between ticks.
pub const NOTIFICATION_CAPACITY: usize = 8;

/// Queue carrying stack callbacks from the stack's context to the scheduler
pub type NotificationChannel =
    Channel<CriticalSectionRawMutex, StackNotification, NOTIFICATION_CAPACITY>;

pub type NotificationSender<'a> =
    Sender<'a, CriticalSectionRawMutex, StackNotification, NOTIFICATION_CAPACITY>;

pub type NotificationReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, StackNotification, NOTIFICATION_CAPACITY>;

/// Raw 8-bit status code as reported by the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    pub const SUCCESS: Self = Self(0x00);
    pub const ERR_FATAL: Self = Self(0x01);
    pub const NO_BUFFERS: Self = Self(0x18);
    pub const DELIVERY_FAILED: Self = Self(0x66);
    pub const INVALID_CALL: Self = Self(0x70);
    pub const NETWORK_UP: Self = Self(0x90);
    pub const NETWORK_DOWN: Self = Self(0x91);
    pub const NOT_JOINED: Self = Self(0x93);
    pub const NETWORK_BUSY: Self = Self(0xA1);

    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Convert a raw code returned by a foreign stack call
    pub fn into_result(self) -> Result<(), StackError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(StackError(self))
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

impl From<Result<(), StackError>> for Status {
    fn from(result: Result<(), StackError>) -> Self {
        match result {
            Ok(()) => Self::SUCCESS,
            Err(e) => e.status(),
        }
    }
}

/// Local node's view of its network membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    NoNetwork,
    Joining,
    Joined,
    Leaving,
}

/// Stack status change reported by the stack-status callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatus {
    NetworkUp,
    NetworkDown,
    Other(Status),
}

impl From<Status> for StackStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::NETWORK_UP => Self::NetworkUp,
            Status::NETWORK_DOWN => Self::NetworkDown,
            other => Self::Other(other),
        }
    }
}

/// Delivery mode for unicast messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingKind {
    /// Directly to a neighbor or routed short address
    Direct,
}

/// Outcome of the network steering process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteeringReport {
    pub status: Status,
    pub total_beacons: u8,
    pub join_attempts: u8,
    pub final_state: u8,
}

/// Callbacks delivered by the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackNotification {
    StackStatus(StackStatus),
    DeviceJoined(JoinNotification),
    SteeringComplete(SteeringReport),
    RadioNeedsCalibrating,
}

/// Outbound requests the controller issues to the Zigbee stack.
///
/// Every call must return immediately. Long-running work (scanning, forming,
/// joining) completes asynchronously and is reported back as a
/// [`StackNotification`].
pub trait ZigbeeStack {
    /// Current network membership of the local node
    fn network_status(&self) -> NetworkStatus;

    /// Start forming a network, as trust center when `centralized`
    fn request_network_formation(&mut self, centralized: bool) -> Result<(), StackError>;

    /// Open the formed network for joining. The join window length is the stack's policy.
    fn open_network_for_joining(&mut self) -> Result<(), StackError>;

    /// Send an APS unicast carrying `command` to `destination`
    fn send_unicast(
        &mut self,
        kind: OutgoingKind,
        destination: NodeId,
        command: &OutgoingCommand,
    ) -> Result<(), StackError>;

    /// Recalibrate the radio on the current channel
    fn calibrate_current_channel(&mut self);
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", Status::SUCCESS), "0x00");
        assert_eq!(format!("{}", Status::NETWORK_BUSY), "0xA1");
    }

    #[test]
    fn test_status_into_result() {
        assert_eq!(Status(0).into_result(), Ok(()));
        assert_eq!(
            Status::INVALID_CALL.into_result(),
            Err(StackError(Status::INVALID_CALL))
        );
        assert_eq!(Status::from(Err::<(), _>(StackError(Status::NO_BUFFERS))), Status::NO_BUFFERS);
    }

    #[test]
    fn test_stack_status_from_code() {
        assert_eq!(StackStatus::from(Status::NETWORK_UP), StackStatus::NetworkUp);
        assert_eq!(StackStatus::from(Status::NETWORK_DOWN), StackStatus::NetworkDown);
        assert_eq!(
            StackStatus::from(Status::NOT_JOINED),
            StackStatus::Other(Status::NOT_JOINED)
        );
    }

    #[test]
    fn test_notification_channel_is_fifo() {
        let channel = NotificationChannel::new();
        channel
            .try_send(StackNotification::RadioNeedsCalibrating)
            .unwrap();
        channel
            .try_send(StackNotification::StackStatus(StackStatus::NetworkUp))
            .unwrap();

        assert_eq!(
            channel.try_receive().unwrap(),
            StackNotification::RadioNeedsCalibrating
        );
        assert_eq!(
            channel.try_receive().unwrap(),
            StackNotification::StackStatus(StackStatus::NetworkUp)
        );
        assert!(channel.try_receive().is_err());
    }
}
