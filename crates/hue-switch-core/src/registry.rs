//! Single-slot device join registry
//!
//! Remembers the short address of the most recently joined device. That
//! device is the only target of toggle commands.

use core::fmt;

use log::debug;

use crate::config::JoinPolicy;

/// 16-bit network short address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Sentinel the stack uses for "no node"
    pub const NULL: Self = Self(0xFFFF);
    /// The coordinator / trust center always owns short address 0
    pub const COORDINATOR: Self = Self(0x0000);

    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// 64-bit IEEE address of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eui64(pub [u8; 8]);

/// Kind of membership change reported to the trust center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceUpdate {
    SecuredRejoin,
    UnsecuredJoin,
    DeviceLeft,
    UnsecuredRejoin,
}

/// Trust center's decision about the joining device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    UsePreconfiguredKey,
    SendKeyInTheClear,
    DenyJoin,
    NoAction,
}

/// Payload of the trust-center join callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinNotification {
    pub short_id: NodeId,
    pub eui64: Eui64,
    pub parent: NodeId,
    pub update: DeviceUpdate,
    pub decision: JoinDecision,
}

/// Holds the one remembered peripheral. Last join wins.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    current: Option<NodeId>,
}

impl DeviceRegistry {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Overwrite the stored address unconditionally.
    /// The null sentinel clears the slot rather than being stored.
    pub fn record(&mut self, address: NodeId) {
        self.current = (!address.is_null()).then_some(address);
    }

    /// The device toggle commands are addressed to, if any joined yet
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Apply `policy` to a join notification and record it when accepted.
    ///
    /// Returns whether the notification changed the command target. A
    /// notification carrying the null sentinel leaves the target untouched.
    pub fn observe(&mut self, join: &JoinNotification, policy: JoinPolicy) -> bool {
        if join.short_id.is_null() {
            debug!(" Ignoring join notification without a short id");
            return false;
        }
        if policy == JoinPolicy::IgnoreDepartures && join.update == DeviceUpdate::DeviceLeft {
            debug!(" Ignoring departure of {}", join.short_id);
            return false;
        }

        self.record(join.short_id);
        true
    }
}
