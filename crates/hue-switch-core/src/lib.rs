//! Hardware-independent core library for the two-button Zigbee switch
//!
//! This crate contains all of the state and sequencing logic of the switch:
//! the button latch, the single-slot join registry, the network lifecycle
//! state machine, the command dispatcher and the ZCL toggle sender. The
//! Zigbee stack itself is an external collaborator behind [`stack::ZigbeeStack`].
//!
//! It is `#![no_std]` so it compiles on both embedded targets and desktop
//! hosts (for the simulator and tests).

#![no_std]

pub mod config;
pub mod controller;
pub mod deferred;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod notice;
pub mod registry;
pub mod stack;
pub mod toggle;
pub mod zcl;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ControllerConfig, JoinPolicy};
pub use controller::{Controller, Event, Reaction, Transition};
pub use error::{FrameError, StackError};
pub use input::{ButtonId, ButtonState, InputLatch};
pub use lifecycle::NetworkLifecycleState;
pub use notice::Notice;
pub use registry::NodeId;
pub use stack::{NotificationChannel, StackNotification, Status, ZigbeeStack};
