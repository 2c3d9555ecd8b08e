//! Network lifecycle state machine
//!
//! Forms a centralized coordinator network on demand and opens it for joining
//! once the stack reports the network is up.
//!
//! ```text
//!  NoNetwork --bring_up (formation accepted)--> FormingRequested
//!      ^                                              |
//!      | NetworkDown                          NetworkUp (any state)
//!      |                                              v
//!  (any state)          OpenForJoining <--open-- FormedNotOpen
//! ```
//!
//! Join-window expiry is owned by the stack and not tracked here. Nothing is
//! retried automatically: the operator presses BTN0 again.

use log::debug;

use crate::notice::Notice;
use crate::stack::{NetworkStatus, StackStatus, Status, ZigbeeStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkLifecycleState {
    NoNetwork,
    /// Formation accepted by the stack, waiting for network-up
    FormingRequested,
    /// Network is up but the join window has not been requested yet
    FormedNotOpen,
    /// Join window requested; its expiry is the stack's business
    OpenForJoining,
}

pub struct NetworkLifecycle {
    state: NetworkLifecycleState,
    centralized: bool,
}

impl NetworkLifecycle {
    pub const fn new(centralized: bool) -> Self {
        Self {
            state: NetworkLifecycleState::NoNetwork,
            centralized,
        }
    }

    pub fn state(&self) -> NetworkLifecycleState {
        self.state
    }

    /// Deferred network bring-up, run when the armed work fires.
    ///
    /// Requests formation only when the stack confirms there is no network.
    pub fn bring_up<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        mut notify: impl FnMut(Notice),
        mut transition: impl FnMut(NetworkLifecycleState, NetworkLifecycleState),
    ) {
        let status = stack.network_status();
        if status != NetworkStatus::NoNetwork {
            debug!(" Skipping formation, stack reports {:?}", status);
            notify(Notice::AlreadyInNetwork);
            return;
        }

        let next = match stack.request_network_formation(self.centralized) {
            Ok(()) => {
                notify(Notice::NetworkCreationStarted);
                NetworkLifecycleState::FormingRequested
            }
            Err(e) => {
                notify(Notice::NetworkCreationFailed(e.status()));
                NetworkLifecycleState::NoNetwork
            }
        };
        self.set_state(next, &mut transition);
    }

    /// React to a stack status change
    pub fn on_stack_status<S: ZigbeeStack>(
        &mut self,
        status: StackStatus,
        stack: &mut S,
        mut notify: impl FnMut(Notice),
        mut transition: impl FnMut(NetworkLifecycleState, NetworkLifecycleState),
    ) {
        match status {
            StackStatus::NetworkUp => {
                self.set_state(NetworkLifecycleState::FormedNotOpen, &mut transition);

                // An open failure does not roll back: the network itself formed
                let result = stack.open_network_for_joining();
                notify(Notice::OpenNetwork(Status::from(result)));
                self.set_state(NetworkLifecycleState::OpenForJoining, &mut transition);
            }
            StackStatus::NetworkDown => {
                notify(Notice::NetworkDown);
                self.set_state(NetworkLifecycleState::NoNetwork, &mut transition);
            }
            StackStatus::Other(code) => {
                debug!(" Ignoring stack status {}", code);
            }
        }
    }

    fn set_state(
        &mut self,
        next: NetworkLifecycleState,
        transition: &mut impl FnMut(NetworkLifecycleState, NetworkLifecycleState),
    ) {
        if next != self.state {
            debug!(" Network lifecycle {:?} -> {:?}", self.state, next);
            transition(self.state, next);
            self.state = next;
        }
    }
}
