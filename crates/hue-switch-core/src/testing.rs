//! Recording test double for the Zigbee stack

extern crate std;
use std::vec::Vec;

use crate::error::StackError;
use crate::registry::NodeId;
use crate::stack::{NetworkStatus, OutgoingKind, ZigbeeStack};
use crate::zcl::OutgoingCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FormNetwork { centralized: bool },
    OpenNetwork,
    Unicast {
        kind: OutgoingKind,
        destination: NodeId,
        command: OutgoingCommand,
    },
    Calibrate,
}

/// Returns canned results and records every call in order
pub struct MockStack {
    pub status: NetworkStatus,
    pub form_result: Result<(), StackError>,
    pub open_result: Result<(), StackError>,
    pub send_result: Result<(), StackError>,
    pub calls: Vec<Call>,
}

impl MockStack {
    pub fn new() -> Self {
        Self {
            status: NetworkStatus::NoNetwork,
            form_result: Ok(()),
            open_result: Ok(()),
            send_result: Ok(()),
            calls: Vec::new(),
        }
    }

    pub fn count(&self, wanted: fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| wanted(call)).count()
    }

    pub fn formation_requests(&self) -> usize {
        self.count(|call| matches!(call, Call::FormNetwork { .. }))
    }

    pub fn open_requests(&self) -> usize {
        self.count(|call| matches!(call, Call::OpenNetwork))
    }

    /// `(destination, destination endpoint)` of every unicast
    pub fn sent_to(&self) -> Vec<(NodeId, u8)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Unicast {
                    destination,
                    command,
                    ..
                } => Some((*destination, command.aps.destination_endpoint)),
                _ => None,
            })
            .collect()
    }
}

impl ZigbeeStack for MockStack {
    fn network_status(&self) -> NetworkStatus {
        self.status
    }

    fn request_network_formation(&mut self, centralized: bool) -> Result<(), StackError> {
        self.calls.push(Call::FormNetwork { centralized });
        self.form_result
    }

    fn open_network_for_joining(&mut self) -> Result<(), StackError> {
        self.calls.push(Call::OpenNetwork);
        self.open_result
    }

    fn send_unicast(
        &mut self,
        kind: OutgoingKind,
        destination: NodeId,
        command: &OutgoingCommand,
    ) -> Result<(), StackError> {
        self.calls.push(Call::Unicast {
            kind,
            destination,
            command: command.clone(),
        });
        self.send_result
    }

    fn calibrate_current_channel(&mut self) {
        self.calls.push(Call::Calibrate);
    }
}
