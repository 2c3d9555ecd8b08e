//! Toggle command sender
//!
//! Builds a ZCL On/Off Toggle and sends it once, as an acknowledged direct
//! unicast, to the remembered device.

use log::{debug, error};

use crate::config::ControllerConfig;
use crate::notice::Notice;
use crate::registry::NodeId;
use crate::stack::{OutgoingKind, Status, ZigbeeStack};
use crate::zcl::{OnOffCommand, OutgoingCommand};

pub struct ToggleSender {
    source_endpoint: u8,
    target_endpoint: u8,
    /// ZCL transaction sequence number of the next command
    sequence: u8,
}

impl ToggleSender {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            source_endpoint: config.source_endpoint,
            target_endpoint: config.target_endpoint,
            sequence: 0,
        }
    }

    fn next_sequence(&mut self) -> u8 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    /// Build and transmit a Toggle to `target`.
    ///
    /// The outcome is reported through `notify`; a failed send is not retried.
    pub fn send<S: ZigbeeStack>(
        &mut self,
        target: NodeId,
        stack: &mut S,
        mut notify: impl FnMut(Notice),
    ) {
        notify(Notice::ToggleRequested(target));

        let sequence = self.next_sequence();
        let command = match OutgoingCommand::on_off(
            OnOffCommand::Toggle,
            sequence,
            self.source_endpoint,
            self.target_endpoint,
        ) {
            Ok(command) => command,
            Err(e) => {
                // The stack never saw the command, so report it as a local fault
                error!("Failed to build Toggle frame: {}", e);
                notify(Notice::ToggleFailed(Status::ERR_FATAL));
                return;
            }
        };

        debug!(
            " Toggle seq={} from endpoint {} to {} endpoint {}",
            sequence, self.source_endpoint, target, self.target_endpoint
        );

        match stack.send_unicast(OutgoingKind::Direct, target, &command) {
            Ok(()) => notify(Notice::ToggleSent),
            Err(e) => notify(Notice::ToggleFailed(e.status())),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use crate::error::StackError;
    use crate::testing::{Call, MockStack};

    #[test]
    fn test_sends_once_to_target() {
        let mut sender = ToggleSender::new(&ControllerConfig::default());
        let mut stack = MockStack::new();
        let mut notices = Vec::new();

        sender.send(NodeId(0x1234), &mut stack, |n| notices.push(n));

        assert_eq!(stack.sent_to(), [(NodeId(0x1234), 11)]);
        assert_eq!(
            notices,
            [Notice::ToggleRequested(NodeId(0x1234)), Notice::ToggleSent]
        );
    }

    #[test]
    fn test_sequence_number_advances() {
        let mut sender = ToggleSender::new(&ControllerConfig::default());
        let mut stack = MockStack::new();

        for _ in 0..3 {
            sender.send(NodeId(0x0042), &mut stack, |_| {});
        }

        let sequences: Vec<u8> = stack
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Unicast { command, .. } => Some(command.header().unwrap().sequence),
                _ => None,
            })
            .collect();
        assert_eq!(sequences, [0u8, 1, 2]);
    }

    #[test]
    fn test_send_failure_is_reported() {
        let mut sender = ToggleSender::new(&ControllerConfig::default());
        let mut stack = MockStack::new();
        stack.send_result = Err(StackError(Status::DELIVERY_FAILED));
        let mut notices = Vec::new();

        sender.send(NodeId(0x1234), &mut stack, |n| notices.push(n));

        assert_eq!(
            notices.last(),
            Some(&Notice::ToggleFailed(Status::DELIVERY_FAILED))
        );
        assert_eq!(stack.sent_to().len(), 1);
    }

    #[test]
    fn test_uses_configured_endpoints() {
        let config = ControllerConfig {
            source_endpoint: 2,
            target_endpoint: 3,
            ..ControllerConfig::default()
        };
        let mut sender = ToggleSender::new(&config);
        let mut stack = MockStack::new();

        sender.send(NodeId(0x0001), &mut stack, |_| {});

        match &stack.calls[0] {
            Call::Unicast { kind, command, .. } => {
                assert_eq!(*kind, OutgoingKind::Direct);
                assert_eq!(command.aps.source_endpoint, 2);
                assert_eq!(command.aps.destination_endpoint, 3);
            }
            other => panic!("expected a unicast, got {:?}", other),
        }
    }
}
