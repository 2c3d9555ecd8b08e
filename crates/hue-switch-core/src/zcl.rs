//! Minimal ZCL frame building for the On/Off cluster
//!
//! Only the pieces the switch needs: the general ZCL header, the On/Off
//! command set and the APS addressing that wraps them.
//!
//! ## Frame layout
//!
//! | Byte | Field                          |
//! |------|--------------------------------|
//! | 0    | Frame control                  |
//! | 1    | Transaction sequence number    |
//! | 2    | Command identifier             |
//! | 3..  | Command payload (none for On/Off) |

use heapless::Vec;

use crate::error::FrameError;

/// Home Automation application profile
pub const HA_PROFILE_ID: u16 = 0x0104;

/// On/Off cluster identifier
pub const ON_OFF_CLUSTER_ID: u16 = 0x0006;

/// Largest ZCL payload the switch ever builds
pub const MAX_ZCL_PAYLOAD: usize = 16;

/// Length of a header without manufacturer code
pub const ZCL_HEADER_LEN: usize = 3;

/// Frame control bits
pub mod frame_control {
    pub const CLUSTER_SPECIFIC: u8 = 0x01;
    pub const MANUFACTURER_SPECIFIC: u8 = 0x04;
    pub const SERVER_TO_CLIENT: u8 = 0x08;
}

/// APS option bits
pub mod aps_options {
    pub const RETRY: u16 = 0x0040;
    pub const ENABLE_ROUTE_DISCOVERY: u16 = 0x0100;
    /// Acknowledged, routed unicast
    pub const DEFAULT: u16 = RETRY | ENABLE_ROUTE_DISCOVERY;
}

/// Client-to-server commands of the On/Off cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OnOffCommand {
    Off = 0x00,
    On = 0x01,
    Toggle = 0x02,
}

impl OnOffCommand {
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::On),
            0x02 => Some(Self::Toggle),
            _ => None,
        }
    }
}

/// Application support layer addressing for an outgoing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApsFrame {
    pub profile_id: u16,
    pub cluster_id: u16,
    pub source_endpoint: u8,
    pub destination_endpoint: u8,
    pub options: u16,
}

/// Decoded ZCL header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZclHeader {
    pub frame_control: u8,
    pub manufacturer_code: Option<u16>,
    pub sequence: u8,
    pub command_id: u8,
}

impl ZclHeader {
    pub const fn is_cluster_specific(&self) -> bool {
        self.frame_control & frame_control::CLUSTER_SPECIFIC != 0
    }

    pub const fn is_client_to_server(&self) -> bool {
        self.frame_control & frame_control::SERVER_TO_CLIENT == 0
    }

    /// Decode the header at the start of a ZCL payload
    pub fn parse(payload: &[u8]) -> Result<Self, FrameError> {
        let frame_control = *payload.first().ok_or(FrameError::Truncated {
            needed: ZCL_HEADER_LEN,
            actual: payload.len(),
        })?;

        let manufacturer_specific = frame_control & frame_control::MANUFACTURER_SPECIFIC != 0;
        let needed = if manufacturer_specific {
            ZCL_HEADER_LEN + 2
        } else {
            ZCL_HEADER_LEN
        };
        if payload.len() < needed {
            return Err(FrameError::Truncated {
                needed,
                actual: payload.len(),
            });
        }

        let (manufacturer_code, rest) = if manufacturer_specific {
            (
                Some(u16::from_le_bytes([payload[1], payload[2]])),
                &payload[3..],
            )
        } else {
            (None, &payload[1..])
        };

        Ok(Self {
            frame_control,
            manufacturer_code,
            sequence: rest[0],
            command_id: rest[1],
        })
    }
}

/// A fully addressed command ready to hand to the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingCommand {
    pub aps: ApsFrame,
    pub payload: Vec<u8, MAX_ZCL_PAYLOAD>,
}

impl OutgoingCommand {
    /// Build a cluster-specific, client-to-server On/Off command
    pub fn on_off(
        command: OnOffCommand,
        sequence: u8,
        source_endpoint: u8,
        destination_endpoint: u8,
    ) -> Result<Self, FrameError> {
        let mut payload = Vec::new();
        payload
            .extend_from_slice(&[frame_control::CLUSTER_SPECIFIC, sequence, command as u8])
            .map_err(|_| FrameError::Overflow {
                capacity: MAX_ZCL_PAYLOAD,
            })?;

        Ok(Self {
            aps: ApsFrame {
                profile_id: HA_PROFILE_ID,
                cluster_id: ON_OFF_CLUSTER_ID,
                source_endpoint,
                destination_endpoint,
                options: aps_options::DEFAULT,
            },
            payload,
        })
    }

    pub fn header(&self) -> Result<ZclHeader, FrameError> {
        ZclHeader::parse(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_frame_bytes() {
        let command = OutgoingCommand::on_off(OnOffCommand::Toggle, 0x2A, 1, 11).unwrap();

        assert_eq!(command.payload.as_slice(), &[0x01, 0x2A, 0x02]);
        assert_eq!(command.aps.profile_id, 0x0104);
        assert_eq!(command.aps.cluster_id, 0x0006);
        assert_eq!(command.aps.source_endpoint, 1);
        assert_eq!(command.aps.destination_endpoint, 11);
        assert_eq!(command.aps.options, 0x0140);
    }

    #[test]
    fn test_parse_toggle_header() {
        let command = OutgoingCommand::on_off(OnOffCommand::Toggle, 7, 1, 11).unwrap();
        let header = command.header().unwrap();

        assert!(header.is_cluster_specific());
        assert!(header.is_client_to_server());
        assert_eq!(header.manufacturer_code, None);
        assert_eq!(header.sequence, 7);
        assert_eq!(OnOffCommand::from_id(header.command_id), Some(OnOffCommand::Toggle));
    }

    #[test]
    fn test_parse_manufacturer_specific_header() {
        let header = ZclHeader::parse(&[0x05, 0x0B, 0x10, 0x09, 0x01]).unwrap();

        assert_eq!(header.manufacturer_code, Some(0x100B));
        assert_eq!(header.sequence, 0x09);
        assert_eq!(header.command_id, 0x01);
    }

    #[test]
    fn test_parse_truncated() {
        assert_eq!(
            ZclHeader::parse(&[]),
            Err(FrameError::Truncated {
                needed: 3,
                actual: 0
            })
        );
        assert_eq!(
            ZclHeader::parse(&[0x04, 0x0B, 0x10]),
            Err(FrameError::Truncated {
                needed: 5,
                actual: 3
            })
        );
    }
}
