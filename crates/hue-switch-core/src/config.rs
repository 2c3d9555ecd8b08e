//! Controller configuration

/// Endpoint the On/Off cluster lives on for Hue bulbs
pub const HUE_BULB_ENDPOINT: u8 = 11;

/// This node's primary application endpoint
pub const PRIMARY_ENDPOINT: u8 = 1;

/// Which trust-center join notifications update the command target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinPolicy {
    /// Bind to whatever device the trust center reports next
    #[default]
    AnyUpdate,
    /// Skip "device left" updates so a departing node does not become the target
    IgnoreDepartures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Source endpoint stamped on outgoing commands
    pub source_endpoint: u8,
    /// Endpoint of the joined device that receives toggles
    pub target_endpoint: u8,
    /// Form the network as a centralized trust center
    pub centralized: bool,
    pub join_policy: JoinPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            source_endpoint: PRIMARY_ENDPOINT,
            target_endpoint: HUE_BULB_ENDPOINT,
            centralized: true,
            join_policy: JoinPolicy::AnyUpdate,
        }
    }
}
