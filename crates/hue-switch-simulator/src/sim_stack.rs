//! Simulated Zigbee stack and bulb
//!
//! Stands in for the vendor radio stack: formation completes a few ticks after
//! it is requested, the join window closes by itself, and a simulated Hue bulb
//! joins while the window is open. Callbacks are queued on the same
//! notification channel real stack glue would use.

use hue_switch_core::registry::{DeviceUpdate, Eui64, JoinDecision, JoinNotification};
use hue_switch_core::stack::{
    NetworkStatus, NotificationSender, OutgoingKind, StackStatus, SteeringReport,
};
use hue_switch_core::zcl::{ON_OFF_CLUSTER_ID, OnOffCommand, OutgoingCommand, ZclHeader};
use hue_switch_core::{NodeId, StackError, StackNotification, Status, ZigbeeStack};
use log::{debug, info, warn};

/// Ticks between a formation request and network-up
const FORMATION_TICKS: u32 = 10;

/// Ticks the join window stays open
const JOIN_WINDOW_TICKS: u32 = 300;

/// Ticks after the window opens before the bulb joins
const BULB_JOIN_DELAY_TICKS: u32 = 15;

/// Endpoint of the On/Off server on the simulated bulb
const BULB_ENDPOINT: u8 = 11;

/// A device that joined the simulated network
struct SimDevice {
    short_id: NodeId,
    eui64: Eui64,
}

/// Simulated Hue bulb exposing an On/Off server
struct SimBulb {
    device: Option<SimDevice>,
    join_countdown: Option<u32>,
    on: bool,
}

impl SimBulb {
    fn apply(&mut self, command: &OutgoingCommand) {
        if command.aps.cluster_id != ON_OFF_CLUSTER_ID
            || command.aps.destination_endpoint != BULB_ENDPOINT
        {
            warn!(
                "Bulb has no cluster 0x{:04X} on endpoint {}",
                command.aps.cluster_id, command.aps.destination_endpoint
            );
            return;
        }

        let header = match command.header() {
            Ok(header) => header,
            Err(e) => {
                warn!("Bulb dropped malformed frame: {}", e);
                return;
            }
        };
        debug!(" Bulb received {:?}", header);

        match command_of(&header) {
            Some(OnOffCommand::Off) => self.on = false,
            Some(OnOffCommand::On) => self.on = true,
            Some(OnOffCommand::Toggle) => self.on = !self.on,
            None => {
                warn!("Bulb ignored command 0x{:02X}", header.command_id);
                return;
            }
        }
        info!("Bulb is now {}", if self.on { "ON" } else { "OFF" });
    }
}

fn command_of(header: &ZclHeader) -> Option<OnOffCommand> {
    if header.is_cluster_specific() && header.is_client_to_server() {
        OnOffCommand::from_id(header.command_id)
    } else {
        None
    }
}

pub struct SimulatedStack {
    notifications: NotificationSender<'static>,
    status: NetworkStatus,
    formation_countdown: Option<u32>,
    join_window: u32,
    bulb: SimBulb,
    others: Vec<SimDevice>,
    next_short_id: u16,
}

impl SimulatedStack {
    pub fn new(notifications: NotificationSender<'static>) -> Self {
        Self {
            notifications,
            status: NetworkStatus::NoNetwork,
            formation_countdown: None,
            join_window: 0,
            bulb: SimBulb {
                device: None,
                join_countdown: None,
                on: false,
            },
            others: Vec::new(),
            next_short_id: 0x1234,
        }
    }

    /// Whether the simulated bulb is currently lit
    pub fn bulb_on(&self) -> bool {
        self.bulb.on
    }

    /// Advance the simulation by one tick
    pub fn advance(&mut self) {
        if let Some(remaining) = self.formation_countdown.take() {
            if remaining == 0 {
                info!("[stack] Network formed");
                self.status = NetworkStatus::Joined;
                self.notify(StackNotification::StackStatus(StackStatus::NetworkUp));
            } else {
                self.formation_countdown = Some(remaining - 1);
            }
        }

        if self.join_window > 0 {
            self.join_window -= 1;
            if self.join_window == 0 {
                info!("[stack] Join window closed");
            }
        }

        if let Some(remaining) = self.bulb.join_countdown.take() {
            if self.join_window == 0 {
                debug!(" Bulb missed the join window");
            } else if remaining == 0 {
                let device = self.admit(0x0017_8801_0000_0001);
                self.bulb.device = Some(device);
            } else {
                self.bulb.join_countdown = Some(remaining - 1);
            }
        }
    }

    /// Let a generic device join, if the window is open
    pub fn join_other_device(&mut self) {
        if self.join_window == 0 {
            warn!("[stack] Network is not open for joining");
            return;
        }
        let eui = 0x0000_0000_0000_1000 + self.others.len() as u64;
        let device = self.admit(eui);
        self.others.push(device);
    }

    /// Drop the network, as if the coordinator lost it
    pub fn drop_network(&mut self) {
        if self.status == NetworkStatus::NoNetwork {
            warn!("[stack] No network to drop");
            return;
        }
        info!("[stack] Network down");
        self.status = NetworkStatus::NoNetwork;
        self.formation_countdown = None;
        self.join_window = 0;
        self.bulb.device = None;
        self.bulb.join_countdown = None;
        self.others.clear();
        self.notify(StackNotification::StackStatus(StackStatus::NetworkDown));
    }

    /// Raise the radio-needs-calibrating callback
    pub fn request_calibration(&mut self) {
        self.notify(StackNotification::RadioNeedsCalibrating);
    }

    fn admit(&mut self, eui: u64) -> SimDevice {
        let short_id = NodeId(self.next_short_id);
        self.next_short_id = self.next_short_id.wrapping_add(0x0111);
        let eui64 = Eui64(eui.to_be_bytes());
        info!("[stack] Device {:016X} joined as {}", eui, short_id);

        self.notify(StackNotification::SteeringComplete(SteeringReport {
            status: Status::SUCCESS,
            total_beacons: 1,
            join_attempts: 1,
            final_state: 0,
        }));
        self.notify(StackNotification::DeviceJoined(JoinNotification {
            short_id,
            eui64,
            parent: NodeId::COORDINATOR,
            update: DeviceUpdate::UnsecuredJoin,
            decision: JoinDecision::UsePreconfiguredKey,
        }));

        SimDevice { short_id, eui64 }
    }

    fn notify(&self, notification: StackNotification) {
        if self.notifications.try_send(notification).is_err() {
            warn!("[stack] Notification queue full, dropping {:?}", notification);
        }
    }
}

impl ZigbeeStack for SimulatedStack {
    fn network_status(&self) -> NetworkStatus {
        self.status
    }

    fn request_network_formation(&mut self, centralized: bool) -> Result<(), StackError> {
        if self.status != NetworkStatus::NoNetwork {
            return Err(StackError(Status::INVALID_CALL));
        }
        info!(
            "[stack] Forming {} network",
            if centralized { "centralized" } else { "distributed" }
        );
        self.status = NetworkStatus::Joining;
        self.formation_countdown = Some(FORMATION_TICKS);
        Ok(())
    }

    fn open_network_for_joining(&mut self) -> Result<(), StackError> {
        if self.status != NetworkStatus::Joined {
            return Err(StackError(Status::INVALID_CALL));
        }
        info!("[stack] Join window open for {} ticks", JOIN_WINDOW_TICKS);
        self.join_window = JOIN_WINDOW_TICKS;
        if self.bulb.device.is_none() {
            self.bulb.join_countdown = Some(BULB_JOIN_DELAY_TICKS);
        }
        Ok(())
    }

    fn send_unicast(
        &mut self,
        kind: OutgoingKind,
        destination: NodeId,
        command: &OutgoingCommand,
    ) -> Result<(), StackError> {
        if self.status != NetworkStatus::Joined {
            return Err(StackError(Status::NOT_JOINED));
        }
        debug!(" {:?} unicast to {}: {:02X?}", kind, destination, command.payload);

        let to_bulb = self
            .bulb
            .device
            .as_ref()
            .is_some_and(|bulb| bulb.short_id == destination);
        if to_bulb {
            self.bulb.apply(command);
            return Ok(());
        }

        match self.others.iter().find(|d| d.short_id == destination) {
            Some(device) => {
                info!(
                    "[stack] Device {:02X?} has no On/Off server, frame ignored",
                    device.eui64.0
                );
                Ok(())
            }
            None => Err(StackError(Status::DELIVERY_FAILED)),
        }
    }

    fn calibrate_current_channel(&mut self) {
        info!("[stack] Radio calibrated on current channel");
    }
}
