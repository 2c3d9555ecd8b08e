//! Controller context and command dispatcher
//!
//! [`Controller`] owns every piece of switch state except the input latch,
//! which it borrows because the latch is written from interrupt context.
//! All work happens in [`Controller::handle`], called from the cooperative
//! scheduler; none of it blocks.

use heapless::Vec;
use log::{debug, warn};

use crate::config::ControllerConfig;
use crate::deferred::{DeferredWork, WorkSlot};
use crate::input::{ButtonId, InputLatch};
use crate::lifecycle::{NetworkLifecycle, NetworkLifecycleState};
use crate::notice::Notice;
use crate::registry::DeviceRegistry;
use crate::stack::{NOTIFICATION_CAPACITY, NotificationReceiver, StackNotification, ZigbeeStack};
use crate::toggle::ToggleSender;

/// Notices one tick can raise: toggle requested and its outcome, plus bring-up
const TICK_NOTICES: usize = 3;

/// Upper bound on notices a single [`Controller::poll`] can raise.
/// Each stack notification raises at most one.
pub const MAX_NOTICES: usize = NOTIFICATION_CAPACITY + TICK_NOTICES;

/// Upper bound on lifecycle transitions a single [`Controller::poll`] can cause.
/// Network-up moves through `FormedNotOpen`, so a notification causes at most
/// two and the tick's bring-up one.
pub const MAX_TRANSITIONS: usize = 2 * NOTIFICATION_CAPACITY + 1;

/// Inbound events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One pass of the scheduler's main tick
    Tick,
    /// A callback from the Zigbee stack
    Stack(StackNotification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: NetworkLifecycleState,
    pub to: NetworkLifecycleState,
}

/// Everything an event changed, in the order it happened
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub transitions: Vec<Transition, MAX_TRANSITIONS>,
    pub notices: Vec<Notice, MAX_NOTICES>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.notices.is_empty()
    }

    fn notice(&mut self, notice: Notice) {
        notice.emit();
        if self.notices.push(notice).is_err() {
            warn!("Notice buffer full, dropping: {}", notice);
        }
    }

    fn transition(&mut self, from: NetworkLifecycleState, to: NetworkLifecycleState) {
        if self.transitions.push(Transition { from, to }).is_err() {
            warn!("Transition buffer full, dropping {:?} -> {:?}", from, to);
        }
    }

    /// Append the contents of `other`, dropping whatever does not fit
    fn merge(&mut self, other: Reaction) {
        for transition in other.transitions {
            self.transition(transition.from, transition.to);
        }
        for notice in other.notices {
            if self.notices.push(notice).is_err() {
                warn!("Notice buffer full, dropping: {}", notice);
            }
        }
    }
}

pub struct Controller<'a> {
    config: ControllerConfig,
    latch: &'a InputLatch,
    registry: DeviceRegistry,
    lifecycle: NetworkLifecycle,
    pending: WorkSlot<DeferredWork>,
    toggle: ToggleSender,
}

impl<'a> Controller<'a> {
    pub fn new(config: ControllerConfig, latch: &'a InputLatch) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            lifecycle: NetworkLifecycle::new(config.centralized),
            pending: WorkSlot::new(),
            toggle: ToggleSender::new(&config),
            config,
            latch,
        }
    }

    pub fn state(&self) -> NetworkLifecycleState {
        self.lifecycle.state()
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Whether network bring-up is armed but has not run yet
    pub fn bring_up_pending(&self) -> bool {
        self.pending.is_armed()
    }

    /// Process one inbound event
    pub fn handle<S: ZigbeeStack>(&mut self, event: Event, stack: &mut S) -> Reaction {
        match event {
            Event::Tick => self.tick(stack),
            Event::Stack(notification) => self.on_stack_notification(notification, stack),
        }
    }

    /// Drain queued stack notifications, then run one tick.
    ///
    /// At most one channel's worth is taken per call so the [`Reaction`]
    /// always has room; anything queued meanwhile waits for the next poll.
    pub fn poll<S: ZigbeeStack>(
        &mut self,
        notifications: &NotificationReceiver<'_>,
        stack: &mut S,
    ) -> Reaction {
        let mut reaction = Reaction::default();
        for _ in 0..NOTIFICATION_CAPACITY {
            let Ok(notification) = notifications.try_receive() else {
                break;
            };
            reaction.merge(self.on_stack_notification(notification, stack));
        }
        reaction.merge(self.tick(stack));
        reaction
    }

    /// Main tick: dispatch latched buttons, then drain deferred work.
    ///
    /// BTN0 only arms the bring-up; it runs after the dispatcher, never inline.
    /// Each flag is cleared once its action has been dispatched.
    pub fn tick<S: ZigbeeStack>(&mut self, stack: &mut S) -> Reaction {
        let mut reaction = Reaction::default();
        if !self.latch.any_pending() && !self.pending.is_armed() {
            return reaction;
        }

        if self.latch.is_pending(ButtonId::Network) {
            if self.pending.arm(DeferredWork::FormNetwork) {
                debug!(" Network bring-up already armed");
            }
            self.latch.clear(ButtonId::Network);
        }

        if self.latch.is_pending(ButtonId::Toggle) {
            match self.registry.current() {
                None => reaction.notice(Notice::DeviceNotJoined),
                Some(target) => {
                    self.toggle.send(target, stack, |notice| reaction.notice(notice));
                }
            }
            self.latch.clear(ButtonId::Toggle);
        }

        if let Some(work) = self.pending.take() {
            match work {
                DeferredWork::FormNetwork => {
                    let mut transitions: Vec<Transition, MAX_TRANSITIONS> = Vec::new();
                    self.lifecycle.bring_up(
                        stack,
                        |notice| reaction.notice(notice),
                        |from, to| {
                            let _ = transitions.push(Transition { from, to });
                        },
                    );
                    for t in transitions {
                        reaction.transition(t.from, t.to);
                    }
                }
            }
        }

        reaction
    }

    fn on_stack_notification<S: ZigbeeStack>(
        &mut self,
        notification: StackNotification,
        stack: &mut S,
    ) -> Reaction {
        let mut reaction = Reaction::default();
        match notification {
            StackNotification::StackStatus(status) => {
                let mut transitions: Vec<Transition, MAX_TRANSITIONS> = Vec::new();
                self.lifecycle.on_stack_status(
                    status,
                    stack,
                    |notice| reaction.notice(notice),
                    |from, to| {
                        let _ = transitions.push(Transition { from, to });
                    },
                );
                for t in transitions {
                    reaction.transition(t.from, t.to);
                }
            }
            StackNotification::DeviceJoined(join) => {
                if self.registry.observe(&join, self.config.join_policy) {
                    reaction.notice(Notice::DeviceCaptured(join.short_id));
                }
            }
            StackNotification::SteeringComplete(report) => {
                debug!(
                    " Steering finished after {} beacons, {} join attempts",
                    report.total_beacons, report.join_attempts
                );
                reaction.notice(Notice::SteeringComplete(report.status));
            }
            StackNotification::RadioNeedsCalibrating => {
                debug!(" Recalibrating radio");
                stack.calibrate_current_channel();
            }
        }
        reaction
    }
}
