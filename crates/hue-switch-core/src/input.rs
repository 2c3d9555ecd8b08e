//! Button input latch
//!
//! Converts asynchronous button-change notifications into two independent
//! pending-action flags. The change handler may run in interrupt context, so
//! every flag is a single `AtomicBool` touched only with plain loads and
//! stores. That keeps the latch usable on cores without compare-and-swap.

use core::sync::atomic::{AtomicBool, Ordering};

/// Number of monitored buttons
pub const BUTTON_COUNT: usize = 2;

/// Logical buttons of the switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// BTN0: create the network and open it for joining
    Network,
    /// BTN1: toggle the joined device
    Toggle,
}

impl ButtonId {
    /// Map a hardware button index (0 or 1) onto a logical button
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Network),
            1 => Some(Self::Toggle),
            _ => None,
        }
    }

    /// Hardware button index
    pub const fn index(self) -> usize {
        match self {
            Self::Network => 0,
            Self::Toggle => 1,
        }
    }
}

/// Debounced physical state reported by the input subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Pending-action flags for both buttons.
///
/// Producer sets, a single consumer (the dispatcher) clears. A release that
/// arrives while a flag is still pending is coalesced into the same action.
///
/// ```no_run
/// use hue_switch_core::{ButtonId, ButtonState, InputLatch};
///
/// static LATCH: InputLatch = InputLatch::new();
///
/// // From the button interrupt:
/// LATCH.on_button_change(ButtonId::Toggle, ButtonState::Released);
/// ```
pub struct InputLatch {
    flags: [AtomicBool; BUTTON_COUNT],
}

impl InputLatch {
    pub const fn new() -> Self {
        Self {
            flags: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Entry point for the input subsystem.
    ///
    /// Only a release edge latches; presses and bounces are ignored.
    pub fn on_button_change(&self, button: ButtonId, state: ButtonState) {
        if state == ButtonState::Released {
            self.flags[button.index()].store(true, Ordering::Release);
        }
    }

    /// Whether `button` has an unconsumed release
    pub fn is_pending(&self, button: ButtonId) -> bool {
        self.flags[button.index()].load(Ordering::Acquire)
    }

    pub fn any_pending(&self) -> bool {
        self.flags.iter().any(|flag| flag.load(Ordering::Acquire))
    }

    /// Consume the pending action of `button`
    pub fn clear(&self, button: ButtonId) {
        self.flags[button.index()].store(false, Ordering::Release);
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}
