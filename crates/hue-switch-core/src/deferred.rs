//! Single-slot deferred work queue
//!
//! Decouples the tick that consumes a button from the moment its work runs.
//! The slot holds at most one item; arming an armed slot replaces the item.

/// Work the dispatcher defers to the end of the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredWork {
    /// Form the coordinator network if none exists yet
    FormNetwork,
}

#[derive(Debug)]
pub struct WorkSlot<T> {
    item: Option<T>,
}

impl<T> WorkSlot<T> {
    pub const fn new() -> Self {
        Self { item: None }
    }

    /// Arm the slot. Returns `true` if it was already armed.
    pub fn arm(&mut self, item: T) -> bool {
        self.item.replace(item).is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.item.is_some()
    }

    /// Drain the slot, leaving it empty
    pub fn take(&mut self) -> Option<T> {
        self.item.take()
    }
}

impl<T> Default for WorkSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_take() {
        let mut slot = WorkSlot::new();
        assert!(!slot.is_armed());

        assert!(!slot.arm(DeferredWork::FormNetwork));
        assert!(slot.is_armed());

        assert_eq!(slot.take(), Some(DeferredWork::FormNetwork));
        assert!(!slot.is_armed());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_rearming_coalesces() {
        let mut slot = WorkSlot::new();
        slot.arm(1);

        assert!(slot.arm(2));
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.take(), None);
    }
}
