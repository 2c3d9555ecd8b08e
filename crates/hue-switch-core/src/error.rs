//! Error types shared across the controller

use thiserror_no_std::Error;

use crate::stack::Status;

/// The Zigbee stack refused or failed a request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("stack returned status {0}")]
pub struct StackError(pub Status);

impl StackError {
    pub const fn status(self) -> Status {
        self.0
    }
}

/// Failures while building or decoding a ZCL frame
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("payload exceeds {capacity} bytes")]
    Overflow { capacity: usize },
    #[error("frame truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
}
