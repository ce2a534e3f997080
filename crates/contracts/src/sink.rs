//! FrameSink trait - Combiner output interface
//!
//! Defines the abstract interface for sinks.

use crate::{CombinedFrame, ContractError, EyeFrame};

/// Frame delivery trait
///
/// Called synchronously while the combiner holds its lock. Frames are lent
/// for the duration of the call only.
pub trait FrameSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver a combined stereo frame
    ///
    /// # Errors
    /// Returns delivery error (should include context)
    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError>;

    /// Deliver a single accepted eye frame (only when eye forwarding is enabled)
    fn deliver_eye(&mut self, _frame: &EyeFrame<'_>) -> Result<(), ContractError> {
        Ok(())
    }

    /// Flush buffered output (if any)
    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        (**self).deliver(frame)
    }

    fn deliver_eye(&mut self, frame: &EyeFrame<'_>) -> Result<(), ContractError> {
        (**self).deliver_eye(frame)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        (**self).flush()
    }
}
