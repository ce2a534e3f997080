//! Combiner error types

use contracts::{FrameGeometry, StereoChannel};
use thiserror::Error;

/// Combiner-specific errors
///
/// Only caller contract violations are errors; a frame waiting for its
/// partner is reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    /// Frame buffer does not match the configured per-eye geometry
    #[error("{channel} frame has {actual} bytes, expected {expected} for {geometry}")]
    GeometryMismatch {
        channel: StereoChannel,
        geometry: FrameGeometry,
        expected: usize,
        actual: usize,
    },
}
