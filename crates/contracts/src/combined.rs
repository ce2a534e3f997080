//! CombinedFrame - Combiner output
//!
//! Side-by-side stereo buffer plus merged calibration.

use bytes::Bytes;

use crate::StereoMetadata;

/// Combined stereo frame
///
/// Borrows the combiner's scratch buffer, so it is only valid until the next
/// combiner call. Sinks that need to keep it must copy it out with
/// [`CombinedFrame::to_snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct CombinedFrame<'a> {
    /// Pairing sequence number (monotonically increasing, starts at 1)
    pub frame_id: u64,

    /// Side-by-side planar YUV 4:2:0 pixels
    pub data: &'a [u8],

    /// Combined width (twice the per-eye width)
    pub width: u32,

    /// Per-eye height
    pub height: u32,

    /// Left eye capture timestamp (nanoseconds)
    pub timestamp_ns: i64,

    /// Right timestamp minus left timestamp (nanoseconds)
    pub delta_ns: i64,

    /// Calibration of both eyes
    pub metadata: StereoMetadata,
}

impl CombinedFrame<'_> {
    /// Copy the frame out of the transient scratch buffer
    pub fn to_snapshot(&self) -> CombinedFrameSnapshot {
        CombinedFrameSnapshot {
            frame_id: self.frame_id,
            data: Bytes::copy_from_slice(self.data),
            width: self.width,
            height: self.height,
            timestamp_ns: self.timestamp_ns,
            delta_ns: self.delta_ns,
            metadata: self.metadata,
        }
    }
}

/// Owned copy of a [`CombinedFrame`] that may outlive the delivery call
#[derive(Debug, Clone)]
pub struct CombinedFrameSnapshot {
    pub frame_id: u64,
    /// Pixel data (cheap to clone)
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub timestamp_ns: i64,
    pub delta_ns: i64,
    pub metadata: StereoMetadata,
}
