//! RawFrame - Capture channel output
//!
//! One planar YUV 4:2:0 capture from a single eye, plus its calibration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::StereoChannel;

/// Per-eye image dimensions
///
/// The buffer layout is a full-resolution luma plane followed by `height / 2`
/// chroma rows of `width` bytes each (interleaved UV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameGeometry {
    /// Per-eye width in pixels
    pub width: u32,
    /// Per-eye height in pixels
    pub height: u32,
}

impl FrameGeometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes in one luma row (and in one chroma row)
    #[inline]
    pub const fn row_len(&self) -> usize {
        self.width as usize
    }

    /// Bytes in the luma plane
    #[inline]
    pub const fn luma_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of subsampled chroma rows
    #[inline]
    pub const fn chroma_rows(&self) -> usize {
        self.height as usize / 2
    }

    /// Bytes in one eye's buffer (`width * height * 3 / 2` for even heights)
    #[inline]
    pub const fn eye_len(&self) -> usize {
        self.luma_len() + self.chroma_rows() * self.row_len()
    }

    /// Width of the side-by-side output
    #[inline]
    pub const fn combined_width(&self) -> u32 {
        self.width * 2
    }

    /// Bytes in the side-by-side output buffer
    #[inline]
    pub const fn combined_len(&self) -> usize {
        self.eye_len() * 2
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::new(1280, 960)
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-camera calibration delivered alongside every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// `[fx, fy, cx, cy, skew]`
    pub intrinsics: [f32; 5],
    /// Radial/tangential distortion coefficients
    pub distortion: [f32; 6],
    /// `[tx, ty, tz, qx, qy, qz, qw]`, translation in meters + unit quaternion
    pub pose: [f32; 7],
}

/// Raw frame from one capture channel
///
/// Owned by the combiner once handed off; `data` goes back to the buffer pool
/// when the frame is combined or superseded.
#[derive(Clone, Default)]
pub struct RawFrame {
    /// Planar YUV 4:2:0 pixels
    pub data: Vec<u8>,

    /// Capture instant (monotonic nanoseconds)
    pub timestamp_ns: i64,

    /// Camera calibration at capture time
    pub calibration: CameraCalibration,
}

impl RawFrame {
    pub fn new(data: Vec<u8>, timestamp_ns: i64, calibration: CameraCalibration) -> Self {
        Self {
            data,
            timestamp_ns,
            calibration,
        }
    }

    /// Whether the buffer length matches the given per-eye geometry
    #[inline]
    pub fn matches(&self, geometry: &FrameGeometry) -> bool {
        self.data.len() == geometry.eye_len()
    }

    /// Borrow this frame as an [`EyeFrame`] view
    pub fn as_eye_frame(&self, channel: StereoChannel, geometry: FrameGeometry) -> EyeFrame<'_> {
        EyeFrame {
            channel,
            geometry,
            data: &self.data,
            timestamp_ns: self.timestamp_ns,
            calibration: &self.calibration,
        }
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("len", &self.data.len())
            .field("timestamp_ns", &self.timestamp_ns)
            .field("calibration", &self.calibration)
            .finish()
    }
}

/// Borrowed view of a single accepted eye frame, lent to sinks that forward
/// per-eye images.
#[derive(Debug, Clone, Copy)]
pub struct EyeFrame<'a> {
    pub channel: StereoChannel,
    pub geometry: FrameGeometry,
    pub data: &'a [u8],
    pub timestamp_ns: i64,
    pub calibration: &'a CameraCalibration,
}
