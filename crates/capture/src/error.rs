//! Capture error types

use contracts::FrameGeometry;
use thiserror::Error;

/// Capture-specific error
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Frame rate is zero, negative or not finite
    #[error("invalid frame rate {frame_rate_hz} Hz")]
    InvalidFrameRate { frame_rate_hz: f64 },

    /// Geometry cannot hold a 4:2:0 frame
    #[error("invalid capture geometry {geometry}: {message}")]
    InvalidGeometry {
        geometry: FrameGeometry,
        message: String,
    },
}

impl CaptureError {
    /// Create invalid geometry error
    pub fn invalid_geometry(geometry: FrameGeometry, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            geometry,
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, CaptureError>;
