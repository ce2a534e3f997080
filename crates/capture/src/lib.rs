//! # Capture
//!
//! Synthetic capture channels.
//!
//! Responsibilities:
//! - Implement `FrameSource` with a background producer thread
//! - Fill buffers acquired from a `BufferAllocator` (usually the combiner's pool)
//! - Stamp frames on a shared epoch so a stereo rig's clocks agree
//!
//! ## Example
//!
//! ```ignore
//! let rig = StereoRig::new(&blueprint.capture, geometry, Arc::new(combiner.clone()), None)?;
//! rig.start(combiner.callback());
//! ```

pub mod calibration;
pub mod camera;
pub mod error;
pub mod rig;

pub use calibration::nominal_calibration;
pub use camera::{SyntheticCamera, SyntheticCameraConfig};
pub use contracts::FrameSource;
pub use error::{CaptureError, Result};
pub use rig::StereoRig;
