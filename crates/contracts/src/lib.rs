//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: stereo
//! channels, raw and combined frames, the 36-float calibration layout, the
//! sink/source traits and configuration.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Time Model
//! - Timestamps are monotonic nanoseconds (`i64`) in a clock domain shared by
//!   both capture channels.
//! - A combined frame carries the left eye's timestamp.

mod blueprint;
mod channel;
mod combined;
mod combiner_config;
mod error;
mod frame;
mod frame_source;
mod metadata;
mod sink;

pub use blueprint::*;
pub use channel::StereoChannel;
pub use combined::{CombinedFrame, CombinedFrameSnapshot};
pub use combiner_config::*;
pub use error::*;
pub use frame::{CameraCalibration, EyeFrame, FrameGeometry, RawFrame};
pub use frame_source::{BufferAllocator, FrameCallback, FrameSource};
pub use metadata::{StereoMetadata, METADATA_LEN};
pub use sink::FrameSink;
