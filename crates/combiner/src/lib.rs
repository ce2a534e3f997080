//! # Combiner
//!
//! Stereo frame combiner.
//!
//! Responsibilities:
//! - Hold at most one pending frame per channel (most recent wins)
//! - Pair left/right frames whose timestamps differ by less than the tolerance
//! - Concatenate both eyes side by side into one reused output buffer
//! - Recycle frame buffers through a bounded pool
//!
//! ## Example
//!
//! ```ignore
//! use combiner::{CombinerConfig, SharedCombiner};
//!
//! let combiner = SharedCombiner::new(CombinerConfig::default(), my_sink);
//!
//! // From each capture thread
//! let paired: bool = combiner.on_frame_available(StereoChannel::Left, frame)?;
//! if paired {
//!     // this frame completed a pair and the sink has seen it
//! }
//! ```

mod engine;
mod error;
mod layout;
mod pool;
mod shared;
mod slots;

pub use engine::{CombinerStats, StereoCombiner};
pub use error::CombineError;
pub use layout::combine_planes;
pub use pool::{BufferPool, PoolStats};
pub use shared::SharedCombiner;

// Re-export contracts types
pub use contracts::{
    BufferAllocator, CameraCalibration, CombinedFrame, CombinerConfig, EyeFrame, FrameCallback,
    FrameGeometry, FrameSink, RawFrame, StereoChannel, StereoMetadata,
};
