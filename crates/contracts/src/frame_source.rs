//! FrameSource trait - Capture channel abstraction
//!
//! Decouples the combiner from concrete capture implementations. Real device
//! pipelines and synthetic cameras expose the same callback-driven API.

use std::sync::Arc;

use crate::{RawFrame, StereoChannel};

/// Frame callback type
///
/// Invoked on the capture thread for every acquired frame. Uses `Arc` so the
/// same callback can be shared by both channels.
pub type FrameCallback = Arc<dyn Fn(StereoChannel, RawFrame) + Send + Sync>;

/// Source of frame buffers for capture channels
///
/// The shared combiner implements this so buffers released after combining
/// are handed straight back to the producers.
pub trait BufferAllocator: Send + Sync {
    /// Return a buffer of exactly `len` bytes
    fn acquire_buffer(&self, len: usize) -> Vec<u8>;
}

/// Capture channel trait
///
/// # Example
///
/// ```ignore
/// let camera: Box<dyn FrameSource> = open_camera(StereoChannel::Left);
/// camera.listen(Arc::new(move |channel, frame| {
///     let _ = combiner.on_frame_available(channel, frame);
/// }));
/// // ...
/// camera.stop();
/// ```
pub trait FrameSource: Send + Sync {
    /// Channel this source produces
    fn channel(&self) -> StereoChannel;

    /// Register the frame callback and start producing
    ///
    /// Repeated calls while already listening are ignored.
    fn listen(&self, callback: FrameCallback);

    /// Stop producing frames
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
