//! Thread-safe combiner handle.
//!
//! Both capture threads call [`SharedCombiner::on_frame_available`]. One
//! mutex guards the whole accept/combine/deliver sequence, so the sink sees
//! every combined frame before the next arrival can overwrite the output
//! buffer.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{
    BufferAllocator, CombinerConfig, FrameCallback, FrameSink, RawFrame, StereoChannel,
};
use tracing::{error, instrument, warn};

use crate::engine::{CombinerStats, StereoCombiner};
use crate::error::CombineError;

struct Inner {
    combiner: StereoCombiner,
    sink: Box<dyn FrameSink>,
}

/// Cloneable handle to a combiner and its sink
#[derive(Clone)]
pub struct SharedCombiner {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for SharedCombiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SharedCombiner")
            .field("combiner", &inner.combiner)
            .field("sink", &inner.sink.name())
            .finish()
    }
}

impl SharedCombiner {
    pub fn new<S>(config: CombinerConfig, sink: S) -> Self
    where
        S: FrameSink + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                combiner: StereoCombiner::new(config),
                sink: Box::new(sink),
            })),
        }
    }

    /// A panicking sink must not wedge both capture threads; the combiner's
    /// own state is consistent between calls, so the guard is recovered.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("combiner mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Hand a captured frame to the combiner
    ///
    /// Returns `Ok(true)` if the frame completed a pair that was delivered to
    /// the sink. Sink failures are logged and counted but never returned:
    /// the pair is consumed either way.
    #[instrument(
        level = "trace",
        name = "shared_combiner_frame",
        skip(self, frame),
        fields(channel = %channel, timestamp_ns = frame.timestamp_ns)
    )]
    pub fn on_frame_available(
        &self,
        channel: StereoChannel,
        frame: RawFrame,
    ) -> Result<bool, CombineError> {
        let mut guard = self.lock();
        let Inner { combiner, sink } = &mut *guard;

        combiner.accept(channel, frame)?;

        if combiner.config().forward_eye_frames {
            if let Some(eye) = combiner.eye_frame(channel) {
                if let Err(e) = sink.deliver_eye(&eye) {
                    warn!(sink = sink.name(), channel = %channel, error = %e, "eye frame delivery failed");
                }
            }
        }

        let Some(frame) = combiner.try_combine() else {
            return Ok(false);
        };

        let status = match sink.deliver(&frame) {
            Ok(()) => "success",
            Err(e) => {
                warn!(
                    sink = sink.name(),
                    frame_id = frame.frame_id,
                    error = %e,
                    "combined frame delivery failed"
                );
                "failure"
            }
        };
        metrics::counter!("stereo_pair_deliveries_total", "status" => status).increment(1);

        Ok(true)
    }

    /// Callback for a [`contracts::FrameSource`]
    ///
    /// Rejected frames are logged; the capture thread never sees the error.
    pub fn callback(&self) -> FrameCallback {
        let combiner = self.clone();
        Arc::new(move |channel, frame| {
            if let Err(e) = combiner.on_frame_available(channel, frame) {
                error!(channel = %channel, error = %e, "frame rejected");
            }
        })
    }

    /// Drop pending frames and pooled buffers
    pub fn clear(&self) {
        self.lock().combiner.clear();
    }

    /// Flush the sink
    pub fn flush(&self) -> Result<(), contracts::ContractError> {
        self.lock().sink.flush()
    }

    pub fn stats(&self) -> CombinerStats {
        self.lock().combiner.stats()
    }

    pub fn frame_count(&self) -> u64 {
        self.lock().combiner.frame_count()
    }

    pub fn config(&self) -> CombinerConfig {
        self.lock().combiner.config().clone()
    }
}

impl BufferAllocator for SharedCombiner {
    fn acquire_buffer(&self, len: usize) -> Vec<u8> {
        self.lock().combiner.acquire_buffer(len)
    }
}
