//! ChannelSink - hands combined frames to an async consumer
//!
//! Delivery runs inside the combiner's critical section, so the sink never
//! blocks: each frame is copied into an owned snapshot and pushed with
//! `try_send`. When the consumer falls behind, frames are dropped.

use std::sync::Arc;

use contracts::{CombinedFrame, CombinedFrameSnapshot, ContractError, FrameSink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::error::SinkError;
use crate::metrics::SinkMetrics;

/// Receiving side of a [`ChannelSink`]
pub type FrameReceiver = mpsc::Receiver<CombinedFrameSnapshot>;

/// Sink that forwards snapshots through a bounded queue
pub struct ChannelSink {
    name: String,
    tx: mpsc::Sender<CombinedFrameSnapshot>,
    metrics: Arc<SinkMetrics>,
}

impl ChannelSink {
    /// Create a sink and its receiver
    ///
    /// # Errors
    /// `queue_capacity` must be positive.
    pub fn new(
        name: impl Into<String>,
        queue_capacity: usize,
    ) -> Result<(Self, FrameReceiver), SinkError> {
        let name = name.into();
        if queue_capacity == 0 {
            return Err(SinkError::sink_creation(name, "queue capacity must be > 0"));
        }

        let (tx, rx) = mpsc::channel(queue_capacity);
        let sink = Self {
            name,
            tx,
            metrics: Arc::new(SinkMetrics::new()),
        };
        Ok((sink, rx))
    }

    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Queue a snapshot without blocking
    pub fn try_forward(&self, snapshot: CombinedFrameSnapshot) -> Result<(), SinkError> {
        match self.tx.try_send(snapshot) {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(frame)) => Err(SinkError::QueueFull {
                sink_name: self.name.clone(),
                frame_id: frame.frame_id,
            }),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SinkError::Closed {
                sink_name: self.name.clone(),
            }),
        }
    }
}

impl FrameSink for ChannelSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        let bytes = frame.data.len();
        match self.try_forward(frame.to_snapshot()) {
            Ok(()) => {
                self.metrics.record_delivery(bytes);
                Ok(())
            }
            Err(SinkError::QueueFull { frame_id, .. }) => {
                self.metrics.inc_dropped_count();
                warn!(sink = %self.name, frame_id, "queue full, frame dropped");
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                Err(e.into())
            }
        }
    }
}

/// Spawn a task that drains `rx`, logging each snapshot
///
/// Resolves to the number of frames consumed once every sender is dropped.
pub fn spawn_drain(name: impl Into<String>, rx: FrameReceiver) -> JoinHandle<u64> {
    let name = name.into();
    tokio::spawn(drain(rx, name))
}

#[instrument(name = "channel_sink_drain", skip(rx), fields(sink = %name))]
async fn drain(mut rx: FrameReceiver, name: String) -> u64 {
    debug!(sink = %name, "drain started");

    let mut consumed = 0u64;
    while let Some(frame) = rx.recv().await {
        consumed += 1;
        debug!(
            sink = %name,
            frame_id = frame.frame_id,
            timestamp_ns = frame.timestamp_ns,
            bytes = frame.data.len(),
            "snapshot consumed"
        );
    }

    debug!(sink = %name, consumed, "drain stopped");
    consumed
}
