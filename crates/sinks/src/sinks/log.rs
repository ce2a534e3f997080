//! LogSink - logs frame summaries via tracing

use std::sync::Arc;

use contracts::{CombinedFrame, ContractError, EyeFrame, FrameSink};
use tracing::{debug, info, instrument};

use crate::metrics::SinkMetrics;

/// Sink that logs frame summaries for debugging
pub struct LogSink {
    name: String,
    /// Log every n-th combined frame at info level (others at debug)
    every_n: u64,
    metrics: Arc<SinkMetrics>,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            every_n: 1,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Only log every `n`-th frame at info level
    pub fn every(mut self, n: u64) -> Self {
        self.every_n = n.max(1);
        self
    }

    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    fn log_frame_summary(&self, frame: &CombinedFrame<'_>) {
        if frame.frame_id % self.every_n == 0 {
            info!(
                sink = %self.name,
                frame_id = frame.frame_id,
                timestamp_ns = frame.timestamp_ns,
                delta_ns = frame.delta_ns,
                width = frame.width,
                height = frame.height,
                bytes = frame.data.len(),
                "combined frame"
            );
        } else {
            debug!(
                sink = %self.name,
                frame_id = frame.frame_id,
                delta_ns = frame.delta_ns,
                "combined frame"
            );
        }
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        level = "trace",
        name = "log_sink_deliver",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        self.log_frame_summary(frame);
        self.metrics.record_delivery(frame.data.len());
        Ok(())
    }

    fn deliver_eye(&mut self, frame: &EyeFrame<'_>) -> Result<(), ContractError> {
        debug!(
            sink = %self.name,
            channel = %frame.channel,
            timestamp_ns = frame.timestamp_ns,
            "eye frame"
        );
        self.metrics.inc_eye_count();
        Ok(())
    }
}
