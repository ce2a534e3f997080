//! NullSink - discards frames

use std::sync::Arc;

use contracts::{CombinedFrame, ContractError, EyeFrame, FrameSink};

use crate::metrics::SinkMetrics;

/// Sink that accepts and discards everything (benchmarks, dry runs)
pub struct NullSink {
    name: String,
    metrics: Arc<SinkMetrics>,
}

impl NullSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl FrameSink for NullSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        self.metrics.record_delivery(frame.data.len());
        Ok(())
    }

    fn deliver_eye(&mut self, _frame: &EyeFrame<'_>) -> Result<(), ContractError> {
        self.metrics.inc_eye_count();
        Ok(())
    }
}
