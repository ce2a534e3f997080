//! Per-sink counters for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Record the outcome of one sink operation
///
/// Emits `stereo_sink_deliveries_total{sink, op, status}`; `op` is `deliver`,
/// `deliver_eye` or `flush`.
pub fn record_sink_outcome(sink_name: &str, op: &'static str, success: bool) {
    let status = if success { "success" } else { "failure" };
    ::metrics::counter!(
        "stereo_sink_deliveries_total",
        "sink" => sink_name.to_string(),
        "op" => op,
        "status" => status
    )
    .increment(1);
}

/// Counters for a single sink
///
/// Shared through an `Arc` so the pipeline can read them while the sink is
/// owned by the combiner.
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Approximate queue length (channel sinks only)
    queue_len: AtomicUsize,
    /// Combined frames accepted
    delivered_count: AtomicU64,
    /// Eye frames accepted
    eye_count: AtomicU64,
    /// Delivery failures
    failure_count: AtomicU64,
    /// Frames dropped because the queue was full
    dropped_count: AtomicU64,
    /// Payload bytes accepted
    bytes: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    /// Record one accepted combined frame of `bytes` bytes
    pub fn record_delivery(&self, bytes: usize) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn eye_count(&self) -> u64 {
        self.eye_count.load(Ordering::Relaxed)
    }

    pub fn inc_eye_count(&self) {
        self.eye_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            queue_len: self.queue_len(),
            delivered_count: self.delivered_count(),
            eye_count: self.eye_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
            bytes: self.bytes(),
        }
    }
}

/// Snapshot of sink counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkMetricsSnapshot {
    pub queue_len: usize,
    pub delivered_count: u64,
    pub eye_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
    pub bytes: u64,
}
