//! Pipeline statistics and the sink that gathers them.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use combiner::CombinerStats;
use contracts::{CombinedFrame, ContractError, FrameSink, StereoChannel};
use observability::{CombinerMetricsAggregator, MetricsSummary};
use sinks::SinkMetricsSnapshot;

/// Why the pipeline stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// Both cameras produced their frame budget
    #[default]
    CaptureFinished,
    /// `--max-pairs` reached
    MaxPairs,
    /// `--timeout` elapsed
    Timeout,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaptureFinished => write!(f, "capture finished"),
            Self::MaxPairs => write!(f, "max pairs reached"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Combined frames produced
    pub pairs: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    pub stop_reason: StopReason,

    /// Frames produced by each synthetic camera
    pub captured: [u64; 2],

    /// Combiner counters at shutdown
    pub combiner: CombinerStats,

    /// Per-sink counters
    pub sinks: Vec<(String, SinkMetricsSnapshot)>,

    /// Snapshots consumed by each channel sink's drain task
    pub drained: Vec<(String, u64)>,

    /// Aggregated pair statistics
    pub metrics: MetricsSummary,
}

impl PipelineStats {
    /// Combined frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.pairs as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Stopped: {}", self.stop_reason);
        println!("   ├─ Combined frames: {}", self.pairs);
        println!("   └─ FPS: {:.2}", self.fps());

        println!("\n🎞  Combiner");
        for channel in StereoChannel::ALL {
            let i = channel.index();
            println!(
                "   ├─ {}: {} captured, {} received, {} superseded",
                channel, self.captured[i], self.combiner.received[i], self.combiner.superseded[i]
            );
        }
        println!("   ├─ Geometry rejections: {}", self.combiner.rejected);
        println!(
            "   ├─ Pool: {} allocated, {} reused, {} discarded",
            self.combiner.pool.allocated,
            self.combiner.pool.reused,
            self.combiner.pool.discarded_mismatched
        );
        println!("   ├─ Pair delta (ms): {}", self.metrics.delta_ms);
        println!(
            "   └─ Pair rate: {:.2}% of slower channel",
            self.metrics.pair_rate
        );

        if !self.sinks.is_empty() {
            println!("\n📤 Sinks");
            for (i, (name, snapshot)) in self.sinks.iter().enumerate() {
                let prefix = if i == self.sinks.len() - 1 { "└─" } else { "├─" };
                println!(
                    "   {} {}: {} delivered, {} eye frames, {} dropped, {} failed, {} bytes",
                    prefix,
                    name,
                    snapshot.delivered_count,
                    snapshot.eye_count,
                    snapshot.dropped_count,
                    snapshot.failure_count,
                    snapshot.bytes
                );
            }
        }

        if !self.drained.is_empty() {
            println!("\n📥 Drained");
            for (i, (name, consumed)) in self.drained.iter().enumerate() {
                let prefix = if i == self.drained.len() - 1 { "└─" } else { "├─" };
                println!("   {} {}: {} snapshots", prefix, name, consumed);
            }
        }

        println!();
    }
}

/// Sink feeding every combined frame into the run's aggregator
pub struct StatsSink {
    aggregator: Arc<Mutex<CombinerMetricsAggregator>>,
}

impl StatsSink {
    pub fn new(aggregator: Arc<Mutex<CombinerMetricsAggregator>>) -> Self {
        Self { aggregator }
    }
}

impl FrameSink for StatsSink {
    fn name(&self) -> &str {
        "stats"
    }

    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        observability::record_combined_frame(frame);
        self.aggregator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(frame);
        Ok(())
    }
}
