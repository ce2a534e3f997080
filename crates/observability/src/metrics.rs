//! Combined-frame metrics
//!
//! The combiner itself emits counters for arrivals, supersessions and
//! pairings. This module adds per-output metrics and an in-memory aggregator
//! for end-of-run summaries.

use contracts::{CombinedFrame, StereoChannel};
use metrics::{counter, gauge, histogram};

/// Record metrics for one delivered combined frame
///
/// # Example
///
/// ```ignore
/// fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
///     observability::record_combined_frame(frame);
///     // ...
/// }
/// ```
pub fn record_combined_frame(frame: &CombinedFrame<'_>) {
    counter!("stereo_combined_frames_total").increment(1);
    counter!("stereo_combined_bytes_total").increment(frame.data.len() as u64);
    gauge!("stereo_last_frame_id").set(frame.frame_id as f64);
    histogram!("stereo_pair_delta_ms").record(frame.delta_ns.unsigned_abs() as f64 / 1e6);
}

/// Combined-frame aggregator
///
/// Aggregates in memory for statistics and summary output.
#[derive(Debug, Clone, Default)]
pub struct CombinerMetricsAggregator {
    /// Combined frames seen
    pub total_pairs: u64,

    /// Pairs where the right eye was captured before the left
    pub right_first_pairs: u64,

    /// Gaps in the frame id sequence (pairs missed by this observer)
    pub frame_id_gaps: u64,

    /// |right - left| in milliseconds
    pub delta_stats: RunningStats,

    /// Time between consecutive combined frames in milliseconds
    pub interval_stats: RunningStats,

    /// Frames received per channel (set at the end of a run)
    pub received: [u64; 2],

    /// Frames superseded per channel (set at the end of a run)
    pub superseded: [u64; 2],

    last_frame_id: Option<u64>,
    last_timestamp_ns: Option<i64>,
}

impl CombinerMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aggregates from one combined frame
    pub fn update(&mut self, frame: &CombinedFrame<'_>) {
        self.total_pairs += 1;
        if frame.delta_ns < 0 {
            self.right_first_pairs += 1;
        }
        self.delta_stats
            .push(frame.delta_ns.unsigned_abs() as f64 / 1e6);

        if let Some(last) = self.last_frame_id {
            self.frame_id_gaps += frame.frame_id.saturating_sub(last + 1);
        }
        if let Some(last) = self.last_timestamp_ns {
            self.interval_stats
                .push((frame.timestamp_ns - last) as f64 / 1e6);
        }

        self.last_frame_id = Some(frame.frame_id);
        self.last_timestamp_ns = Some(frame.timestamp_ns);
    }

    /// Record per-channel arrival totals
    pub fn set_channel_totals(&mut self, received: [u64; 2], superseded: [u64; 2]) {
        self.received = received;
        self.superseded = superseded;
    }

    /// Generate summary
    pub fn summary(&self) -> MetricsSummary {
        let limiting = self.received.iter().copied().min().unwrap_or(0);
        MetricsSummary {
            total_pairs: self.total_pairs,
            right_first_pairs: self.right_first_pairs,
            frame_id_gaps: self.frame_id_gaps,
            received: self.received,
            superseded: self.superseded,
            pair_rate: if limiting > 0 {
                self.total_pairs as f64 / limiting as f64 * 100.0
            } else {
                0.0
            },
            delta_ms: StatsSummary::from(&self.delta_stats),
            interval_ms: StatsSummary::from(&self.interval_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_pairs: u64,
    pub right_first_pairs: u64,
    pub frame_id_gaps: u64,
    pub received: [u64; 2],
    pub superseded: [u64; 2],
    /// Pairs per frame of the slower channel (%)
    pub pair_rate: f64,
    pub delta_ms: StatsSummary,
    pub interval_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Stereo Metrics Summary ===")?;
        writeln!(
            f,
            "Combined frames: {} ({:.2}% of slower channel)",
            self.total_pairs, self.pair_rate
        )?;
        for channel in StereoChannel::ALL {
            writeln!(
                f,
                "{} frames: {} received, {} superseded",
                channel,
                self.received[channel.index()],
                self.superseded[channel.index()]
            )?;
        }
        writeln!(f, "Right-first pairs: {}", self.right_first_pairs)?;
        if self.frame_id_gaps > 0 {
            writeln!(f, "Frame id gaps: {}", self.frame_id_gaps)?;
        }
        writeln!(f, "Pair delta (ms): {}", self.delta_ms)?;
        writeln!(f, "Pair interval (ms): {}", self.interval_ms)?;
        Ok(())
    }
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
