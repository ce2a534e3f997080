//! StereoBlueprint - Config Loader output
//!
//! Describes a complete stereo pipeline: combiner geometry and tolerance,
//! capture cadence, and output sinks.

use serde::{Deserialize, Serialize};

use crate::CombinerConfig;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StereoBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Combiner settings
    #[serde(default)]
    pub combiner: CombinerConfig,

    /// Capture cadence for the synthetic stereo rig
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Output routing
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Synthetic capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Frames per second per channel
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: f64,

    /// Constant offset of the right channel's clock (ns, may be negative)
    #[serde(default = "default_right_offset_ns")]
    pub right_offset_ns: i64,

    /// Peak per-frame timestamp jitter (ns)
    #[serde(default = "default_jitter_ns")]
    pub jitter_ns: u64,

    /// Distance between the two cameras (meters)
    #[serde(default = "default_baseline_m")]
    pub baseline_m: f32,
}

fn default_frame_rate_hz() -> f64 {
    30.0
}

fn default_right_offset_ns() -> i64 {
    1_000_000
}

fn default_jitter_ns() -> u64 {
    500_000
}

fn default_baseline_m() -> f32 {
    0.064
}

impl CaptureConfig {
    /// Nominal interval between two frames of one channel (ns)
    pub fn frame_interval_ns(&self) -> u64 {
        (1e9 / self.frame_rate_hz) as u64
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: default_frame_rate_hz(),
            right_offset_ns: default_right_offset_ns(),
            jitter_ns: default_jitter_ns(),
            baseline_m: default_baseline_m(),
        }
    }
}

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name (unique)
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity (channel sinks only)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    8
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log a summary of every frame
    Log,
    /// Copy frames into a bounded queue for an async consumer
    Channel,
    /// Discard frames
    Null,
}
