//! Combiner configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

use crate::FrameGeometry;

/// Default pairing tolerance (5 ms)
pub const DEFAULT_SYNC_TOLERANCE_NS: u64 = 5_000_000;

/// Default number of buffers retained by the pool
pub const DEFAULT_POOL_CAPACITY: usize = 4;

/// Stereo combiner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinerConfig {
    /// Per-eye frame geometry every incoming frame must match
    #[serde(flatten)]
    pub geometry: FrameGeometry,

    /// Maximum |left - right| timestamp delta for a pair (exclusive, ns)
    #[serde(default = "default_sync_tolerance_ns")]
    pub sync_tolerance_ns: u64,

    /// Buffers kept for reuse by the pool
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,

    /// Also lend every accepted eye frame to the sink before pairing
    #[serde(default)]
    pub forward_eye_frames: bool,
}

fn default_sync_tolerance_ns() -> u64 {
    DEFAULT_SYNC_TOLERANCE_NS
}

fn default_pool_capacity() -> usize {
    DEFAULT_POOL_CAPACITY
}

impl CombinerConfig {
    /// Configuration for the given geometry with default tolerance and pool size
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            sync_tolerance_ns: DEFAULT_SYNC_TOLERANCE_NS,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            forward_eye_frames: false,
        }
    }

    pub fn with_sync_tolerance_ns(mut self, tolerance_ns: u64) -> Self {
        self.sync_tolerance_ns = tolerance_ns;
        self
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn with_eye_forwarding(mut self, enabled: bool) -> Self {
        self.forward_eye_frames = enabled;
        self
    }
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self::new(FrameGeometry::default())
    }
}
