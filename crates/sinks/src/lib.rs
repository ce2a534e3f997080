//! # Sinks
//!
//! Output side of the combiner.
//!
//! Responsibilities:
//! - Receive combined frames synchronously inside the combiner's lock
//! - Copy out what must outlive the call (`ChannelSink`)
//! - Fan out to several sinks, isolating failures
//! - Never block the capture threads: slow consumers drop frames

pub mod error;
pub mod factory;
pub mod metrics;
pub mod sinks;

pub use contracts::{CombinedFrame, CombinedFrameSnapshot, FrameSink};
pub use error::SinkError;
pub use factory::{create_sink, create_sinks, BuiltSink, SinkSet};
pub use crate::metrics::{record_sink_outcome, SinkMetrics, SinkMetricsSnapshot};
pub use sinks::{spawn_drain, ChannelSink, FanoutSink, FrameReceiver, LogSink, NullSink};
