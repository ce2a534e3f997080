//! Build sinks from configuration

use std::sync::Arc;

use contracts::{FrameSink, SinkConfig, SinkType};
use tracing::debug;

use crate::error::SinkError;
use crate::metrics::SinkMetrics;
use crate::sinks::{ChannelSink, FanoutSink, FrameReceiver, LogSink, NullSink};

/// A configured sink plus the handles the pipeline keeps
pub struct BuiltSink {
    pub name: String,
    pub sink: Box<dyn FrameSink>,
    pub metrics: Arc<SinkMetrics>,
    /// Present for channel sinks
    pub receiver: Option<FrameReceiver>,
}

impl std::fmt::Debug for BuiltSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltSink")
            .field("name", &self.name)
            .field("has_receiver", &self.receiver.is_some())
            .finish()
    }
}

/// Create a sink from its configuration
pub fn create_sink(config: &SinkConfig) -> Result<BuiltSink, SinkError> {
    let name = config.name.clone();
    let built = match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&name);
            BuiltSink {
                metrics: sink.metrics(),
                sink: Box::new(sink),
                receiver: None,
                name,
            }
        }
        SinkType::Null => {
            let sink = NullSink::new(&name);
            BuiltSink {
                metrics: sink.metrics(),
                sink: Box::new(sink),
                receiver: None,
                name,
            }
        }
        SinkType::Channel => {
            let (sink, rx) = ChannelSink::new(&name, config.queue_capacity)?;
            BuiltSink {
                metrics: sink.metrics(),
                sink: Box::new(sink),
                receiver: Some(rx),
                name,
            }
        }
    };

    debug!(sink = %built.name, sink_type = ?config.sink_type, "sink created");
    Ok(built)
}

/// Everything built from a sink list: one fanout plus per-sink handles
pub struct SinkSet {
    pub fanout: FanoutSink,
    pub metrics: Vec<(String, Arc<SinkMetrics>)>,
    pub receivers: Vec<(String, FrameReceiver)>,
}

/// Create every configured sink and combine them behind a [`FanoutSink`]
pub fn create_sinks(configs: &[SinkConfig]) -> Result<SinkSet, SinkError> {
    let mut set = SinkSet {
        fanout: FanoutSink::new("fanout"),
        metrics: Vec::with_capacity(configs.len()),
        receivers: Vec::new(),
    };

    for config in configs {
        let built = create_sink(config)?;
        set.metrics.push((built.name.clone(), built.metrics));
        if let Some(rx) = built.receiver {
            set.receivers.push((built.name.clone(), rx));
        }
        set.fanout.push(built.sink);
    }

    Ok(set)
}
