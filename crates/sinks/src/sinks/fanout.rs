//! FanoutSink - delivers to several sinks in order

use contracts::{CombinedFrame, ContractError, EyeFrame, FrameSink};
use tracing::warn;

use crate::metrics::record_sink_outcome;

/// Composite sink
///
/// Every child sees every frame even when an earlier child fails; the first
/// failure is reported after all children ran.
pub struct FanoutSink {
    name: String,
    sinks: Vec<Box<dyn FrameSink>>,
}

impl FanoutSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sinks: Vec::new(),
        }
    }

    /// Append a child sink
    pub fn with_sink<S: FrameSink + 'static>(mut self, sink: S) -> Self {
        self.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Child sink names, in delivery order
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    fn for_each<F>(&mut self, what: &'static str, mut op: F) -> Result<(), ContractError>
    where
        F: FnMut(&mut dyn FrameSink) -> Result<(), ContractError>,
    {
        let mut first_error = None;
        for sink in &mut self.sinks {
            let result = op(sink.as_mut());
            record_sink_outcome(sink.name(), what, result.is_ok());

            if let Err(e) = result {
                warn!(fanout = %self.name, sink = sink.name(), op = what, error = %e, "child sink failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl FrameSink for FanoutSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
        self.for_each("deliver", |sink| sink.deliver(frame))
    }

    fn deliver_eye(&mut self, frame: &EyeFrame<'_>) -> Result<(), ContractError> {
        self.for_each("deliver_eye", |sink| sink.deliver_eye(frame))
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.for_each("flush", |sink| sink.flush())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::NullSink;
    use contracts::StereoMetadata;

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn deliver(&mut self, _frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
            Err(ContractError::sink_delivery("failing", "mock failure"))
        }
    }

    fn frame(data: &[u8]) -> CombinedFrame<'_> {
        CombinedFrame {
            frame_id: 1,
            data,
            width: 2,
            height: 2,
            timestamp_ns: 0,
            delta_ns: 0,
            metadata: StereoMetadata::default(),
        }
    }

    #[test]
    fn test_failure_isolation() {
        let after = NullSink::new("after");
        let after_metrics = after.metrics();
        let mut fanout = FanoutSink::new("all")
            .with_sink(FailingSink)
            .with_sink(after);

        let pixels = [0u8; 6];
        let result = fanout.deliver(&frame(&pixels));

        assert!(result.is_err());
        // Later sinks still ran
        assert_eq!(after_metrics.delivered_count(), 1);
    }

    #[test]
    fn test_names_in_order() {
        let fanout = FanoutSink::new("all")
            .with_sink(NullSink::new("a"))
            .with_sink(NullSink::new("b"));
        assert_eq!(fanout.sink_names(), vec!["a", "b"]);
        assert_eq!(fanout.len(), 2);
    }

    #[test]
    fn test_empty_fanout_is_ok() {
        let mut fanout = FanoutSink::new("none");
        let pixels = [0u8; 6];
        assert!(fanout.is_empty());
        assert!(fanout.deliver(&frame(&pixels)).is_ok());
    }
}
