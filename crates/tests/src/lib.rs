//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Configuration flowing into a running combiner
//! - Synthetic rig -> combiner -> sinks, without capture hardware
//! - Concurrent producers against one shared combiner

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use contracts::{CombinedFrame, ContractError, FrameSink};

    /// What a recording sink keeps per combined frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Seen {
        pub frame_id: u64,
        pub timestamp_ns: i64,
        pub delta_ns: i64,
        pub left_luma: u8,
        pub right_luma: u8,
    }

    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub seen: Arc<Mutex<Vec<Seen>>>,
    }

    impl FrameSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&mut self, frame: &CombinedFrame<'_>) -> Result<(), ContractError> {
            self.seen.lock().unwrap().push(Seen {
                frame_id: frame.frame_id,
                timestamp_ns: frame.timestamp_ns,
                delta_ns: frame.delta_ns,
                left_luma: frame.data[0],
                right_luma: frame.data[frame.width as usize / 2],
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_blueprint_defaults() {
        let blueprint = contracts::StereoBlueprint::default();
        assert_eq!(blueprint.version, contracts::ConfigVersion::V1);
        assert_eq!(blueprint.combiner.sync_tolerance_ns, 5_000_000);
        assert!(config_loader::ConfigLoader::validate(&blueprint).is_ok());
    }
}

#[cfg(test)]
mod config_tests {
    use combiner::{FrameSink, SharedCombiner};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{CameraCalibration, RawFrame, StereoChannel};

    use crate::support::RecordingSink;

    const CONFIG: &str = r#"
[combiner]
width = 8
height = 4
sync_tolerance_ns = 2000

[capture]
frame_rate_hz = 100.0
right_offset_ns = 500
jitter_ns = 0

[[sinks]]
name = "queue"
sink_type = "channel"
queue_capacity = 4
"#;

    /// Tolerance from the config file decides pairing
    #[test]
    fn test_config_drives_combiner() {
        let blueprint = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let geometry = blueprint.combiner.geometry;
        let sink = RecordingSink::default();
        let combiner = SharedCombiner::new(blueprint.combiner.clone(), sink.clone());

        let frame = |ts: i64| {
            RawFrame::new(vec![0u8; geometry.eye_len()], ts, CameraCalibration::default())
        };

        assert!(!combiner.on_frame_available(StereoChannel::Left, frame(0)).unwrap());
        // 2000 ns apart: not strictly below the tolerance
        assert!(!combiner.on_frame_available(StereoChannel::Right, frame(2_000)).unwrap());
        assert!(combiner.on_frame_available(StereoChannel::Left, frame(1_000)).unwrap());

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].timestamp_ns, 1_000);
        assert_eq!(seen[0].delta_ns, 1_000);
        assert_eq!(sink.name(), "recording");
    }

    #[test]
    fn test_config_sinks_build() {
        let blueprint = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let set = sinks::create_sinks(&blueprint.sinks).unwrap();
        assert_eq!(set.fanout.sink_names(), vec!["queue"]);
        assert_eq!(set.receivers.len(), 1);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use capture::StereoRig;
    use combiner::SharedCombiner;
    use contracts::{CaptureConfig, CombinerConfig, FrameGeometry, SinkConfig, SinkType};
    use observability::CombinerMetricsAggregator;

    use crate::support::RecordingSink;

    async fn wait_for_rig(rig: &StereoRig) {
        for _ in 0..400 {
            if !rig.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("rig did not finish");
    }

    /// End-to-end: StereoRig -> SharedCombiner -> FanoutSink -> channel drain
    #[tokio::test]
    async fn test_e2e_rig_to_channel_sink() {
        let geometry = FrameGeometry::new(32, 16);
        let set = sinks::create_sinks(&[
            SinkConfig {
                name: "log".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 8,
            },
            SinkConfig {
                name: "queue".to_string(),
                sink_type: SinkType::Channel,
                queue_capacity: 64,
            },
        ])
        .unwrap();

        let recording = RecordingSink::default();
        let fanout = set.fanout.with_sink(recording.clone());
        let combiner = SharedCombiner::new(CombinerConfig::new(geometry), fanout);

        let mut receivers = set.receivers;
        let (name, rx) = receivers.remove(0);
        let drain = sinks::spawn_drain(name, rx);

        let capture = CaptureConfig {
            frame_rate_hz: 200.0,
            ..Default::default()
        };
        let rig = StereoRig::new(&capture, geometry, Arc::new(combiner.clone()), Some(12)).unwrap();
        rig.start(combiner.callback());
        wait_for_rig(&rig).await;

        let stats = combiner.stats();
        assert_eq!(stats.total_received(), 24);
        assert!(stats.pairs > 0);
        // Every accepted buffer is either pending or back in the pool
        assert_eq!(stats.outstanding(), stats.pending as u64);

        {
            let seen = recording.seen.lock().unwrap();
            assert_eq!(seen.len() as u64, stats.pairs);
            for (i, frame) in seen.iter().enumerate() {
                assert_eq!(frame.frame_id, i as u64 + 1);
                assert_eq!(frame.left_luma, 0x50);
                assert_eq!(frame.right_luma, 0xB0);
                assert!(frame.delta_ns.unsigned_abs() < 5_000_000);
            }
        }

        let log_metrics = &set.metrics[0].1;
        assert_eq!(log_metrics.delivered_count(), stats.pairs);

        drop(rig);
        drop(combiner);
        let consumed = tokio::time::timeout(Duration::from_secs(2), drain)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(consumed, stats.pairs);
    }

    /// Aggregated pair statistics survive a failing sibling sink
    #[tokio::test]
    async fn test_e2e_metrics_aggregation() {
        let geometry = FrameGeometry::new(16, 8);
        let aggregator = Arc::new(Mutex::new(CombinerMetricsAggregator::new()));
        let delivered = Arc::new(AtomicU64::new(0));

        struct AggregatingSink {
            aggregator: Arc<Mutex<CombinerMetricsAggregator>>,
            delivered: Arc<AtomicU64>,
        }

        impl contracts::FrameSink for AggregatingSink {
            fn name(&self) -> &str {
                "aggregate"
            }

            fn deliver(
                &mut self,
                frame: &contracts::CombinedFrame<'_>,
            ) -> Result<(), contracts::ContractError> {
                self.aggregator.lock().unwrap().update(frame);
                self.delivered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }

        struct FailingSink;

        impl contracts::FrameSink for FailingSink {
            fn name(&self) -> &str {
                "failing"
            }

            fn deliver(
                &mut self,
                _frame: &contracts::CombinedFrame<'_>,
            ) -> Result<(), contracts::ContractError> {
                Err(contracts::ContractError::sink_delivery("failing", "disk full"))
            }
        }

        let fanout = sinks::FanoutSink::new("fanout")
            .with_sink(FailingSink)
            .with_sink(AggregatingSink {
                aggregator: aggregator.clone(),
                delivered: delivered.clone(),
            });
        let combiner = SharedCombiner::new(CombinerConfig::new(geometry), fanout);

        let capture = CaptureConfig {
            frame_rate_hz: 200.0,
            ..Default::default()
        };
        let rig = StereoRig::new(&capture, geometry, Arc::new(combiner.clone()), Some(8)).unwrap();
        rig.start(combiner.callback());
        wait_for_rig(&rig).await;

        let stats = combiner.stats();
        assert_eq!(delivered.load(Ordering::Relaxed), stats.pairs);

        let mut aggregator = aggregator.lock().unwrap();
        aggregator.set_channel_totals(stats.received, stats.superseded);
        let summary = aggregator.summary();
        assert_eq!(summary.total_pairs, stats.pairs);
        assert_eq!(summary.frame_id_gaps, 0);
        assert!(summary.pair_rate > 0.0 && summary.pair_rate <= 100.0);
        assert!(format!("{summary}").contains("Combined frames"));
    }
}

#[cfg(test)]
mod stress_tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use combiner::SharedCombiner;
    use contracts::{
        BufferAllocator, CameraCalibration, CombinerConfig, FrameGeometry, RawFrame, StereoChannel,
    };
    use rand::Rng;

    use crate::support::RecordingSink;

    const FRAMES: i64 = 2_000;
    const INTERVAL_NS: i64 = 33_333_333;

    /// Two producers and a teardown thread race on one combiner: ids stay
    /// ordered, no buffer leaks
    #[test]
    fn test_concurrent_producers_with_clear() {
        let geometry = FrameGeometry::new(16, 8);
        let sink = RecordingSink::default();
        let combiner = SharedCombiner::new(
            CombinerConfig::new(geometry).with_pool_capacity(8),
            sink.clone(),
        );

        let handles: Vec<_> = StereoChannel::ALL
            .into_iter()
            .map(|channel| {
                let combiner = combiner.clone();
                thread::spawn(move || {
                    let mut rng = rand::rng();
                    let fill = match channel {
                        StereoChannel::Left => 0x50,
                        StereoChannel::Right => 0xB0,
                    };
                    for k in 0..FRAMES {
                        let mut data = combiner.acquire_buffer(geometry.eye_len());
                        data.fill(fill);
                        let jitter: i64 = rng.random_range(-1_000_000..=1_000_000);
                        let ts = k * INTERVAL_NS + jitter;
                        combiner
                            .on_frame_available(
                                channel,
                                RawFrame::new(data, ts, CameraCalibration::default()),
                            )
                            .unwrap();
                        if rng.random_bool(0.1) {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let producers_done = Arc::new(AtomicBool::new(false));
        let clears = Arc::new(AtomicU64::new(0));
        let clearer = {
            let combiner = combiner.clone();
            let producers_done = producers_done.clone();
            let clears = clears.clone();
            thread::spawn(move || {
                while !producers_done.load(Ordering::SeqCst) {
                    combiner.clear();
                    clears.fetch_add(1, Ordering::Relaxed);
                    thread::sleep(Duration::from_micros(200));
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        producers_done.store(true, Ordering::SeqCst);
        clearer.join().unwrap();
        assert!(clears.load(Ordering::Relaxed) > 0);

        let stats = combiner.stats();
        assert_eq!(stats.total_received(), 2 * FRAMES as u64);
        assert_eq!(stats.outstanding(), stats.pending as u64);
        assert!(stats.pool.available <= 8);

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len() as u64, stats.pairs);
        for (i, frame) in seen.iter().enumerate() {
            assert_eq!(frame.frame_id, i as u64 + 1);
            assert!(frame.delta_ns.unsigned_abs() < 5_000_000);
            assert_eq!((frame.left_luma, frame.right_luma), (0x50, 0xB0));
        }
    }
}

#[cfg(test)]
mod metrics_tests {
    use std::sync::{Arc, Mutex};

    use combiner::SharedCombiner;
    use contracts::{CameraCalibration, CombinerConfig, FrameGeometry, RawFrame, StereoChannel};
    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use sinks::{FanoutSink, NullSink};

    /// Records every counter registration as `name{label=value,..}`
    #[derive(Default)]
    struct CounterLog {
        keys: Arc<Mutex<Vec<String>>>,
    }

    impl CounterLog {
        fn count(&self, name: &str) -> usize {
            self.keys
                .lock()
                .unwrap()
                .iter()
                .filter(|key| key.split('{').next() == Some(name))
                .count()
        }
    }

    impl Recorder for CounterLog {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let labels: Vec<String> = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            self.keys
                .lock()
                .unwrap()
                .push(format!("{}{{{}}}", key.name(), labels.join(",")));
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    /// One pair through a two-child fanout counts once per child, plus one
    /// pair-level outcome
    #[test]
    fn test_sink_deliveries_counted_once_per_child() {
        let geometry = FrameGeometry::new(8, 4);
        let fanout = FanoutSink::new("fanout")
            .with_sink(NullSink::new("a"))
            .with_sink(NullSink::new("b"));
        let combiner = SharedCombiner::new(CombinerConfig::new(geometry), fanout);
        let frame = |ts: i64| {
            RawFrame::new(vec![0u8; geometry.eye_len()], ts, CameraCalibration::default())
        };

        let recorder = CounterLog::default();
        metrics::with_local_recorder(&recorder, || {
            combiner
                .on_frame_available(StereoChannel::Left, frame(0))
                .unwrap();
            assert!(combiner
                .on_frame_available(StereoChannel::Right, frame(1_000))
                .unwrap());
        });

        assert_eq!(recorder.count("stereo_sink_deliveries_total"), 2);
        assert_eq!(recorder.count("stereo_pair_deliveries_total"), 1);
        assert_eq!(recorder.count("stereo_pairs_total"), 1);

        let keys = recorder.keys.lock().unwrap();
        let deliveries: Vec<_> = keys
            .iter()
            .filter(|key| key.starts_with("stereo_sink_deliveries_total"))
            .collect();
        assert!(deliveries.iter().all(|key| !key.contains("sink=fanout")));
        assert!(deliveries.iter().all(|key| key.contains("op=deliver,")));
    }
}
