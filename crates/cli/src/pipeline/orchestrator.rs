//! Pipeline orchestrator - wires the synthetic rig, combiner and sinks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use capture::StereoRig;
use combiner::SharedCombiner;
use contracts::{StereoBlueprint, StereoChannel};
use observability::CombinerMetricsAggregator;
use sinks::SinkSet;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::stats::{StatsSink, StopReason};
use super::PipelineStats;

/// How often the run loop checks its stop conditions
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound on waiting for camera threads and drain tasks at shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated blueprint
    pub blueprint: StereoBlueprint,

    /// Stop after this many combined frames (None = unlimited)
    pub max_pairs: Option<u64>,

    /// Frames each camera produces (None = unlimited)
    pub frames_per_channel: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Run only this camera (None = both)
    pub eye: Option<StereoChannel>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let SinkSet {
            fanout,
            metrics: sink_metrics,
            receivers,
        } = sinks::create_sinks(&blueprint.sinks).context("Failed to create sinks")?;

        if fanout.is_empty() {
            warn!("No sinks configured - combined frames will only be counted");
        }

        let aggregator = Arc::new(Mutex::new(CombinerMetricsAggregator::new()));
        let fanout = fanout.with_sink(StatsSink::new(aggregator.clone()));
        let combiner = SharedCombiner::new(blueprint.combiner.clone(), fanout);

        let drains: Vec<(String, JoinHandle<u64>)> = receivers
            .into_iter()
            .map(|(name, rx)| (name.clone(), sinks::spawn_drain(name, rx)))
            .collect();

        let rig = StereoRig::new(
            &blueprint.capture,
            blueprint.combiner.geometry,
            Arc::new(combiner.clone()),
            self.config.frames_per_channel,
        )
        .context("Failed to build synthetic stereo rig")?;

        info!(
            geometry = %blueprint.combiner.geometry,
            sync_tolerance_ns = blueprint.combiner.sync_tolerance_ns,
            sinks = sink_metrics.len(),
            channel_sinks = drains.len(),
            max_pairs = ?self.config.max_pairs,
            eye = ?self.config.eye,
            "Pipeline running"
        );
        match self.config.eye {
            Some(channel) => rig.start_single(channel, combiner.callback()),
            None => rig.start(combiner.callback()),
        }

        let stop_reason = self.wait_for_stop(&combiner, &rig, start_time).await;
        info!(reason = %stop_reason, "Stopping pipeline");

        // Shutdown
        rig.stop();
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while rig.has_live_threads() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        if rig.has_live_threads() {
            warn!("Camera threads still running after grace period");
        }

        if let Err(e) = combiner.flush() {
            warn!(error = %e, "Sink flush failed");
        }
        // Stream teardown: recycle whatever is still waiting for a partner
        combiner.clear();

        let combiner_stats = combiner.stats();
        let captured = rig.frames_produced();

        // Dropping every combiner handle closes the channel sinks, ending the drains
        drop(rig);
        drop(combiner);

        let mut drained = Vec::with_capacity(drains.len());
        for (name, handle) in drains {
            match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
                Ok(Ok(consumed)) => drained.push((name, consumed)),
                Ok(Err(e)) => warn!(sink = %name, error = %e, "Drain task failed"),
                Err(_) => warn!(sink = %name, "Drain task did not finish in time"),
            }
        }

        let metrics = {
            let mut aggregator = aggregator.lock().unwrap_or_else(PoisonError::into_inner);
            aggregator.set_channel_totals(combiner_stats.received, combiner_stats.superseded);
            aggregator.summary()
        };

        let stats = PipelineStats {
            pairs: combiner_stats.pairs,
            duration: start_time.elapsed(),
            stop_reason,
            captured,
            combiner: combiner_stats,
            sinks: sink_metrics
                .into_iter()
                .map(|(name, metrics)| (name, metrics.snapshot()))
                .collect(),
            drained,
            metrics,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }

    async fn wait_for_stop(
        &self,
        combiner: &SharedCombiner,
        rig: &StereoRig,
        start_time: Instant,
    ) -> StopReason {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;

            if let Some(max) = self.config.max_pairs {
                let pairs = combiner.frame_count();
                if pairs >= max {
                    info!(pairs, "Reached max pairs limit");
                    return StopReason::MaxPairs;
                }
            }
            if !rig.is_running() {
                return StopReason::CaptureFinished;
            }
            if let Some(timeout) = self.config.timeout {
                if start_time.elapsed() >= timeout {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    return StopReason::Timeout;
                }
            }
        }
    }
}
