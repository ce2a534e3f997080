//! Main stereo combiner implementation.

use contracts::{
    CombinedFrame, CombinerConfig, EyeFrame, FrameGeometry, RawFrame, StereoChannel,
    StereoMetadata,
};
use tracing::{debug, instrument, trace, warn};

use crate::error::CombineError;
use crate::layout::combine_planes;
use crate::pool::{BufferPool, PoolStats};
use crate::slots::PendingSlots;

/// Snapshot of combiner counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombinerStats {
    /// Accepted frames per channel (indexed by `StereoChannel::index`)
    pub received: [u64; 2],
    /// Pending frames replaced before pairing, per channel
    pub superseded: [u64; 2],
    /// Frames rejected for geometry mismatch
    pub rejected: u64,
    /// Successful pairings
    pub pairs: u64,
    /// Accepted frame buffers handed back to the pool
    pub frames_released: u64,
    /// Occupied pending slots
    pub pending: usize,
    /// Buffer pool counters
    pub pool: PoolStats,
}

impl CombinerStats {
    pub fn total_received(&self) -> u64 {
        self.received.iter().sum()
    }

    pub fn total_superseded(&self) -> u64 {
        self.superseded.iter().sum()
    }

    /// Accepted frames whose buffers have not been released yet
    pub fn outstanding(&self) -> u64 {
        self.total_received() - self.frames_released
    }
}

/// Single-threaded stereo pairing core
///
/// Not synchronized; wrap it in [`crate::SharedCombiner`] when both capture
/// channels call in from their own threads.
#[derive(Debug)]
pub struct StereoCombiner {
    /// Configuration
    config: CombinerConfig,
    /// One pending frame per channel
    slots: PendingSlots,
    /// Recycled frame buffers
    pool: BufferPool,
    /// Side-by-side output, reused across pairings
    scratch: Vec<u8>,
    /// Pairing counter
    frame_counter: u64,
    received: [u64; 2],
    superseded: [u64; 2],
    rejected: u64,
    frames_released: u64,
}

impl StereoCombiner {
    /// Create a new combiner with the given configuration
    pub fn new(config: CombinerConfig) -> Self {
        let pool = BufferPool::new(config.pool_capacity);
        Self {
            config,
            slots: PendingSlots::default(),
            pool,
            scratch: Vec::new(),
            frame_counter: 0,
            received: [0; 2],
            superseded: [0; 2],
            rejected: 0,
            frames_released: 0,
        }
    }

    pub fn config(&self) -> &CombinerConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.config.geometry
    }

    /// Push a frame and try to pair it
    ///
    /// Returns `Ok(Some(frame))` when the arrival completes a pair. The
    /// combined frame borrows the internal output buffer and is invalidated
    /// by the next call.
    ///
    /// # Errors
    /// [`CombineError::GeometryMismatch`] if the buffer length does not match
    /// the configured geometry; the frame is dropped and no state changes.
    #[instrument(
        level = "trace",
        name = "stereo_combiner_push",
        skip(self, frame),
        fields(channel = %channel, timestamp_ns = frame.timestamp_ns)
    )]
    pub fn push(
        &mut self,
        channel: StereoChannel,
        frame: RawFrame,
    ) -> Result<Option<CombinedFrame<'_>>, CombineError> {
        self.accept(channel, frame)?;
        Ok(self.try_combine())
    }

    /// Store a frame in its channel's pending slot
    ///
    /// A frame already pending on that channel is superseded and its buffer
    /// returned to the pool.
    pub fn accept(&mut self, channel: StereoChannel, frame: RawFrame) -> Result<(), CombineError> {
        let geometry = self.config.geometry;
        if !frame.matches(&geometry) {
            self.rejected += 1;
            metrics::counter!(
                "stereo_geometry_rejected_total",
                "channel" => channel.as_str()
            )
            .increment(1);
            warn!(
                channel = %channel,
                expected = geometry.eye_len(),
                actual = frame.data.len(),
                "frame geometry mismatch, frame rejected"
            );
            return Err(CombineError::GeometryMismatch {
                channel,
                geometry,
                expected: geometry.eye_len(),
                actual: frame.data.len(),
            });
        }

        self.received[channel.index()] += 1;
        metrics::counter!("stereo_frames_received_total", "channel" => channel.as_str())
            .increment(1);

        if let Some(stale) = self.slots.replace(channel, frame) {
            self.superseded[channel.index()] += 1;
            metrics::counter!(
                "stereo_frames_superseded_total",
                "channel" => channel.as_str()
            )
            .increment(1);
            trace!(
                channel = %channel,
                stale_timestamp_ns = stale.timestamp_ns,
                "pending frame superseded"
            );
            self.release(stale.data);
        }

        if !self.slots.is_occupied(channel.other()) {
            trace!(channel = %channel, waiting_for = %channel.other(), "awaiting partner frame");
        }

        metrics::gauge!("stereo_pending_slots").set(self.slots.occupied() as f64);
        Ok(())
    }

    /// Combine the pending frames if both are present and within tolerance
    #[instrument(name = "stereo_combiner_try_combine", level = "trace", skip(self))]
    pub fn try_combine(&mut self) -> Option<CombinedFrame<'_>> {
        let (t_left, t_right) = self.slots.timestamps()?;

        let gap = t_left.abs_diff(t_right);
        if gap >= self.config.sync_tolerance_ns {
            trace!(
                t_left,
                t_right,
                gap_ns = gap,
                tolerance_ns = self.config.sync_tolerance_ns,
                "pending frames outside tolerance"
            );
            return None;
        }

        let (left, right) = self.slots.take_pair()?;
        let geometry = self.config.geometry;

        // Allocates on the first pairing only
        self.scratch.resize(geometry.combined_len(), 0);
        combine_planes(&left.data, &right.data, &mut self.scratch, geometry);

        let metadata = StereoMetadata::from_pair(&left.calibration, &right.calibration);
        let delta_ns = right.timestamp_ns.saturating_sub(left.timestamp_ns);
        let timestamp_ns = left.timestamp_ns;

        self.release(left.data);
        self.release(right.data);

        self.frame_counter += 1;
        self.record_pair_metrics(gap);

        Some(CombinedFrame {
            frame_id: self.frame_counter,
            data: &self.scratch,
            width: geometry.combined_width(),
            height: geometry.height,
            timestamp_ns,
            delta_ns,
            metadata,
        })
    }

    /// Borrow the frame pending on `channel`
    pub fn eye_frame(&self, channel: StereoChannel) -> Option<EyeFrame<'_>> {
        self.slots
            .get(channel)
            .map(|frame| frame.as_eye_frame(channel, self.config.geometry))
    }

    /// Whether a frame is waiting on `channel`
    pub fn is_pending(&self, channel: StereoChannel) -> bool {
        self.slots.is_occupied(channel)
    }

    /// Take a buffer from the pool (or allocate one)
    #[inline]
    pub fn acquire_buffer(&mut self, len: usize) -> Vec<u8> {
        self.pool.acquire(len)
    }

    /// Drop pending frames (recycling their buffers) and empty the pool
    #[instrument(name = "stereo_combiner_clear", skip(self))]
    pub fn clear(&mut self) {
        let pending = self.slots.take_all();
        let dropped = pending.iter().filter(|slot| slot.is_some()).count();
        for frame in pending.into_iter().flatten() {
            self.release(frame.data);
        }
        self.pool.clear();
        metrics::gauge!("stereo_pending_slots").set(0.0);
        debug!(dropped_pending = dropped, "combiner cleared");
    }

    /// Get frame counter
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Get current counters
    pub fn stats(&self) -> CombinerStats {
        CombinerStats {
            received: self.received,
            superseded: self.superseded,
            rejected: self.rejected,
            pairs: self.frame_counter,
            frames_released: self.frames_released,
            pending: self.slots.occupied(),
            pool: self.pool.stats(),
        }
    }

    fn release(&mut self, buffer: Vec<u8>) {
        self.frames_released += 1;
        self.pool.release(buffer);
    }

    fn record_pair_metrics(&self, gap_ns: u64) {
        metrics::counter!("stereo_pairs_total").increment(1);
        metrics::histogram!("stereo_pair_delta_ns").record(gap_ns as f64);
        metrics::gauge!("stereo_pending_slots").set(self.slots.occupied() as f64);
    }
}
