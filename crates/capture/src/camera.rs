//! Synthetic camera
//!
//! Implements `FrameSource`, producing constant-fill YUV 4:2:0 frames at a
//! fixed rate on a background thread. Used for demos and tests without real
//! capture hardware.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use contracts::{
    BufferAllocator, CameraCalibration, FrameCallback, FrameGeometry, FrameSource, RawFrame,
    StereoChannel,
};
use tracing::{debug, trace};

use crate::error::{CaptureError, Result};

/// Neutral chroma value (no color)
const NEUTRAL_CHROMA: u8 = 128;

/// Synthetic camera configuration
#[derive(Debug, Clone)]
pub struct SyntheticCameraConfig {
    /// Per-eye frame geometry
    pub geometry: FrameGeometry,
    /// Frames per second
    pub frame_rate_hz: f64,
    /// Constant offset added to every timestamp (ns)
    pub clock_offset_ns: i64,
    /// Peak deterministic timestamp jitter (ns)
    pub jitter_ns: u64,
    /// Decorrelates the jitter sequences of different cameras
    pub jitter_seed: u64,
    /// Luma fill value
    pub luma: u8,
    /// Calibration attached to every frame
    pub calibration: CameraCalibration,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for SyntheticCameraConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::default(),
            frame_rate_hz: 30.0,
            clock_offset_ns: 0,
            jitter_ns: 0,
            jitter_seed: 0,
            luma: 0x80,
            calibration: CameraCalibration::default(),
            max_frames: None,
        }
    }
}

/// Synthetic capture channel
///
/// Frame `k` is stamped `k * interval + clock_offset + jitter(k)` relative to
/// the camera's epoch, so two cameras sharing an epoch produce timestamps in
/// a common clock domain. Frame indices keep counting across `stop`/`listen`
/// cycles, so timestamps never go backwards.
pub struct SyntheticCamera {
    channel: StereoChannel,
    config: SyntheticCameraConfig,
    allocator: Arc<dyn BufferAllocator>,
    epoch: Instant,
    /// Run token of the active producer thread
    active: Arc<Mutex<Option<Arc<AtomicBool>>>>,
    /// Index of the next frame to stamp
    next_index: Arc<AtomicU64>,
    produced: Arc<AtomicU64>,
    /// Producer threads not yet exited, stopped runs included
    live_threads: Arc<AtomicUsize>,
}

impl std::fmt::Debug for SyntheticCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticCamera")
            .field("channel", &self.channel)
            .field("config", &self.config)
            .field("listening", &self.is_listening())
            .finish()
    }
}

impl SyntheticCamera {
    /// Create a camera whose epoch is now
    pub fn new(
        channel: StereoChannel,
        config: SyntheticCameraConfig,
        allocator: Arc<dyn BufferAllocator>,
    ) -> Result<Self> {
        Self::with_epoch(channel, config, allocator, Instant::now())
    }

    /// Create a camera with an explicit epoch (shared by both eyes of a rig)
    pub fn with_epoch(
        channel: StereoChannel,
        config: SyntheticCameraConfig,
        allocator: Arc<dyn BufferAllocator>,
        epoch: Instant,
    ) -> Result<Self> {
        if !config.frame_rate_hz.is_finite() || config.frame_rate_hz <= 0.0 {
            return Err(CaptureError::InvalidFrameRate {
                frame_rate_hz: config.frame_rate_hz,
            });
        }
        let geometry = config.geometry;
        if geometry.width == 0 || geometry.height == 0 || geometry.height % 2 != 0 {
            return Err(CaptureError::invalid_geometry(
                geometry,
                "width and height must be positive, height even",
            ));
        }

        Ok(Self {
            channel,
            config,
            allocator,
            epoch,
            active: Arc::new(Mutex::new(None)),
            next_index: Arc::new(AtomicU64::new(0)),
            produced: Arc::new(AtomicU64::new(0)),
            live_threads: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &SyntheticCameraConfig {
        &self.config
    }

    /// Frames delivered so far, across all runs
    pub fn frames_produced(&self) -> u64 {
        self.produced.load(Ordering::Relaxed)
    }

    /// Whether a producer thread is still alive, even after `stop`
    pub fn has_live_thread(&self) -> bool {
        self.live_threads.load(Ordering::SeqCst) > 0
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<Arc<AtomicBool>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deterministic jitter in `[-jitter_ns, jitter_ns]`
    fn jitter(jitter_ns: u64, seed: u64, frame_index: u64) -> i64 {
        if jitter_ns == 0 {
            return 0;
        }
        // Knuth multiplicative hash spreads consecutive indices
        let hashed = (frame_index ^ seed.rotate_left(32)).wrapping_mul(2_654_435_761) >> 7;
        let span = 2 * jitter_ns + 1;
        (hashed % span) as i64 - jitter_ns as i64
    }

    fn timestamp_ns(config: &SyntheticCameraConfig, interval: Duration, frame_index: u64) -> i64 {
        let nominal = interval.as_nanos() as i64 * frame_index as i64;
        nominal
            + config.clock_offset_ns
            + Self::jitter(config.jitter_ns, config.jitter_seed, frame_index)
    }

    /// First index of a run: the current capture period, never behind the
    /// last stamped frame
    fn resume_index(epoch: Instant, interval: Duration, next_index: u64) -> u64 {
        let elapsed = epoch.elapsed().as_nanos() / interval.as_nanos().max(1);
        next_index.max(elapsed as u64)
    }

    fn fill(buffer: &mut [u8], geometry: FrameGeometry, luma: u8) {
        let (luma_plane, chroma_plane) = buffer.split_at_mut(geometry.luma_len());
        luma_plane.fill(luma);
        chroma_plane.fill(NEUTRAL_CHROMA);
    }
}

impl FrameSource for SyntheticCamera {
    fn channel(&self) -> StereoChannel {
        self.channel
    }

    fn listen(&self, callback: FrameCallback) {
        let token = {
            let mut active = self.lock_active();
            // Idempotent: if already listening, don't start again
            if active
                .as_ref()
                .is_some_and(|token| token.load(Ordering::SeqCst))
            {
                return;
            }
            let token = Arc::new(AtomicBool::new(true));
            *active = Some(token.clone());
            token
        };

        let channel = self.channel;
        let config = self.config.clone();
        let allocator = self.allocator.clone();
        let active = self.active.clone();
        let next_index = self.next_index.clone();
        let produced = self.produced.clone();
        let live_threads = self.live_threads.clone();
        let epoch = self.epoch;

        let interval = Duration::from_secs_f64(1.0 / config.frame_rate_hz);
        let eye_len = config.geometry.eye_len();

        live_threads.fetch_add(1, Ordering::SeqCst);
        thread::spawn(move || {
            let mut frame_index =
                Self::resume_index(epoch, interval, next_index.load(Ordering::SeqCst));
            debug!(
                channel = %channel,
                frame_rate_hz = config.frame_rate_hz,
                geometry = %config.geometry,
                frame_index,
                "synthetic camera started"
            );

            while token.load(Ordering::SeqCst) {
                if config
                    .max_frames
                    .is_some_and(|max| produced.load(Ordering::Relaxed) >= max)
                {
                    break;
                }

                // Sleep until this frame's deadline so both eyes stay in step
                let deadline = epoch + interval.mul_f64(frame_index as f64);
                if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                    thread::sleep(wait);
                }
                if !token.load(Ordering::SeqCst) {
                    break;
                }
                // Claim the index; a stale run may already have stamped it
                let claimed = next_index.fetch_max(frame_index + 1, Ordering::SeqCst);
                if claimed > frame_index {
                    frame_index = claimed;
                    continue;
                }

                let mut data = allocator.acquire_buffer(eye_len);
                Self::fill(&mut data, config.geometry, config.luma);
                let timestamp_ns = Self::timestamp_ns(&config, interval, frame_index);

                callback(channel, RawFrame::new(data, timestamp_ns, config.calibration));

                produced.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("stereo_capture_frames_total", "channel" => channel.as_str())
                    .increment(1);
                trace!(channel = %channel, frame_index, timestamp_ns, "synthetic frame sent");

                frame_index += 1;
            }

            // Retire only this run's token; a newer run owns its own
            token.store(false, Ordering::SeqCst);
            let mut active = active.lock().unwrap_or_else(PoisonError::into_inner);
            if active
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &token))
            {
                *active = None;
            }
            drop(active);
            drop(callback);
            live_threads.fetch_sub(1, Ordering::SeqCst);
            debug!(channel = %channel, next_frame = frame_index, "synthetic camera stopped");
        });
    }

    fn stop(&self) {
        if let Some(token) = self.lock_active().take() {
            token.store(false, Ordering::SeqCst);
        }
    }

    fn is_listening(&self) -> bool {
        self.lock_active()
            .as_ref()
            .is_some_and(|token| token.load(Ordering::SeqCst))
    }
}
