//! Synthetic stereo rig: two cameras on a shared epoch.

use std::sync::Arc;
use std::time::Instant;

use contracts::{
    BufferAllocator, CaptureConfig, FrameCallback, FrameGeometry, FrameSource, StereoChannel,
};
use tracing::info;

use crate::calibration::nominal_calibration;
use crate::camera::{SyntheticCamera, SyntheticCameraConfig};
use crate::error::Result;

/// Left luma fill
const LEFT_LUMA: u8 = 0x50;
/// Right luma fill
const RIGHT_LUMA: u8 = 0xB0;

/// Left and right synthetic cameras
///
/// The right camera's timestamps are shifted by `right_offset_ns`; both get
/// the same per-frame jitter bound.
#[derive(Debug)]
pub struct StereoRig {
    cameras: [SyntheticCamera; 2],
}

impl StereoRig {
    pub fn new(
        capture: &CaptureConfig,
        geometry: FrameGeometry,
        allocator: Arc<dyn BufferAllocator>,
        max_frames: Option<u64>,
    ) -> Result<Self> {
        let epoch = Instant::now();
        let make = |channel: StereoChannel, clock_offset_ns: i64, luma: u8| {
            let config = SyntheticCameraConfig {
                geometry,
                frame_rate_hz: capture.frame_rate_hz,
                clock_offset_ns,
                jitter_ns: capture.jitter_ns,
                jitter_seed: channel.index() as u64,
                luma,
                calibration: nominal_calibration(channel, geometry, capture.baseline_m),
                max_frames,
            };
            SyntheticCamera::with_epoch(channel, config, allocator.clone(), epoch)
        };

        Ok(Self {
            cameras: [
                make(StereoChannel::Left, 0, LEFT_LUMA)?,
                make(StereoChannel::Right, capture.right_offset_ns, RIGHT_LUMA)?,
            ],
        })
    }

    /// Start both cameras with the same callback
    pub fn start(&self, callback: FrameCallback) {
        for camera in &self.cameras {
            camera.listen(callback.clone());
        }
        info!(
            frame_rate_hz = self.cameras[0].config().frame_rate_hz,
            geometry = %self.cameras[0].config().geometry,
            "stereo rig started"
        );
    }

    /// Start one camera only
    ///
    /// Nothing pairs while the partner is idle; with eye-frame forwarding the
    /// sink still sees every frame of this eye.
    pub fn start_single(&self, channel: StereoChannel, callback: FrameCallback) {
        let camera = self.camera(channel);
        camera.listen(callback);
        info!(
            channel = %channel,
            idle = %channel.other(),
            frame_rate_hz = camera.config().frame_rate_hz,
            "single camera started"
        );
    }

    /// Stop one camera, leaving its partner running
    pub fn stop_single(&self, channel: StereoChannel) {
        self.camera(channel).stop();
        info!(channel = %channel, "single camera stopped");
    }

    pub fn stop(&self) {
        for camera in &self.cameras {
            camera.stop();
        }
    }

    /// Whether either camera is still producing
    pub fn is_running(&self) -> bool {
        self.cameras.iter().any(|camera| camera.is_listening())
    }

    /// Whether any producer thread, stopped or not, has yet to exit
    pub fn has_live_threads(&self) -> bool {
        self.cameras.iter().any(|camera| camera.has_live_thread())
    }

    pub fn camera(&self, channel: StereoChannel) -> &SyntheticCamera {
        &self.cameras[channel.index()]
    }

    /// Frames produced per channel
    pub fn frames_produced(&self) -> [u64; 2] {
        [
            self.cameras[0].frames_produced(),
            self.cameras[1].frames_produced(),
        ]
    }
}

impl Drop for StereoRig {
    fn drop(&mut self) {
        self.stop();
    }
}
