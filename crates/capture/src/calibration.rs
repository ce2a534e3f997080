//! Nominal calibration for an idealized stereo rig.

use contracts::{CameraCalibration, FrameGeometry, StereoChannel};

/// Pinhole calibration with a 90° horizontal field of view
///
/// Both cameras look down +Z; the left one sits at `-baseline / 2` on X and
/// the right one at `+baseline / 2`. No distortion, identity rotation.
pub fn nominal_calibration(
    channel: StereoChannel,
    geometry: FrameGeometry,
    baseline_m: f32,
) -> CameraCalibration {
    let width = geometry.width as f32;
    let height = geometry.height as f32;
    let focal = width / 2.0;

    let tx = match channel {
        StereoChannel::Left => -baseline_m / 2.0,
        StereoChannel::Right => baseline_m / 2.0,
    };

    CameraCalibration {
        intrinsics: [focal, focal, width / 2.0, height / 2.0, 0.0],
        distortion: [0.0; 6],
        pose: [tx, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_split_between_eyes() {
        let g = FrameGeometry::new(640, 480);
        let left = nominal_calibration(StereoChannel::Left, g, 0.1);
        let right = nominal_calibration(StereoChannel::Right, g, 0.1);

        assert!((right.pose[0] - left.pose[0] - 0.1).abs() < 1e-6);
        assert_eq!(left.intrinsics, right.intrinsics);
        assert_eq!(left.intrinsics[2], 320.0);
        assert_eq!(left.intrinsics[3], 240.0);
        assert_eq!(left.pose[6], 1.0);
    }
}
