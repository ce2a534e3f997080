//! StereoMetadata - merged calibration of a stereo pair
//!
//! Fixed 36-float layout:
//!
//! | index  | content            |
//! |--------|--------------------|
//! | 0..5   | left intrinsics    |
//! | 5..11  | left distortion    |
//! | 11..18 | left pose          |
//! | 18..23 | right intrinsics   |
//! | 23..29 | right distortion   |
//! | 29..36 | right pose         |

use std::fmt;
use std::ops::Range;

use crate::{CameraCalibration, StereoChannel};

/// Number of floats in the merged metadata array
pub const METADATA_LEN: usize = 36;

const INTRINSICS_LEN: usize = 5;
const DISTORTION_LEN: usize = 6;
const POSE_LEN: usize = 7;
const EYE_STRIDE: usize = INTRINSICS_LEN + DISTORTION_LEN + POSE_LEN;

/// Calibration of both eyes packed into one flat array
#[derive(Clone, Copy, PartialEq)]
pub struct StereoMetadata([f32; METADATA_LEN]);

impl StereoMetadata {
    /// Pack left and right calibration into the fixed layout
    pub fn from_pair(left: &CameraCalibration, right: &CameraCalibration) -> Self {
        let mut values = [0.0f32; METADATA_LEN];
        for (channel, calibration) in [(StereoChannel::Left, left), (StereoChannel::Right, right)]
        {
            values[Self::intrinsics_range(channel)].copy_from_slice(&calibration.intrinsics);
            values[Self::distortion_range(channel)].copy_from_slice(&calibration.distortion);
            values[Self::pose_range(channel)].copy_from_slice(&calibration.pose);
        }
        Self(values)
    }

    /// Index range of a channel's intrinsics
    pub const fn intrinsics_range(channel: StereoChannel) -> Range<usize> {
        let base = channel.index() * EYE_STRIDE;
        base..base + INTRINSICS_LEN
    }

    /// Index range of a channel's distortion coefficients
    pub const fn distortion_range(channel: StereoChannel) -> Range<usize> {
        let base = channel.index() * EYE_STRIDE + INTRINSICS_LEN;
        base..base + DISTORTION_LEN
    }

    /// Index range of a channel's pose
    pub const fn pose_range(channel: StereoChannel) -> Range<usize> {
        let base = channel.index() * EYE_STRIDE + INTRINSICS_LEN + DISTORTION_LEN;
        base..base + POSE_LEN
    }

    /// Unpack one eye's calibration
    pub fn calibration(&self, channel: StereoChannel) -> CameraCalibration {
        let mut calibration = CameraCalibration::default();
        calibration
            .intrinsics
            .copy_from_slice(&self.0[Self::intrinsics_range(channel)]);
        calibration
            .distortion
            .copy_from_slice(&self.0[Self::distortion_range(channel)]);
        calibration
            .pose
            .copy_from_slice(&self.0[Self::pose_range(channel)]);
        calibration
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; METADATA_LEN] {
        &self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl Default for StereoMetadata {
    fn default() -> Self {
        Self([0.0; METADATA_LEN])
    }
}

impl fmt::Debug for StereoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StereoMetadata")
            .field("left", &self.calibration(StereoChannel::Left))
            .field("right", &self.calibration(StereoChannel::Right))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> CameraCalibration {
        CameraCalibration {
            intrinsics: [1.0, 2.0, 3.0, 4.0, 5.0],
            distortion: [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            pose: [-0.032, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    fn right() -> CameraCalibration {
        CameraCalibration {
            intrinsics: [9.0, 8.0, 7.0, 6.0, 5.0],
            distortion: [1.1, 1.2, 1.3, 1.4, 1.5, 1.6],
            pose: [0.032, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_layout_indices() {
        let meta = StereoMetadata::from_pair(&left(), &right());
        let v = meta.as_array();

        assert_eq!(&v[0..5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&v[5..11], &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(&v[11..18], &[-0.032, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&v[18..23], &[9.0, 8.0, 7.0, 6.0, 5.0]);
        assert_eq!(&v[23..29], &[1.1, 1.2, 1.3, 1.4, 1.5, 1.6]);
        assert_eq!(&v[29..36], &[0.032, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ranges_tile_the_array() {
        let mut covered = [false; METADATA_LEN];
        for channel in StereoChannel::ALL {
            for range in [
                StereoMetadata::intrinsics_range(channel),
                StereoMetadata::distortion_range(channel),
                StereoMetadata::pose_range(channel),
            ] {
                for i in range {
                    assert!(!covered[i], "index {i} covered twice");
                    covered[i] = true;
                }
            }
        }
        assert!(covered.iter().all(|c| *c));
    }

    #[test]
    fn test_calibration_unpacks_each_eye() {
        let meta = StereoMetadata::from_pair(&left(), &right());
        assert_eq!(meta.calibration(StereoChannel::Left), left());
        assert_eq!(meta.calibration(StereoChannel::Right), right());
    }
}
