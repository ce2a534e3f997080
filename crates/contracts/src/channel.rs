//! StereoChannel - identifies which eye a frame belongs to

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two independent capture streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoChannel {
    Left,
    Right,
}

impl StereoChannel {
    /// Both channels, left first.
    pub const ALL: [StereoChannel; 2] = [StereoChannel::Left, StereoChannel::Right];

    /// Slot index (left = 0, right = 1)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            StereoChannel::Left => 0,
            StereoChannel::Right => 1,
        }
    }

    /// The partner channel
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            StereoChannel::Left => StereoChannel::Right,
            StereoChannel::Right => StereoChannel::Left,
        }
    }

    /// Lowercase name, used as a metrics label
    pub const fn as_str(self) -> &'static str {
        match self {
            StereoChannel::Left => "left",
            StereoChannel::Right => "right",
        }
    }
}

impl fmt::Display for StereoChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
