//! Per-channel pending slots.
//!
//! Each channel holds at most one frame awaiting a partner. A newer frame
//! replaces the pending one; the caller gets the stale frame back so its
//! buffer can be recycled.

use contracts::{RawFrame, StereoChannel};

#[derive(Debug, Default)]
pub(crate) struct PendingSlots {
    slots: [Option<RawFrame>; 2],
}

impl PendingSlots {
    /// Store `frame` for `channel`, returning the frame it superseded
    #[inline]
    pub fn replace(&mut self, channel: StereoChannel, frame: RawFrame) -> Option<RawFrame> {
        self.slots[channel.index()].replace(frame)
    }

    #[inline]
    pub fn get(&self, channel: StereoChannel) -> Option<&RawFrame> {
        self.slots[channel.index()].as_ref()
    }

    #[inline]
    pub fn is_occupied(&self, channel: StereoChannel) -> bool {
        self.slots[channel.index()].is_some()
    }

    /// Number of occupied slots (0, 1 or 2)
    #[inline]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// `(left, right)` timestamps when both slots are occupied
    pub fn timestamps(&self) -> Option<(i64, i64)> {
        let left = self.get(StereoChannel::Left)?;
        let right = self.get(StereoChannel::Right)?;
        Some((left.timestamp_ns, right.timestamp_ns))
    }

    /// Empty both slots if both are occupied
    pub fn take_pair(&mut self) -> Option<(RawFrame, RawFrame)> {
        if self.occupied() < 2 {
            return None;
        }
        let [left, right] = std::mem::take(&mut self.slots);
        left.zip(right)
    }

    /// Empty both slots unconditionally
    pub fn take_all(&mut self) -> [Option<RawFrame>; 2] {
        std::mem::take(&mut self.slots)
    }
}
