//! Status records of the pro controllers on channels 0 to 3

use crate::controller::button_state::ButtonState;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Pro controller button bits
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ProButtons: u32 {
        const UP      = 0x0000_0001;
        const LEFT    = 0x0000_0002;
        const ZR      = 0x0000_0004;
        const X       = 0x0000_0008;
        const A       = 0x0000_0010;
        const Y       = 0x0000_0020;
        const B       = 0x0000_0040;
        const ZL      = 0x0000_0080;
        const R       = 0x0000_0200;
        const PLUS    = 0x0000_0400;
        const HOME    = 0x0000_0800;
        const MINUS   = 0x0000_1000;
        const L       = 0x0000_2000;
        const DOWN    = 0x0000_4000;
        const RIGHT   = 0x0000_8000;
        const STICK_R = 0x0001_0000;
        const STICK_L = 0x0002_0000;
    }
}

crate::impl_button_bits!(ProButtons);

/// Number of pro controller channels
pub const CHANNEL_COUNT: usize = 4;

/// Pro controller channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WpadChannel {
    Chan0,
    Chan1,
    Chan2,
    Chan3,
}

impl WpadChannel {
    pub const ALL: [WpadChannel; CHANNEL_COUNT] = [
        WpadChannel::Chan0,
        WpadChannel::Chan1,
        WpadChannel::Chan2,
        WpadChannel::Chan3,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WpadChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.index())
    }
}

/// Per-frame status of one pro controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpadStatus {
    pub pro: ButtonState<ProButtons>,
}

impl KpadStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reasons a pro controller status read has nothing to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KpadError {
    #[error("No samples: input has not been updated yet")]
    NoSamples,

    #[error("Invalid controller: nothing connected on {0}")]
    InvalidController(WpadChannel),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_index_round_trip() {
        for (index, channel) in WpadChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), index);
            assert_eq!(WpadChannel::from_index(index), Some(*channel));
        }
        assert_eq!(WpadChannel::from_index(CHANNEL_COUNT), None);
    }
}
