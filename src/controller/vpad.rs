//! Status record of the touch-capable primary controller (player slot 0)

use crate::controller::button_state::ButtonState;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Gamepad button bits, laid out like the console's gamepad register
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct VpadButtons: u32 {
        const SYNC    = 0x0000_0001;
        const HOME    = 0x0000_0002;
        const MINUS   = 0x0000_0004;
        const PLUS    = 0x0000_0008;
        const R       = 0x0000_0010;
        const L       = 0x0000_0020;
        const ZR      = 0x0000_0040;
        const ZL      = 0x0000_0080;
        const DOWN    = 0x0000_0100;
        const UP      = 0x0000_0200;
        const RIGHT   = 0x0000_0400;
        const LEFT    = 0x0000_0800;
        const Y       = 0x0000_1000;
        const X       = 0x0000_2000;
        const B       = 0x0000_4000;
        const A       = 0x0000_8000;
        const TV      = 0x0001_0000;
        const STICK_R = 0x0002_0000;
        const STICK_L = 0x0004_0000;
    }
}

crate::impl_button_bits!(VpadButtons);

/// Whether the reported touch coordinates can be trusted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchValidity {
    #[default]
    Valid,
    InvalidX,
    InvalidY,
    Invalid,
}

/// Touch panel sample in panel pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchData {
    pub x: u16,
    pub y: u16,
    pub touched: bool,
    pub validity: TouchValidity,
}

/// Size of the touch panel in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchSurface {
    pub width: u16,
    pub height: u16,
}

impl Default for TouchSurface {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl TouchSurface {
    /// Scales a normalized coordinate pair to panel pixels
    pub fn scale(&self, x: f32, y: f32) -> (u16, u16) {
        (
            (x.clamp(0.0, 1.0) * self.width as f32) as u16,
            (y.clamp(0.0, 1.0) * self.height as f32) as u16,
        )
    }
}

/// Per-frame status of the primary controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VpadStatus {
    pub buttons: ButtonState<VpadButtons>,
    pub tp_normal: TouchData,
}

impl VpadStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reasons a gamepad status read has nothing to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VpadReadError {
    #[error("No samples: input has not been updated yet")]
    NoSamples,

    #[error("Invalid controller: no gamepad in player slot 0")]
    InvalidController,
}
