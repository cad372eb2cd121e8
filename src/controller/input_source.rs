//! Seam between the input manager and the input library feeding it
//!
//! The manager only ever asks four questions of its source: did devices come
//! or go, which devices are there, is a given button down, and where is the
//! primary touch point. [`GilrsSource`](super::gilrs_source::GilrsSource) answers
//! them from `gilrs`; tests answer them from a script.

use crate::controller::device::{DeviceId, PadButton, SourceDevice};

/// Touch point normalized to 0.0..=1.0 on both axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

// Source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to initialize input source: {0}")]
    InitializationError(String),
}

pub trait InputSource {
    /// Drains pending events. Returns true if a device was added or removed.
    fn pump(&mut self) -> bool;

    /// Currently connected devices
    fn devices(&mut self) -> Vec<SourceDevice>;

    /// Physical state of `button` on `device`; false for unknown devices
    fn is_pressed(&self, device: DeviceId, button: PadButton) -> bool;

    /// First finger on the first touch surface, if any
    fn primary_touch(&self) -> Option<TouchPoint> {
        None
    }
}
