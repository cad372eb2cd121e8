//! Controller subsystem for per-frame button status
//!
//! Rebuilds console-style status records from a cross-platform input library:
//!
//! 1. [`input_source`] - Seam over the input library ([`gilrs_source`] in production)
//! 2. [`manager`] - Device slots, per-frame update and status reads
//! 3. [`button_state`] - Edge tracking for hold/trigger/release
//!
//! # Architecture
//!
//! ```text
//! gilrs ──► InputSource ──► InputManager ──► VpadStatus (player 0, touch)
//!                              │         └─► KpadStatus (players 1-4)
//!                         ButtonMap + ButtonState
//! ```
//!
//! Everything runs on the caller's thread, once per frame.

pub mod button_state;
pub mod device;
pub mod gilrs_source;
pub mod input_source;
pub mod kpad;
pub mod manager;
pub mod vpad;

pub use button_state::{ButtonBits, ButtonState};
pub use device::{Device, DeviceId, DeviceKind, PadButton, PlayerSlots, SourceDevice};
pub use gilrs_source::GilrsSource;
pub use input_source::{InputSource, SourceError, TouchPoint};
pub use kpad::{KpadError, KpadStatus, ProButtons, WpadChannel};
pub use manager::{InputManager, ManagerSettings};
pub use vpad::{TouchData, TouchSurface, TouchValidity, VpadButtons, VpadReadError, VpadStatus};
