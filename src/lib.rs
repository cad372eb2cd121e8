//! Console-style controller status for game engines, rebuilt from `gilrs`.
//!
//! The engine boots a [`Platform`], builds an [`InputManager`] from it, calls
//! [`InputManager::update`] once per frame and reads the gamepad and pro
//! controller records in between.

pub mod config;
pub mod controller;
pub mod mapping;
pub mod platform;

#[cfg(test)]
mod test_utils;

pub use config::BridgeConfig;
pub use controller::{ButtonState, GilrsSource, InputManager, InputSource};
pub use platform::{Platform, PlatformError};
