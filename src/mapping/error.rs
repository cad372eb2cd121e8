//! Error definitions for the mapping module

use crate::controller::device::PadButton;
use thiserror::Error;

/// Errors raised while validating a button map
#[derive(Debug, Error)]
pub enum MappingError {
    /// A binding does not target exactly one known status bit
    #[error("Invalid target for {button:?}: {bits:#x} is not a single known button bit")]
    InvalidTarget { button: PadButton, bits: u32 },
}
