//! Translation from logical source buttons to status bits.
//!
//! Each device kind owns a [`ButtonMap`]. The maps are part of the
//! configuration file, so remapping needs no code change.

pub mod button_map;
pub mod error;

pub use button_map::{ButtonBinding, ButtonMap};
pub use error::MappingError;
