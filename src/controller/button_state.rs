//! Edge-triggered button tracking
//!
//! Turns one physical on/off sample per button and frame into the three views a
//! game loop polls: `hold` (level), `trigger` (just pressed) and `release`
//! (just released). Trigger and release are single-frame pulses.
//!
//! ```text
//! pressed:  0 1 1 0 0
//! hold:     0 1 1 0 0
//! trigger:  0 1 0 0 0
//! release:  0 0 0 1 0
//! ```

use std::fmt;

/// Bit domain a [`ButtonState`] is keyed by.
///
/// Implemented for the `bitflags` button sets of each device kind.
pub trait ButtonBits: Copy + Eq + Default + fmt::Debug {
    fn to_raw(self) -> u32;
    fn from_raw(bits: u32) -> Self;
    /// Every bit that names a real button
    fn all_bits() -> u32;
}

/// Implements [`ButtonBits`] for a `bitflags` type backed by `u32`
#[macro_export]
macro_rules! impl_button_bits {
    ($($flags:ty),+ $(,)?) => {
        $(
            impl $crate::controller::button_state::ButtonBits for $flags {
                fn to_raw(self) -> u32 {
                    self.bits()
                }

                fn from_raw(bits: u32) -> Self {
                    <$flags>::from_bits_retain(bits)
                }

                fn all_bits() -> u32 {
                    <$flags>::all().bits()
                }
            }
        )+
    };
}

/// Hold/trigger/release sets for one device
///
/// Owned by the update cycle of its device. `update` (or `update_masked`) must
/// be called exactly once per button per frame; calling it twice in the same
/// frame turns the trigger pulse of a fresh press into a plain hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState<B: ButtonBits> {
    /// Buttons physically down as of the last update
    pub hold: B,
    /// Buttons that went down during the last update
    pub trigger: B,
    /// Buttons that went up during the last update
    pub release: B,
}

impl<B: ButtonBits> ButtonState<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the physical state of a single button into the record
    pub fn update(&mut self, button: B, pressed: bool) {
        let bit = button.to_raw();
        let mut hold = self.hold.to_raw();
        let mut trigger = self.trigger.to_raw();
        let mut release = self.release.to_raw();

        if pressed {
            if hold & bit == 0 {
                trigger |= bit;
            } else {
                trigger &= !bit;
            }

            hold |= bit;
            release &= !bit;
        } else {
            if hold & bit != 0 {
                release |= bit;
            } else {
                release &= !bit;
            }

            hold &= !bit;
            trigger &= !bit;
        }

        self.hold = B::from_raw(hold);
        self.trigger = B::from_raw(trigger);
        self.release = B::from_raw(release);
    }

    /// Applies [`update`](Self::update) to every bit of `tracked` at once.
    ///
    /// `down` carries the physical state of each tracked bit. Bits outside
    /// `tracked` keep their hold, trigger and release values.
    pub fn update_masked(&mut self, tracked: B, down: B) {
        let tracked = tracked.to_raw();
        let down = down.to_raw() & tracked;
        let hold = self.hold.to_raw();

        let trigger = down & !hold;
        let release = hold & tracked & !down;

        self.trigger = B::from_raw((self.trigger.to_raw() & !tracked) | trigger);
        self.release = B::from_raw((self.release.to_raw() & !tracked) | release);
        self.hold = B::from_raw((hold & !tracked) | down);
    }

    /// Resets all three sets
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_held(&self, button: B) -> bool {
        self.hold.to_raw() & button.to_raw() != 0
    }

    pub fn just_pressed(&self, button: B) -> bool {
        self.trigger.to_raw() & button.to_raw() != 0
    }

    pub fn just_released(&self, button: B) -> bool {
        self.release.to_raw() & button.to_raw() != 0
    }

    /// True when nothing is held and no edge fired in the last update
    pub fn is_idle(&self) -> bool {
        self.hold.to_raw() | self.trigger.to_raw() | self.release.to_raw() == 0
    }
}
