//! Table from logical source buttons to status bits
//!
//! One table per device kind. The manager hands each frame's physical state
//! through [`ButtonMap::apply`], which folds all bindings of a bit together
//! and then runs the edge tracker once, so a bit driven by two source
//! buttons still pulses only once.

use crate::controller::button_state::{ButtonBits, ButtonState};
use crate::controller::device::PadButton;
use crate::controller::kpad::ProButtons;
use crate::controller::vpad::VpadButtons;
use crate::mapping::error::MappingError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One source button driving one status bit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding<B> {
    pub source: PadButton,
    pub target: B,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonMap<B> {
    pub bindings: Vec<ButtonBinding<B>>,
}

impl<B: ButtonBits> ButtonMap<B> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Adds a binding
    pub fn bind(&mut self, source: PadButton, target: B) -> &mut Self {
        self.bindings.push(ButtonBinding { source, target });
        self
    }

    /// Removes every binding of `source`
    pub fn unbind(&mut self, source: PadButton) -> &mut Self {
        self.bindings.retain(|binding| binding.source != source);
        self
    }

    /// Union of all bits this map drives
    pub fn tracked(&self) -> B {
        B::from_raw(
            self.bindings
                .iter()
                .fold(0, |acc, binding| acc | binding.target.to_raw()),
        )
    }

    /// Checks that every binding targets exactly one known bit.
    ///
    /// An empty table is valid and leaves every bit idle.
    pub fn validate(&self) -> Result<(), MappingError> {
        for binding in &self.bindings {
            let bits = binding.target.to_raw();
            if bits.count_ones() != 1 || bits & !B::all_bits() != 0 {
                warn!(
                    "Rejecting binding {:?} -> {:#x}",
                    binding.source, bits
                );
                return Err(MappingError::InvalidTarget {
                    button: binding.source,
                    bits,
                });
            }
        }

        debug!("Button map with {} bindings validated", self.bindings.len());
        Ok(())
    }

    /// Feeds one frame of physical state into `state`
    pub fn apply<F>(&self, state: &mut ButtonState<B>, mut is_pressed: F)
    where
        F: FnMut(PadButton) -> bool,
    {
        let mut tracked = 0;
        let mut down = 0;

        for binding in &self.bindings {
            let bit = binding.target.to_raw();
            tracked |= bit;
            if is_pressed(binding.source) {
                down |= bit;
            }
        }

        state.update_masked(B::from_raw(tracked), B::from_raw(down));
    }
}

impl Default for ButtonMap<VpadButtons> {
    fn default() -> Self {
        let mut map = Self::new();
        map.bind(PadButton::A, VpadButtons::A)
            .bind(PadButton::B, VpadButtons::B)
            .bind(PadButton::X, VpadButtons::X)
            .bind(PadButton::Y, VpadButtons::Y)
            .bind(PadButton::Start, VpadButtons::PLUS)
            .bind(PadButton::Select, VpadButtons::MINUS)
            .bind(PadButton::DPadUp, VpadButtons::UP)
            .bind(PadButton::DPadDown, VpadButtons::DOWN)
            .bind(PadButton::DPadLeft, VpadButtons::LEFT)
            .bind(PadButton::DPadRight, VpadButtons::RIGHT)
            .bind(PadButton::LeftBumper, VpadButtons::L)
            .bind(PadButton::RightBumper, VpadButtons::R)
            .bind(PadButton::LeftTrigger, VpadButtons::ZL)
            .bind(PadButton::RightTrigger, VpadButtons::ZR)
            .bind(PadButton::LeftStick, VpadButtons::STICK_L)
            .bind(PadButton::RightStick, VpadButtons::STICK_R)
            .bind(PadButton::Guide, VpadButtons::HOME);
        map
    }
}

impl Default for ButtonMap<ProButtons> {
    fn default() -> Self {
        let mut map = Self::new();
        map.bind(PadButton::A, ProButtons::A)
            .bind(PadButton::B, ProButtons::B)
            .bind(PadButton::X, ProButtons::X)
            .bind(PadButton::Y, ProButtons::Y)
            .bind(PadButton::Start, ProButtons::PLUS)
            .bind(PadButton::Select, ProButtons::MINUS)
            .bind(PadButton::DPadUp, ProButtons::UP)
            .bind(PadButton::DPadDown, ProButtons::DOWN)
            .bind(PadButton::DPadLeft, ProButtons::LEFT)
            .bind(PadButton::DPadRight, ProButtons::RIGHT)
            .bind(PadButton::LeftBumper, ProButtons::L)
            .bind(PadButton::RightBumper, ProButtons::R)
            .bind(PadButton::LeftTrigger, ProButtons::ZL)
            .bind(PadButton::RightTrigger, ProButtons::ZR)
            .bind(PadButton::LeftStick, ProButtons::STICK_L)
            .bind(PadButton::RightStick, ProButtons::STICK_R)
            .bind(PadButton::Guide, ProButtons::HOME);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_maps_are_valid() {
        ButtonMap::<VpadButtons>::default().validate().unwrap();
        ButtonMap::<ProButtons>::default().validate().unwrap();
    }

    #[test]
    fn test_default_gamepad_map_covers_face_and_menu_buttons() {
        let map = ButtonMap::<VpadButtons>::default();
        let tracked = map.tracked();
        for bit in [
            VpadButtons::A,
            VpadButtons::B,
            VpadButtons::X,
            VpadButtons::Y,
            VpadButtons::PLUS,
            VpadButtons::MINUS,
        ] {
            assert!(tracked.contains(bit), "{:?} not mapped", bit);
        }
        assert!(!tracked.contains(VpadButtons::TV));
        assert!(!tracked.contains(VpadButtons::SYNC));
    }

    #[test]
    fn test_validate_rejects_multi_bit_target() {
        let mut map = ButtonMap::<VpadButtons>::new();
        map.bind(PadButton::A, VpadButtons::A | VpadButtons::B);

        match map.validate() {
            Err(MappingError::InvalidTarget { button, bits }) => {
                assert_eq!(button, PadButton::A);
                assert_eq!(bits, 0xC000);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_and_empty_targets() {
        let mut map = ButtonMap::<ProButtons>::new();
        map.bind(PadButton::Guide, ProButtons::from_bits_retain(0x100));
        assert!(map.validate().is_err());

        let mut map = ButtonMap::<ProButtons>::new();
        map.bind(PadButton::Guide, ProButtons::empty());
        assert!(map.validate().is_err());
    }

    #[test]
    fn test_empty_map_is_valid_and_tracks_nothing() {
        let map = ButtonMap::<ProButtons>::new();
        map.validate().unwrap();
        assert!(map.tracked().is_empty());

        let mut state = ButtonState::new();
        map.apply(&mut state, |_| true);
        assert!(state.is_idle());
    }

    #[test]
    fn test_apply_tracks_edges() {
        let map = ButtonMap::<VpadButtons>::default();
        let mut state = ButtonState::new();

        map.apply(&mut state, |b| b == PadButton::Start);
        assert!(state.just_pressed(VpadButtons::PLUS));

        map.apply(&mut state, |b| b == PadButton::Start);
        assert!(state.is_held(VpadButtons::PLUS));
        assert!(!state.just_pressed(VpadButtons::PLUS));

        map.apply(&mut state, |_| false);
        assert!(state.just_released(VpadButtons::PLUS));
        assert!(!state.is_held(VpadButtons::PLUS));
    }

    #[test]
    fn test_shared_target_pulses_once() {
        let mut map = ButtonMap::<VpadButtons>::new();
        map.bind(PadButton::A, VpadButtons::A)
            .bind(PadButton::Start, VpadButtons::A);
        let mut state = ButtonState::new();

        // Both sources down in the same frame
        map.apply(&mut state, |b| matches!(b, PadButton::A | PadButton::Start));
        assert!(state.just_pressed(VpadButtons::A));

        // One source lets go, the other still holds the bit
        map.apply(&mut state, |b| b == PadButton::Start);
        assert!(state.is_held(VpadButtons::A));
        assert!(!state.just_pressed(VpadButtons::A));
        assert!(!state.just_released(VpadButtons::A));

        map.apply(&mut state, |_| false);
        assert!(state.just_released(VpadButtons::A));
    }

    #[test]
    fn test_unbind_stops_tracking() {
        let mut map = ButtonMap::<VpadButtons>::default();
        map.unbind(PadButton::Guide);
        assert!(!map.tracked().contains(VpadButtons::HOME));

        let mut state = ButtonState::new();
        map.apply(&mut state, |b| b == PadButton::Guide);
        assert!(state.is_idle());
    }

    #[test]
    fn test_table_reads_from_toml() {
        let text = r#"
            [[bindings]]
            source = "Start"
            target = "HOME"

            [[bindings]]
            source = "A"
            target = "B"
        "#;
        let map: ButtonMap<VpadButtons> = toml::from_str(text).unwrap();

        assert_eq!(map.bindings.len(), 2);
        assert_eq!(map.bindings[0].source, PadButton::Start);
        assert_eq!(map.bindings[0].target, VpadButtons::HOME);
        assert_eq!(map.bindings[1].target, VpadButtons::B);
        map.validate().unwrap();
    }
}
