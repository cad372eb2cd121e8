use crate::controller::device::{DeviceId, PadButton, PlayerSlots, SourceDevice};
use crate::controller::input_source::{InputSource, SourceError};
use gilrs::{Button, Event, EventType, GamepadId, Gilrs};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// [`InputSource`] backed by `gilrs`
///
/// A gamepad keeps its player slot until it disconnects; newcomers take the
/// lowest free slot. `gilrs` exposes no touch panels, so no touch point is
/// reported.
pub struct GilrsSource {
    // Gilrs context
    gilrs: Gilrs,

    // Handles handed out by the last `devices()` call
    ids: HashMap<DeviceId, GamepadId>,

    // Player slots, kept across rescans
    slots: PlayerSlots,
}

impl GilrsSource {
    pub fn new() -> Result<Self, SourceError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(SourceError::InitializationError(e.to_string()));
            }
        };

        Ok(Self {
            gilrs,
            ids: HashMap::new(),
            slots: PlayerSlots::new(),
        })
    }
}

impl InputSource for GilrsSource {
    fn pump(&mut self) -> bool {
        let mut devices_changed = false;

        // Button state inside gilrs only advances while events are drained
        while let Some(Event { id, event, time, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Controller {} connected", id);
                    devices_changed = true;
                }
                EventType::Disconnected => {
                    warn!("Controller {} disconnected", id);
                    if let Some(slot) = self.slots.release(DeviceId(usize::from(id))) {
                        debug!("Freed player slot {}", slot);
                    }
                    devices_changed = true;
                }
                EventType::ButtonPressed(button, _) | EventType::ButtonReleased(button, _) => {
                    debug!("Button event on {}: {:?} at {:?}", id, button, time);
                }
                _ => {}
            }
        }

        devices_changed
    }

    fn devices(&mut self) -> Vec<SourceDevice> {
        let found: Vec<(DeviceId, GamepadId)> = self
            .gilrs
            .gamepads()
            .map(|(gamepad_id, _)| (DeviceId(usize::from(gamepad_id)), gamepad_id))
            .collect();
        let connected: Vec<DeviceId> = found.iter().map(|(id, _)| *id).collect();
        let assigned = self.slots.assign(&connected);
        self.ids = found.into_iter().collect();

        let mut devices = Vec::new();
        for (id, player_index) in assigned {
            let Some(gamepad_id) = self.ids.get(&id) else {
                continue;
            };
            let gamepad = self.gilrs.gamepad(*gamepad_id);
            debug!(
                "  [{}] ID: {}, Name: {}, UUID: {:?}",
                player_index,
                id,
                gamepad.name(),
                gamepad.uuid()
            );
            devices.push(SourceDevice {
                id,
                name: gamepad.name().to_string(),
                player_index: Some(player_index),
            });
        }

        devices
    }

    fn is_pressed(&self, device: DeviceId, button: PadButton) -> bool {
        self.ids
            .get(&device)
            .and_then(|id| self.gilrs.connected_gamepad(*id))
            .is_some_and(|gamepad| gamepad.is_pressed(to_gilrs_button(button)))
    }
}

// Helper function to map our PadButton to the gilrs Button
fn to_gilrs_button(button: PadButton) -> Button {
    match button {
        PadButton::A => Button::South,
        PadButton::B => Button::East,
        PadButton::X => Button::North,
        PadButton::Y => Button::West,
        PadButton::Start => Button::Start,
        PadButton::Select => Button::Select,
        PadButton::LeftBumper => Button::LeftTrigger,
        PadButton::RightBumper => Button::RightTrigger,
        PadButton::LeftTrigger => Button::LeftTrigger2,
        PadButton::RightTrigger => Button::RightTrigger2,
        PadButton::LeftStick => Button::LeftThumb,
        PadButton::RightStick => Button::RightThumb,
        PadButton::DPadUp => Button::DPadUp,
        PadButton::DPadDown => Button::DPadDown,
        PadButton::DPadLeft => Button::DPadLeft,
        PadButton::DPadRight => Button::DPadRight,
        PadButton::Guide => Button::Mode,
    }
}
