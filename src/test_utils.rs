//! Test utilities for driving the input manager without hardware.

pub mod scripted {
    use crate::controller::device::{DeviceId, PadButton, SourceDevice};
    use crate::controller::input_source::{InputSource, TouchPoint};
    use std::collections::HashSet;

    /// Input source whose devices, buttons and touch point are set by the test.
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        devices: Vec<SourceDevice>,
        pressed: HashSet<(DeviceId, PadButton)>,
        touch: Option<TouchPoint>,
        devices_changed: bool,
        pub pump_count: usize,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        /// Connects a device in the given player slot.
        pub fn connect(&mut self, id: usize, name: &str, player_index: Option<usize>) -> &mut Self {
            self.devices.push(SourceDevice {
                id: DeviceId(id),
                name: name.to_string(),
                player_index,
            });
            self.devices_changed = true;
            self
        }

        /// Removes a device and forgets its buttons.
        pub fn disconnect(&mut self, id: usize) -> &mut Self {
            self.devices.retain(|device| device.id != DeviceId(id));
            self.pressed.retain(|(device, _)| *device != DeviceId(id));
            self.devices_changed = true;
            self
        }

        pub fn press(&mut self, id: usize, button: PadButton) -> &mut Self {
            self.pressed.insert((DeviceId(id), button));
            self
        }

        pub fn release(&mut self, id: usize, button: PadButton) -> &mut Self {
            self.pressed.remove(&(DeviceId(id), button));
            self
        }

        pub fn set_touch(&mut self, touch: Option<(f32, f32)>) -> &mut Self {
            self.touch = touch.map(|(x, y)| TouchPoint { x, y });
            self
        }
    }

    impl InputSource for ScriptedSource {
        fn pump(&mut self) -> bool {
            self.pump_count += 1;
            std::mem::take(&mut self.devices_changed)
        }

        fn devices(&mut self) -> Vec<SourceDevice> {
            self.devices.clone()
        }

        fn is_pressed(&self, device: DeviceId, button: PadButton) -> bool {
            self.pressed.contains(&(device, button))
        }

        fn primary_touch(&self) -> Option<TouchPoint> {
            self.touch
        }
    }
}
