use crate::controller::kpad::{WpadChannel, CHANNEL_COUNT};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// Logical button as reported by the input library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Start,
    Select,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Guide,
}

impl PadButton {
    pub const ALL: [PadButton; 17] = [
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::Start,
        PadButton::Select,
        PadButton::LeftBumper,
        PadButton::RightBumper,
        PadButton::LeftTrigger,
        PadButton::RightTrigger,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
        PadButton::Guide,
    ];
}

// Opaque device handle handed out by an input source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player slots that stay with a device until it disconnects.
///
/// A new device takes the lowest free slot. Slots of devices that are gone
/// are freed, so the others never shift down.
#[derive(Clone, Debug, Default)]
pub struct PlayerSlots {
    slots: HashMap<DeviceId, usize>,
}

impl PlayerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Syncs the slots with the currently connected devices
    pub fn assign(&mut self, connected: &[DeviceId]) -> Vec<(DeviceId, usize)> {
        self.slots.retain(|id, _| connected.contains(id));

        connected
            .iter()
            .map(|id| {
                let slot = match self.slots.get(id) {
                    Some(slot) => *slot,
                    None => {
                        let free = (0..)
                            .find(|slot| !self.slots.values().any(|taken| taken == slot))
                            .unwrap_or_default();
                        self.slots.insert(*id, free);
                        free
                    }
                };
                (*id, slot)
            })
            .collect()
    }

    /// Frees the slot of a disconnected device
    pub fn release(&mut self, id: DeviceId) -> Option<usize> {
        self.slots.remove(&id)
    }

    pub fn get(&self, id: DeviceId) -> Option<usize> {
        self.slots.get(&id).copied()
    }
}

// Device as enumerated by an input source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDevice {
    pub id: DeviceId,
    pub name: String,
    pub player_index: Option<usize>,
}

/// Capability class of a recognized device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Touch-capable primary controller
    Gamepad,
    /// Secondary controller on a numbered channel
    ProController(WpadChannel),
}

impl DeviceKind {
    /// Slot 0 is the gamepad, slots 1 to 4 are pro controller channels 0 to 3
    pub fn for_player(player_index: usize) -> Option<Self> {
        match player_index {
            0 => Some(DeviceKind::Gamepad),
            n if n <= CHANNEL_COUNT => WpadChannel::from_index(n - 1).map(DeviceKind::ProController),
            _ => None,
        }
    }

    pub fn has_touch(&self) -> bool {
        matches!(self, DeviceKind::Gamepad)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Gamepad => write!(f, "Gamepad"),
            DeviceKind::ProController(channel) => write!(f, "Pro Controller ({})", channel),
        }
    }
}

/// A recognized device bound to a player slot
#[derive(Clone, Debug)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub player_index: usize,
    pub kind: DeviceKind,
    pub connected_at: DateTime<Local>,
}
