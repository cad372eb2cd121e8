//! Input Manager - per-frame status reconstruction
//!
//! Owns every per-device status record and the input source that feeds them.
//! The engine calls [`InputManager::update`] once per frame and then reads the
//! gamepad and pro controller records until the next frame.
//!
//! ```text
//! InputSource ──pump──► rescan on connect/disconnect
//!      │                       │
//!      └──is_pressed──► ButtonMap::apply ──► VpadStatus / KpadStatus
//!                                            (+ touch for the gamepad)
//! ```
//!
//! A record is created when its device is recognized in a slot and dropped
//! when the slot empties. A device that keeps its slot across a rescan keeps
//! its record, so a connect elsewhere cannot swallow a pending release.

use crate::controller::device::{Device, DeviceKind};
use crate::controller::input_source::InputSource;
use crate::controller::kpad::{KpadError, KpadStatus, ProButtons, WpadChannel, CHANNEL_COUNT};
use crate::controller::vpad::{TouchSurface, TouchValidity, VpadButtons, VpadReadError, VpadStatus};
use crate::mapping::{ButtonMap, MappingError};
use chrono::Local;
use tracing::{debug, info, warn};

/// Settings for the input manager
#[derive(Clone, Debug, Default)]
pub struct ManagerSettings {
    pub touch_surface: TouchSurface,
    pub gamepad_map: ButtonMap<VpadButtons>,
    pub pro_map: ButtonMap<ProButtons>,
}

pub struct InputManager<S: InputSource> {
    source: S,
    settings: ManagerSettings,
    devices: Vec<Device>,
    vpad: Option<VpadStatus>,
    kpad: [Option<KpadStatus>; CHANNEL_COUNT],
    frame: u64,
}

impl<S: InputSource> InputManager<S> {
    /// Creates a manager after validating both button maps
    pub fn new(source: S, settings: ManagerSettings) -> Result<Self, MappingError> {
        settings.gamepad_map.validate()?;
        settings.pro_map.validate()?;

        info!(
            "Input manager created: {} gamepad bindings, {} pro bindings, touch surface {}x{}",
            settings.gamepad_map.bindings.len(),
            settings.pro_map.bindings.len(),
            settings.touch_surface.width,
            settings.touch_surface.height
        );

        Ok(Self {
            source,
            settings,
            devices: Vec::new(),
            vpad: None,
            kpad: [None; CHANNEL_COUNT],
            frame: 0,
        })
    }

    /// Runs one frame: pump, rescan if needed, rebuild every record
    pub fn update(&mut self) {
        let devices_changed = self.source.pump();

        // The first frame always enumerates
        if devices_changed || self.frame == 0 {
            self.rescan();
        }

        let source = &self.source;
        for device in &self.devices {
            match device.kind {
                DeviceKind::Gamepad => {
                    if let Some(status) = self.vpad.as_mut() {
                        self.settings
                            .gamepad_map
                            .apply(&mut status.buttons, |button| source.is_pressed(device.id, button));
                    }
                }
                DeviceKind::ProController(channel) => {
                    if let Some(status) = self.kpad[channel.index()].as_mut() {
                        self.settings
                            .pro_map
                            .apply(&mut status.pro, |button| source.is_pressed(device.id, button));
                    }
                }
            }
        }

        let touch_capable = self.devices.iter().any(|device| device.kind.has_touch());
        if let Some(status) = self.vpad.as_mut().filter(|_| touch_capable) {
            status.tp_normal.touched = false;

            if let Some(point) = source.primary_touch() {
                let (x, y) = self.settings.touch_surface.scale(point.x, point.y);
                status.tp_normal.touched = true;
                status.tp_normal.validity = TouchValidity::Valid;
                status.tp_normal.x = x;
                status.tp_normal.y = y;
            }
        }

        self.frame += 1;
        debug!("Frame {} updated {} devices", self.frame, self.devices.len());
    }

    fn rescan(&mut self) {
        let previous = std::mem::take(&mut self.devices);
        let found = self.source.devices();
        info!("Rescanning input devices: {} connected", found.len());

        let mut vpad_present = false;
        let mut kpad_present = [false; CHANNEL_COUNT];

        for source_device in found {
            let Some(player_index) = source_device.player_index else {
                warn!(
                    "Ignoring '{}' ({}): no player slot",
                    source_device.name, source_device.id
                );
                continue;
            };
            let Some(kind) = DeviceKind::for_player(player_index) else {
                warn!(
                    "Ignoring '{}' ({}): player slot {} has no status record",
                    source_device.name, source_device.id, player_index
                );
                continue;
            };
            if self.devices.iter().any(|device| device.kind == kind) {
                warn!(
                    "Ignoring '{}' ({}): {} already taken",
                    source_device.name, source_device.id, kind
                );
                continue;
            }

            let kept = previous
                .iter()
                .find(|device| device.id == source_device.id && device.kind == kind);
            let connected_at = kept.map(|device| device.connected_at).unwrap_or_else(Local::now);

            match kind {
                DeviceKind::Gamepad => {
                    vpad_present = true;
                    if kept.is_none() || self.vpad.is_none() {
                        self.vpad = Some(VpadStatus::new());
                    }
                }
                DeviceKind::ProController(channel) => {
                    kpad_present[channel.index()] = true;
                    if kept.is_none() || self.kpad[channel.index()].is_none() {
                        self.kpad[channel.index()] = Some(KpadStatus::new());
                    }
                }
            }

            info!(
                "{} '{}' ({}) on player slot {} since {}",
                kind,
                source_device.name,
                source_device.id,
                player_index,
                connected_at.format("%H:%M:%S.%3f")
            );

            self.devices.push(Device {
                id: source_device.id,
                name: source_device.name,
                player_index,
                kind,
                connected_at,
            });
        }

        if !vpad_present && self.vpad.take().is_some() {
            info!("Gamepad removed, discarding its status");
        }
        for channel in WpadChannel::ALL {
            if !kpad_present[channel.index()] && self.kpad[channel.index()].take().is_some() {
                info!("Pro controller on {} removed, discarding its status", channel);
            }
        }
    }

    /// Status of the primary controller as of the last update
    pub fn vpad_status(&self) -> Result<&VpadStatus, VpadReadError> {
        if self.frame == 0 {
            return Err(VpadReadError::NoSamples);
        }
        self.vpad.as_ref().ok_or(VpadReadError::InvalidController)
    }

    /// Status of the pro controller on `channel` as of the last update
    pub fn kpad_status(&self, channel: WpadChannel) -> Result<&KpadStatus, KpadError> {
        if self.frame == 0 {
            return Err(KpadError::NoSamples);
        }
        self.kpad[channel.index()]
            .as_ref()
            .ok_or(KpadError::InvalidController(channel))
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of completed updates
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    /// Replaces the gamepad table. Existing records restart from idle.
    pub fn set_gamepad_map(&mut self, map: ButtonMap<VpadButtons>) -> Result<(), MappingError> {
        map.validate()?;
        self.settings.gamepad_map = map;
        if let Some(status) = self.vpad.as_mut() {
            status.buttons.clear();
        }
        info!("Gamepad button map replaced");
        Ok(())
    }

    /// Replaces the pro controller table. Existing records restart from idle.
    pub fn set_pro_map(&mut self, map: ButtonMap<ProButtons>) -> Result<(), MappingError> {
        map.validate()?;
        self.settings.pro_map = map;
        for status in self.kpad.iter_mut().flatten() {
            status.pro.clear();
        }
        info!("Pro controller button map replaced");
        Ok(())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
