use crate::controller::kpad::ProButtons;
use crate::controller::manager::ManagerSettings;
use crate::controller::vpad::{TouchSurface, VpadButtons};
use crate::mapping::ButtonMap;
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn, Level};

const CONFIG_DIR: &str = "padbridge";
const CONFIG_FILE: &str = "config.toml";

/// Everything the bridge reads at startup
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Application short name, used for the application directory
    pub short_name: String,
    /// Root of the `wiiu/apps/<short_name>` tree; the user data directory if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,
    /// Asset archives that must be present before the loop starts
    pub required_archives: Vec<PathBuf>,
    /// Frames per second of the update loop
    pub frame_rate_hz: u32,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    pub touch_surface: TouchSurface,
    pub gamepad_map: ButtonMap<VpadButtons>,
    pub pro_map: ButtonMap<ProButtons>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            short_name: "padbridge".to_string(),
            storage_root: None,
            required_archives: Vec::new(),
            frame_rate_hz: 60,
            log_level: "info".to_string(),
            touch_surface: TouchSurface::default(),
            gamepad_map: ButtonMap::default(),
            pro_map: ButtonMap::default(),
        }
    }
}

impl BridgeConfig {
    /// `<config dir>/padbridge/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine the user configuration directory"))?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads the config from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Loads the config from `path`, falling back to defaults if it does not exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Writes the config to `path`, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        fs::write(path, content).map_err(|e| eyre!("Failed to write config file: {}", e))?;

        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Checks values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.frame_rate_hz) {
            return Err(eyre!(
                "frame_rate_hz must be between 1 and 1000, got {}",
                self.frame_rate_hz
            ));
        }
        if self.touch_surface.width == 0 || self.touch_surface.height == 0 {
            return Err(eyre!("touch_surface must not be empty"));
        }
        self.log_level()?;
        self.gamepad_map.validate()?;
        self.pro_map.validate()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|e| eyre!("Invalid log_level '{}': {}", self.log_level, e))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.frame_rate_hz.max(1)))
    }

    pub fn storage_root(&self) -> PathBuf {
        if let Some(root) = &self.storage_root {
            return root.clone();
        }
        dirs::data_dir().unwrap_or_else(|| {
            warn!("Could not determine data directory, using current directory");
            PathBuf::from(".")
        })
    }

    pub fn manager_settings(&self) -> ManagerSettings {
        ManagerSettings {
            touch_surface: self.touch_surface,
            gamepad_map: self.gamepad_map.clone(),
            pro_map: self.pro_map.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::device::PadButton;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = BridgeConfig::default();
        assert_eq!(config.short_name, "padbridge");
        assert_eq!(config.storage_root, None);
        assert!(config.required_archives.is_empty());
        assert_eq!(config.frame_rate_hz, 60);
        assert_eq!(config.log_level().unwrap(), Level::INFO);
        assert_eq!(config.touch_surface, TouchSurface { width: 1280, height: 720 });
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = BridgeConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
short_name = "soh"
storage_root = "/tmp/sd"
required_archives = ["oot.otr"]
frame_rate_hz = 30

[[gamepad_map.bindings]]
source = "Guide"
target = "TV"
"#,
        )
        .unwrap();

        let config = BridgeConfig::load_from(&path).unwrap();
        assert_eq!(config.short_name, "soh");
        assert_eq!(config.storage_root, Some(PathBuf::from("/tmp/sd")));
        assert_eq!(config.required_archives, vec![PathBuf::from("oot.otr")]);
        assert_eq!(config.frame_rate_hz, 30);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.gamepad_map.bindings.len(), 1);
        assert_eq!(config.gamepad_map.bindings[0].source, PadButton::Guide);
        assert_eq!(config.gamepad_map.bindings[0].target, VpadButtons::TV);
        assert_eq!(config.pro_map, ButtonMap::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = BridgeConfig::default();
        config.short_name = "harbour".to_string();
        config.storage_root = Some(dir.path().to_path_buf());
        config.gamepad_map.unbind(PadButton::Guide);
        config.save_to(&path).unwrap();

        let loaded = BridgeConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "frame_rate_hz = \"fast\"").unwrap();
        assert!(BridgeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BridgeConfig::default();
        config.frame_rate_hz = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.touch_surface.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_interval() {
        let mut config = BridgeConfig::default();
        config.frame_rate_hz = 50;
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_explicit_storage_root_wins() {
        let mut config = BridgeConfig::default();
        config.storage_root = Some(PathBuf::from("/media/sd"));
        assert_eq!(config.storage_root(), PathBuf::from("/media/sd"));
    }
}
