//! Platform lifecycle: application directory, asset archive checks, input bring-up
//!
//! ```text
//! Platform<Booting> ──prepare()──► Platform<Ready> ──exit()
//!   (name checked)   (dirs made)     (input, archives)
//! ```
//!
//! The application directory is `<storage_root>/wiiu/apps/<short_name>/`.

use crate::config::BridgeConfig;
use crate::controller::input_source::{InputSource, SourceError};
use crate::controller::manager::InputManager;
use crate::mapping::MappingError;
use statum::{machine, state};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info};

/// Header of an MPQ archive
const MPQ_SIGNATURE: [u8; 4] = *b"MPQ\x1A";
/// Header of an MPQ archive that starts with a user data block
const MPQ_USER_DATA_SIGNATURE: [u8; 4] = *b"MPQ\x1B";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Invalid short name '{0}': must be a single, non-empty path component")]
    InvalidShortName(String),

    #[error("Storage error at {}: {}", .path.display(), .source)]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Main OTR file not found! ({})", .0.display())]
    MissingArchive(PathBuf),

    #[error("Invalid OTR files! Try regenerating them! ({})", .0.display())]
    InvalidArchive(PathBuf),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Input source error: {0}")]
    Source(#[from] SourceError),
}

#[state]
#[derive(Debug, Clone)]
pub enum PlatformState {
    Booting,
    Ready,
}

#[machine]
#[derive(Debug)]
pub struct Platform<S: PlatformState> {
    // Loaded configuration
    config: BridgeConfig,

    // Root of the wiiu/apps tree
    storage_root: PathBuf,

    // <storage_root>/wiiu/apps/<short_name>
    app_dir: PathBuf,
}

// Methods available in all states
impl<S: PlatformState> Platform<S> {
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }
}

impl Platform<Booting> {
    pub fn boot(config: BridgeConfig) -> Result<Self, PlatformError> {
        let short_name = config.short_name.clone();
        let mut components = Path::new(&short_name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if short_name.is_empty() || !single_normal {
            error!("Refusing short name '{}'", short_name);
            return Err(PlatformError::InvalidShortName(short_name));
        }

        let storage_root = config.storage_root();
        let app_dir = storage_root.join("wiiu").join("apps").join(&short_name);
        info!("Booting '{}' with application directory {}", short_name, app_dir.display());

        Ok(Self::new(config, storage_root, app_dir))
    }

    /// Creates `wiiu/`, `wiiu/apps/` and the application directory
    pub fn prepare(self) -> Result<Platform<Ready>, PlatformError> {
        let wiiu_dir = self.storage_root.join("wiiu");
        let apps_dir = wiiu_dir.join("apps");
        for dir in [&wiiu_dir, &apps_dir, &self.app_dir] {
            fs::create_dir_all(dir).map_err(|source| PlatformError::Storage {
                path: dir.to_path_buf(),
                source,
            })?;
            debug!("Ensured directory {}", dir.display());
        }

        info!("Application directory ready, transitioning to Ready state");
        Ok(self.transition())
    }
}

impl Platform<Ready> {
    /// Makes the application directory the process working directory
    pub fn enter_app_dir(&self) -> Result<(), PlatformError> {
        std::env::set_current_dir(&self.app_dir).map_err(|source| PlatformError::Storage {
            path: self.app_dir.clone(),
            source,
        })?;
        info!("Working directory is now {}", self.app_dir.display());
        Ok(())
    }

    /// Checks that an asset archive exists and carries an MPQ header.
    ///
    /// Relative paths resolve against the application directory. Both failure
    /// kinds are fatal for the engine.
    pub fn verify_archive<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, PlatformError> {
        let path = self.app_dir.join(path.as_ref());

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!("Main OTR file not found: {}", path.display());
                return Err(PlatformError::MissingArchive(path));
            }
            Err(source) => return Err(PlatformError::Storage { path, source }),
        };

        if !metadata.is_file() {
            error!("OTR path is not a file: {}", path.display());
            return Err(PlatformError::InvalidArchive(path));
        }

        let mut header = [0u8; 4];
        let read = File::open(&path).and_then(|mut file| file.read_exact(&mut header));
        match read {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                error!("OTR file too short: {}", path.display());
                return Err(PlatformError::InvalidArchive(path));
            }
            Err(source) => return Err(PlatformError::Storage { path, source }),
        }

        if header != MPQ_SIGNATURE && header != MPQ_USER_DATA_SIGNATURE {
            error!("OTR file has no MPQ header: {}", path.display());
            return Err(PlatformError::InvalidArchive(path));
        }

        debug!("Verified archive {}", path.display());
        Ok(path)
    }

    /// Builds the input manager from the configured button maps
    pub fn input_manager<I: InputSource>(&self, source: I) -> Result<InputManager<I>, PlatformError> {
        info!("Starting input subsystem");
        Ok(InputManager::new(source, self.config.manager_settings())?)
    }

    pub fn exit(self) {
        info!(
            "Shutting down input subsystem for '{}'",
            self.config.short_name
        );
    }
}
