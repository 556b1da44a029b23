/*
 * Manages application settings that outlive a session: the configuration file
 * that was loaded last and the directory the last batch was generated into.
 * Settings are stored as JSON in the per-user local configuration directory
 * (see `path_utils`).
 *
 * `ConfigManagerOperations` abstracts the storage so the session logic can be
 * tested against an in-memory mock. `CoreConfigManager` can be pointed at an
 * explicit directory, which the tests use instead of the real user directory.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "settings.json";

/// Catalog read on start when nothing else has been loaded before.
pub const DEFAULT_CATALOG_PATH: &str = "resources/ListDataItem.cnf";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration file format error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine the configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoConfigDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub last_catalog_path: Option<PathBuf>,
    pub last_target_dir: Option<PathBuf>,
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<AppSettings>;
    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    #[cfg(test)]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir),
        }
    }

    fn settings_file_path(&self, app_name: &str) -> Result<PathBuf> {
        let config_dir = match &self.config_dir_override {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoConfigDirectory)?,
        };
        Ok(config_dir.join(SETTINGS_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the settings for `app_name`. A missing or blank settings file is
     * not an error; it yields the default (empty) settings.
     */
    fn load_settings(&self, app_name: &str) -> Result<AppSettings> {
        log::trace!("CoreConfigManager: Loading settings for app '{app_name}'");
        let file_path = self.settings_file_path(app_name)?;

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Settings file {file_path:?} does not exist.");
            return Ok(AppSettings::default());
        }

        let contents = fs::read_to_string(&file_path)?;
        if contents.trim().is_empty() {
            log::debug!("CoreConfigManager: Settings file {file_path:?} is empty.");
            return Ok(AppSettings::default());
        }

        let settings: AppSettings = serde_json::from_str(&contents)?;
        log::debug!("CoreConfigManager: Loaded settings {settings:?} from {file_path:?}.");
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()> {
        log::trace!("CoreConfigManager: Saving settings {settings:?} for app '{app_name}'");
        let file_path = self.settings_file_path(app_name)?;
        let writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(writer, settings)?;
        log::debug!("CoreConfigManager: Saved settings to {file_path:?}.");
        Ok(())
    }
}
