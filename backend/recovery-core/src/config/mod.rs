use crate::error::config::ConfigError;
use crate::FLINT_API_DEFAULT_BASE_URL;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "recovery.toml";
const CONFIG_DIR_NAME: &str = "flint";
const CONFIG_VERSION: u32 = 1;
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Overrides `portal.base_url` when set.
pub const API_BASE_URL_ENV: &str = "FLINT_API_BASE_URL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub portal: PortalSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            portal: PortalSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    FLINT_API_DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_viewport_width() -> u32 {
    500
}
fn default_viewport_height() -> u32 {
    700
}
fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_jitter_ms() -> u64 {
    1000
}

// ============================================
// IMPLEMENTATION
// ============================================

/// `{config_dir}/flint`, or `None` when the platform has no config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
}

impl RecoveryConfig {
    /// Load config from {config_dir}/recovery.toml.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: RecoveryConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load `.env` (if any), the config file, then environment overrides.
    pub fn load_with_env(config_dir: &Path) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from {}", path.display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }

        let mut config = Self::load(config_dir)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply [`API_BASE_URL_ENV`] if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        match env::var(API_BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                info!("Using {API_BASE_URL_ENV} override for portal base URL");
                self.portal.base_url = url.trim().to_string();
            }
            Ok(_) => debug!("{API_BASE_URL_ENV} is empty, ignoring"),
            Err(env::VarError::NotPresent) => {}
            Err(env::VarError::NotUnicode(_)) => {
                warn!("{API_BASE_URL_ENV} contains invalid unicode, ignoring");
            }
        }
    }

    /// Save config to {config_dir}/recovery.toml using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        let url = &self.portal.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid portal base URL: {url}"),
            });
        }

        if self.portal.timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: String::from("portal.timeout_secs must be greater than 0"),
            });
        }

        if self.portal.viewport_width == 0 || self.portal.viewport_height == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid portal viewport: {}x{}",
                    self.portal.viewport_width, self.portal.viewport_height
                ),
            });
        }

        if !(1..=MAX_RETRY_ATTEMPTS).contains(&self.retry.max_attempts) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid retry.max_attempts: {} (must be 1-{MAX_RETRY_ATTEMPTS})",
                    self.retry.max_attempts
                ),
            });
        }

        Ok(())
    }
}
