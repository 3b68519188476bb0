use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_loading_timeout")]
    pub loading_timeout_secs: u64,

    #[serde(default = "default_controls_hide_delay")]
    pub controls_hide_delay_secs: u64,

    #[serde(default = "default_true")]
    pub autoplay_on_activate: bool,

    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,

    #[serde(default = "default_long_seek_step")]
    pub long_seek_step_secs: f64,

    #[serde(default = "default_volume_step")]
    pub volume_step: f64,
}

/// Options handed to every streaming-library session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingConfig {
    #[serde(default = "default_true")]
    pub enable_worker: bool,

    #[serde(default)]
    pub low_latency_mode: bool,

    #[serde(default = "default_back_buffer_length")]
    pub back_buffer_length_secs: u64,

    #[serde(default)]
    pub with_credentials: bool,

    /// Non-fatal library error details that are swallowed instead of reported.
    #[serde(default = "default_suppressed_error_details")]
    pub suppressed_error_details: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        match Self::read_from(config_path)? {
            Some(config) => Ok(config),
            None => {
                info!("No config file found, using defaults");
                let config = Config::default();
                config.save_to(config_path)?;
                Ok(config)
            }
        }
    }

    /// Like [`Config::load`], but never creates the file.
    pub fn load_existing() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;
        Self::read_from(&config_path)
    }

    /// Reads the file at `config_path`; `None` when it does not exist.
    pub fn read_from(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }
        debug!("Loading config from {:?}", config_path);
        let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
        let config = Self::from_toml_str(&contents)?;
        info!("Config loaded successfully");
        Ok(Some(config))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("research-player").join("config.toml"))
    }
}

impl PlaybackConfig {
    pub fn loading_timeout(&self) -> Duration {
        Duration::from_secs(self.loading_timeout_secs)
    }

    pub fn controls_hide_delay(&self) -> Duration {
        Duration::from_secs(self.controls_hide_delay_secs)
    }
}

impl StreamingConfig {
    pub fn is_suppressed(&self, details: &str) -> bool {
        self.suppressed_error_details.iter().any(|d| d == details)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            loading_timeout_secs: default_loading_timeout(),
            controls_hide_delay_secs: default_controls_hide_delay(),
            autoplay_on_activate: default_true(),
            seek_step_secs: default_seek_step(),
            long_seek_step_secs: default_long_seek_step(),
            volume_step: default_volume_step(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            enable_worker: default_true(),
            low_latency_mode: false,
            back_buffer_length_secs: default_back_buffer_length(),
            with_credentials: false,
            suppressed_error_details: default_suppressed_error_details(),
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_loading_timeout() -> u64 { constants::LOADING_TIMEOUT_SECS }
fn default_controls_hide_delay() -> u64 { constants::CONTROLS_HIDE_DELAY_SECS }
fn default_seek_step() -> f64 { constants::SEEK_STEP_SECS }
fn default_long_seek_step() -> f64 { constants::LONG_SEEK_STEP_SECS }
fn default_volume_step() -> f64 { constants::VOLUME_STEP }
fn default_back_buffer_length() -> u64 { constants::BACK_BUFFER_LENGTH_SECS }
fn default_suppressed_error_details() -> Vec<String> {
    constants::SUPPRESSED_ERROR_DETAILS
        .iter()
        .map(|d| d.to_string())
        .collect()
}
