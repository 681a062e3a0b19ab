//! Settings persistence
//!
//! A single flat JSON document holding the popup position, colors and
//! opacity. Every field carries a serde default, so files written by older
//! versions (or hand-edited files missing keys) load cleanly with defaults
//! filled in for whatever is absent.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants;

/// Saved popup position. `None` coordinates mean the popup has never been
/// dragged and uses the default centered-top placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifPosition {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// Popup colors as hex strings (`#RRGGBB` or `#AARRGGBB`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifColors {
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_fg")]
    pub fg: String,
}

impl Default for NotifColors {
    fn default() -> Self {
        Self {
            bg: default_bg(),
            fg: default_fg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notif_position: NotifPosition,
    #[serde(default)]
    pub notif_colors: NotifColors,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notif_position: NotifPosition::default(),
            notif_colors: NotifColors::default(),
            opacity: default_opacity(),
        }
    }
}

// Default value functions
fn default_bg() -> String {
    constants::defaults::BG_COLOR.to_string()
}

fn default_fg() -> String {
    constants::defaults::FG_COLOR.to_string()
}

fn default_opacity() -> f32 {
    constants::defaults::OPACITY
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = match std::env::var_os(constants::config::DIR_ENV_OVERRIDE) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(constants::config::APP_DIR),
        };
        path.push(constants::config::FILENAME);
        path
    }

    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load configuration from `path`. A missing file is written out with
    /// defaults; an unparsable file is moved aside and replaced with
    /// defaults so a bad edit never takes the application down.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default config");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        match serde_json::from_str(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "Config file is not valid JSON, restoring defaults");
                let sidecar = path.with_extension(constants::config::CORRUPT_EXTENSION);
                fs::rename(path, &sidecar).with_context(|| {
                    format!("Failed to move corrupt config aside to {}", sidecar.display())
                })?;
                info!(backup = %sidecar.display(), "Moved unreadable config aside");
                let config = Config::default();
                config.save_to(path)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Serialize to pretty JSON and overwrite `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
