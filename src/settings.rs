//! Game settings and preferences
//!
//! Persisted as JSON in the user's config directory. A missing or corrupt
//! file never stops the game: defaults are used instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::START_LEVEL;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON")]
    Json(#[from] serde_json::Error),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off (toggled in game with S)
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Controls ===
    /// Paddle follows the mouse
    pub mouse_control: bool,

    // === Game ===
    /// Level a new game starts at
    pub start_level: u32,
    /// Directory of `level_*.txt` files replacing the built-in levels
    pub levels_dir: Option<PathBuf>,

    // === HUD ===
    /// Show FPS in the title bar
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            mouse_control: true,
            start_level: START_LEVEL,
            levels_dir: None,
            show_fps: true,
        }
    }
}

impl Settings {
    const FILE_NAME: &'static str = "settings.json";
    const APP_DIR: &'static str = "breakout";

    /// `<config dir>/breakout/settings.json`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let result = Self::default_path().and_then(|path| {
            if path.exists() {
                Self::load_from(&path).map(Some)
            } else {
                Ok(None)
            }
        });

        match result {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Clamp hand-edited values into range
    fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.start_level = self.start_level.max(1);
    }
}
