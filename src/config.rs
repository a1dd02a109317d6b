//! Session configuration persisted as TOML
//!
//! Stored in ~/.config/blockfall/config.toml (or platform equivalent). Every
//! value is fixed for the lifetime of a session.

use crate::color::{Color, DEFAULT_PALETTE};
use crate::randomizer::RandomizerKind;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Smallest board that still fits a 4x4 shape box
pub const MIN_DIMENSION: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub columns: usize,
    /// Board height in cells
    pub rows: usize,
    /// Gravity period in milliseconds
    pub tick_interval_ms: u64,
    /// Grace period before a grounded piece locks
    pub lock_delay_ms: u64,
    /// How long cleared rows stay highlighted before they are removed
    pub clear_animation_ms: u64,
    /// Points per removed cell
    pub per_square_score: u64,
    /// Piece generation strategy
    pub randomizer: RandomizerKind,
    pub colors: ColorSettings,
}

/// Color settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Color shared by all empty cells
    pub empty: Color,
    /// Color of rows marked for removal
    pub highlight: Color,
    /// Colors pieces are drawn from
    pub palette: Vec<Color>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 20,
            tick_interval_ms: 300,
            lock_delay_ms: 300,
            clear_animation_ms: 500,
            per_square_score: 1,
            randomizer: RandomizerKind::default(),
            colors: ColorSettings::default(),
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            empty: Color::EMPTY,
            highlight: Color::HIGHLIGHT,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl GameConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load the config from the default path, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "ignoring config: {}", e);
                Self::default()
            }
        }
    }

    /// Load and validate a config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the config to the default path
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let dir = Self::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let path = dir.join("config.toml");
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
        fs::write(&path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_DIMENSION || self.rows < MIN_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "board must be at least {MIN_DIMENSION}x{MIN_DIMENSION}, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns > i32::MAX as usize || self.rows > i32::MAX as usize {
            return Err(ConfigError::Invalid("board is too large".to_string()));
        }
        for (name, value) in [
            ("tick_interval_ms", self.tick_interval_ms),
            ("lock_delay_ms", self.lock_delay_ms),
            ("clear_animation_ms", self.clear_animation_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.colors.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(self.lock_delay_ms)
    }

    pub fn clear_animation(&self) -> Duration {
        Duration::from_millis(self.clear_animation_ms)
    }
}
