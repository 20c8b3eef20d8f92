use crate::boundary::BoundaryKind;
use crate::error::{LifeError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub patterns: PatternSettings,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulationSettings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub interval_ms: Option<u64>,
    pub boundary: Option<BoundaryKind>,
    pub start_paused: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplaySettings {
    pub alive_glyph: Option<String>,
    pub dead_glyph: Option<String>,
    pub repeat: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatternSettings {
    pub dir: Option<PathBuf>,     // Directory of pattern files served to `set`
    pub alive_token: Option<String>,
    pub dead_token: Option<String>,
}

impl Settings {
    /// Load the user's settings. A missing file gives the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| LifeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termlife")
            .join("config.toml")
    }
}
