use crate::boundary::BoundaryKind;
use crate::error::{LifeError, Result};
use crate::pattern::{PatternFormat, Token};
use crate::settings::Settings;
use std::path::PathBuf;
use std::time::Duration;

/// Grid size used at startup and by `clear`/`set`
pub const DEFAULT_SIZE: usize = 100;
/// Animation frame time, also the idle poll interval
pub const DEFAULT_INTERVAL_MS: u64 = 200;
/// Glyph copies per cell, two looks roughly square in a monospace terminal
pub const DEFAULT_REPEAT: usize = 2;

/// How the simulation runs
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub interval: Duration,
    pub boundary: BoundaryKind,
    pub start_paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            boundary: BoundaryKind::Clamped,
            start_paused: false,
        }
    }
}

/// How cells are drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub alive_glyph: char,
    pub dead_glyph: char,
    pub repeat: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alive_glyph: 'O',
            dead_glyph: '.',
            repeat: DEFAULT_REPEAT,
        }
    }
}

/// Values given on the command line; `None` falls back to settings
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub pattern_file: Option<PathBuf>,
    pub alive_token: Option<String>,
    pub dead_token: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub interval_ms: Option<u64>,
    pub wrap: bool,
    pub paused: bool,
    pub patterns_dir: Option<PathBuf>,
}

/// Fully resolved configuration
#[derive(Clone, Debug)]
pub struct LifeConfig {
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
    /// Tokens for pattern files and templates
    pub format: PatternFormat,
    pub pattern_file: Option<PathBuf>,
    pub patterns_dir: Option<PathBuf>,
}

impl LifeConfig {
    /// Merge command line overrides over file settings and validate
    pub fn resolve(overrides: Overrides, settings: &Settings) -> Result<Self> {
        let sim = &settings.simulation;
        let width = overrides.width.or(sim.width).unwrap_or(DEFAULT_SIZE);
        let height = overrides.height.or(sim.height).unwrap_or(DEFAULT_SIZE);
        if width == 0 || height == 0 {
            return Err(LifeError::Config(format!(
                "grid size must be positive, got {}x{}",
                width, height
            )));
        }

        let interval_ms = overrides
            .interval_ms
            .or(sim.interval_ms)
            .unwrap_or(DEFAULT_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(LifeError::Config("interval must be at least 1ms".into()));
        }

        let boundary = if overrides.wrap {
            BoundaryKind::Toroidal
        } else {
            sim.boundary.unwrap_or_default()
        };

        let simulation = SimulationConfig {
            width,
            height,
            interval: Duration::from_millis(interval_ms),
            boundary,
            start_paused: overrides.paused || sim.start_paused.unwrap_or(false),
        };

        let disp = &settings.display;
        let defaults = DisplayConfig::default();
        let repeat = disp.repeat.unwrap_or(defaults.repeat);
        if repeat == 0 {
            return Err(LifeError::Config("display repeat must be at least 1".into()));
        }
        let display = DisplayConfig {
            alive_glyph: glyph_or(disp.alive_glyph.as_deref(), defaults.alive_glyph)?,
            dead_glyph: glyph_or(disp.dead_glyph.as_deref(), defaults.dead_glyph)?,
            repeat,
        };

        let pats = &settings.patterns;
        let format_defaults = PatternFormat::default();
        let alive = match overrides.alive_token.as_deref().or(pats.alive_token.as_deref()) {
            Some(s) => s.parse()?,
            None => format_defaults.alive,
        };
        let dead = match overrides.dead_token.as_deref().or(pats.dead_token.as_deref()) {
            Some(s) => s.parse()?,
            None => format_defaults.dead,
        };

        Ok(Self {
            simulation,
            display,
            format: PatternFormat::new(alive, dead)?,
            pattern_file: overrides.pattern_file,
            patterns_dir: overrides.patterns_dir.or_else(|| pats.dir.clone()),
        })
    }
}

fn glyph_or(value: Option<&str>, default: char) -> Result<char> {
    match value {
        Some(s) => Ok(s.parse::<Token>()?.glyph()),
        None => Ok(default),
    }
}
