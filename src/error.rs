use std::path::PathBuf;

use thiserror::Error;

use crate::controller::RunState;

/// Errors raised by the grid, the controller and the pattern stores
#[derive(Debug, Error)]
pub enum LifeError {
    /// Pattern text could not be turned into a grid
    #[error("Invalid pattern at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Alive/dead tokens must be a single character
    #[error("Pattern token {0:?} must be exactly one character")]
    InvalidToken(String),

    #[error("Template with that name doesn't exist. Try 'templates' to see a list.")]
    UnknownPattern(String),

    /// Cartesian coordinate outside the grid
    #[error("Coordinate ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: isize,
        y: isize,
        width: usize,
        height: usize,
    },

    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Command not allowed from the current run-state
    #[error("Cannot {command} while {from}")]
    InvalidTransition { from: RunState, command: &'static str },

    /// Pattern storage could not be read
    #[error("Failed to read patterns at {path}: {source}")]
    PatternStore {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LifeError>;
