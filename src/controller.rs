//! Shared simulation state
//!
//! The animation thread and the input thread both reach the grid through a
//! [`Controller`]. One mutex guards the grid, the run-state and the command
//! line fields together, and every method holds it for its whole duration.

use crate::config::{DisplayConfig, SimulationConfig};
use crate::error::{LifeError, Result};
use crate::grid::Grid;
use crate::boundary::BoundaryKind;
use crate::pattern::PatternFormat;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Whether and how generations advance on their own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// One generation is pending, then back to idle
    SteppingOnce,
    Animating,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "paused"),
            RunState::SteppingOnce => write!(f, "stepping"),
            RunState::Animating => write!(f, "animating"),
        }
    }
}

/// What the command line is currently showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    AwaitingCommand,
    ShowingMessage,
}

/// A rendered snapshot of the grid
#[derive(Clone, Debug)]
pub struct Frame {
    pub lines: Vec<String>,
    pub generation: u64,
    pub population: usize,
    pub run_state: RunState,
}

struct State {
    grid: Grid,
    run_state: RunState,
    generation: u64,
    command: String,
    message: String,
    editor_mode: EditorMode,
}

pub struct Controller {
    state: Mutex<State>,
    width: usize,
    height: usize,
    boundary: BoundaryKind,
    display: DisplayConfig,
}

impl Controller {
    /// Take ownership of a starting grid, grown to the configured size
    pub fn new(mut grid: Grid, simulation: &SimulationConfig, display: DisplayConfig) -> Self {
        grid.extend(simulation.width, simulation.height);

        Self {
            state: Mutex::new(State {
                grid,
                run_state: RunState::Idle,
                generation: 0,
                command: String::new(),
                message: String::new(),
                editor_mode: EditorMode::AwaitingCommand,
            }),
            width: simulation.width,
            height: simulation.height,
            boundary: simulation.boundary,
            display,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves the grid whole, keep going
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn run_state(&self) -> RunState {
        self.lock().run_state
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn boundary(&self) -> BoundaryKind {
        self.boundary
    }

    /// Start continuous stepping. Returns false if already animating.
    pub fn play(&self) -> Result<bool> {
        let mut state = self.lock();
        match state.run_state {
            RunState::Animating => Ok(false),
            RunState::SteppingOnce => Err(LifeError::InvalidTransition {
                from: RunState::SteppingOnce,
                command: "play",
            }),
            RunState::Idle => {
                state.run_state = RunState::Animating;
                info!(generation = state.generation, "animation started");
                Ok(true)
            }
        }
    }

    /// Stop automatic stepping, cancelling any pending single step
    pub fn pause(&self) -> RunState {
        let mut state = self.lock();
        let previous = std::mem::replace(&mut state.run_state, RunState::Idle);
        if previous != RunState::Idle {
            info!(generation = state.generation, from = %previous, "animation paused");
        }
        previous
    }

    /// Queue exactly one generation for the animation thread to apply
    pub fn request_step(&self) -> Result<()> {
        let mut state = self.lock();
        match state.run_state {
            RunState::SteppingOnce => Err(LifeError::InvalidTransition {
                from: RunState::SteppingOnce,
                command: "step",
            }),
            RunState::Idle | RunState::Animating => {
                state.run_state = RunState::SteppingOnce;
                debug!(generation = state.generation, "single step queued");
                Ok(())
            }
        }
    }

    /// Apply one generation if the run-state calls for it.
    ///
    /// A pending single step falls back to idle once applied. Returns the new
    /// frame, or `None` when idle.
    pub fn advance(&self) -> Option<Frame> {
        let mut state = self.lock();
        match state.run_state {
            RunState::Idle => return None,
            RunState::SteppingOnce => state.run_state = RunState::Idle,
            RunState::Animating => {}
        }

        state.grid.step(&self.boundary);
        state.generation += 1;
        Some(self.frame_of(&state))
    }

    /// Swap in a new grid, grown to the configured size. Resets the
    /// generation count.
    pub fn replace_grid(&self, mut grid: Grid) {
        grid.extend(self.width, self.height);
        let mut state = self.lock();
        state.grid = grid;
        state.generation = 0;
    }

    /// Replace the grid with an empty one of the configured size
    pub fn reset(&self) -> Result<()> {
        let grid = Grid::new(self.width, self.height)?;
        self.replace_grid(grid);
        info!(width = self.width, height = self.height, "grid cleared");
        Ok(())
    }

    /// Parse pattern text and make it the current grid.
    /// On a parse error the current grid is left untouched.
    pub fn load_pattern(&self, text: &str, format: &PatternFormat) -> Result<()> {
        let grid = Grid::from_pattern(text, format)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Current rendering of the grid
    pub fn frame(&self) -> Frame {
        let state = self.lock();
        self.frame_of(&state)
    }

    fn frame_of(&self, state: &State) -> Frame {
        let display = &self.display;
        Frame {
            lines: state
                .grid
                .render(display.alive_glyph, display.dead_glyph, display.repeat)
                .collect(),
            generation: state.generation,
            population: state.grid.population(),
            run_state: state.run_state,
        }
    }

    /// Read the grid while holding the lock
    pub fn with_grid<R>(&self, f: impl FnOnce(&Grid) -> R) -> R {
        f(&self.lock().grid)
    }

    pub fn record_command(&self, command: &str) {
        self.lock().command = command.to_string();
    }

    pub fn last_command(&self) -> String {
        self.lock().command.clone()
    }

    /// Show a status message on the command line
    pub fn set_message(&self, message: impl Into<String>) {
        let mut state = self.lock();
        state.message = message.into();
        state.editor_mode = EditorMode::ShowingMessage;
    }

    pub fn message(&self) -> String {
        self.lock().message.clone()
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.lock().editor_mode
    }

    /// Leave message mode so the next key starts a fresh command.
    /// Returns true if a message was being shown.
    pub fn begin_editing(&self) -> bool {
        let mut state = self.lock();
        let was_showing = state.editor_mode == EditorMode::ShowingMessage;
        state.editor_mode = EditorMode::AwaitingCommand;
        was_showing
    }
}
