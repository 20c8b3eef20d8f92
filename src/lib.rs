//! Conway's Game of Life with a typed command line.
//!
//! [`grid`] and [`boundary`] hold the automaton itself. [`controller`] shares
//! it between the [`animation`] thread and the [`command`] interpreter, and
//! [`tui`] puts both on screen.

pub mod animation;
pub mod boundary;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod logging;
pub mod pattern;
pub mod settings;
pub mod terminal;
pub mod tui;
