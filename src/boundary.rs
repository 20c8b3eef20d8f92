//! Neighbour lookup policies for cells past the grid edge

use crate::grid::Grid;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Resolves a cell read at any Cartesian coordinate, in or out of the grid.
///
/// Closures of the form `Fn(&Grid, isize, isize) -> bool` are boundaries too,
/// so new policies plug into [`Grid::step`] without touching the grid.
pub trait Boundary {
    fn lookup(&self, grid: &Grid, x: isize, y: isize) -> bool;
}

/// Everything outside the grid is dead
#[derive(Clone, Copy, Debug, Default)]
pub struct Clamped;

/// Edges wrap around like a torus
#[derive(Clone, Copy, Debug, Default)]
pub struct Toroidal;

impl Boundary for Clamped {
    fn lookup(&self, grid: &Grid, x: isize, y: isize) -> bool {
        grid.get_clamped(x, y)
    }
}

impl Boundary for Toroidal {
    fn lookup(&self, grid: &Grid, x: isize, y: isize) -> bool {
        grid.get_wrapped(x, y)
    }
}

impl<F> Boundary for F
where
    F: Fn(&Grid, isize, isize) -> bool,
{
    fn lookup(&self, grid: &Grid, x: isize, y: isize) -> bool {
        self(grid, x, y)
    }
}

/// Boundary policy picked from settings or the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    #[default]
    Clamped,
    #[serde(alias = "wrap")]
    Toroidal,
}

impl Boundary for BoundaryKind {
    fn lookup(&self, grid: &Grid, x: isize, y: isize) -> bool {
        match self {
            BoundaryKind::Clamped => Clamped.lookup(grid, x, y),
            BoundaryKind::Toroidal => Toroidal.lookup(grid, x, y),
        }
    }
}

impl FromStr for BoundaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamped" | "clamp" | "dead" => Ok(BoundaryKind::Clamped),
            "toroidal" | "torus" | "wrap" => Ok(BoundaryKind::Toroidal),
            other => Err(format!("unknown boundary {:?} (expected clamped or toroidal)", other)),
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::Clamped => write!(f, "clamped"),
            BoundaryKind::Toroidal => write!(f, "toroidal"),
        }
    }
}
