//! Cell storage and the generation step
//!
//! Callers address cells with Cartesian coordinates: origin bottom-left, `y`
//! growing upward. Storage is row-major with row 0 at the top, so
//! `row = height - 1 - y` and `col = x`.

use crate::boundary::Boundary;
use crate::error::{LifeError, Result};
use crate::pattern::PatternFormat;
use std::fmt;

/// Offsets of the Moore neighbourhood
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// A fixed-size field of dead/alive cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<bool>>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![vec![false; width]; height],
        })
    }

    /// Parse a grid from pattern text, one line per row.
    ///
    /// Every character equal to the alive token is alive; anything else,
    /// including unexpected characters, is dead. All rows must have the
    /// same length as the first one.
    pub fn from_pattern(text: &str, format: &PatternFormat) -> Result<Self> {
        let rows: Vec<&str> = text.lines().collect();
        let first = rows.first().ok_or_else(|| LifeError::Parse {
            line: 1,
            reason: "pattern is empty".into(),
        })?;

        let width = first.chars().count();
        if width == 0 {
            return Err(LifeError::Parse {
                line: 1,
                reason: "first row is empty".into(),
            });
        }

        let mut cells = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let parsed: Vec<bool> = row.chars().map(|c| format.is_alive(c)).collect();
            if parsed.len() != width {
                return Err(LifeError::Parse {
                    line: i + 1,
                    reason: format!("expected {} cells, found {}", width, parsed.len()),
                });
            }
            cells.push(parsed);
        }

        Ok(Self {
            width,
            height: cells.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Convert a Cartesian coordinate into `(col, row)` storage indices.
    /// The transform is its own inverse.
    pub fn coord_to_index(&self, x: isize, y: isize) -> (isize, isize) {
        (x, self.height as isize - 1 - y)
    }

    /// Convert `(col, row)` storage indices back into a Cartesian coordinate
    pub fn index_to_coord(&self, col: isize, row: isize) -> (isize, isize) {
        (col, self.height as isize - 1 - row)
    }

    fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn out_of_bounds(&self, x: isize, y: isize) -> LifeError {
        LifeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Read the cell at a Cartesian coordinate
    pub fn get(&self, x: isize, y: isize) -> Result<bool> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let (col, row) = self.coord_to_index(x, y);
        Ok(self.cells[row as usize][col as usize])
    }

    /// Read a cell, treating anything outside the grid as dead
    pub fn get_clamped(&self, x: isize, y: isize) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    /// Read a cell, wrapping both axes around the grid edges
    pub fn get_wrapped(&self, x: isize, y: isize) -> bool {
        let x = x.rem_euclid(self.width as isize);
        let y = y.rem_euclid(self.height as isize);
        let (col, row) = self.coord_to_index(x, y);
        self.cells[row as usize][col as usize]
    }

    /// Write the cell at a Cartesian coordinate
    pub fn set(&mut self, x: isize, y: isize, alive: bool) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let (col, row) = self.coord_to_index(x, y);
        self.cells[row as usize][col as usize] = alive;
        Ok(())
    }

    /// Number of live cells in the Moore neighbourhood of `(x, y)`, 0..=8
    pub fn count_live_neighbors<B: Boundary + ?Sized>(&self, x: isize, y: isize, boundary: &B) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dx, dy)| boundary.lookup(self, x + dx, y + dy))
            .count() as u8
    }

    /// State of `(x, y)` in the next generation
    pub fn evaluate_next<B: Boundary + ?Sized>(&self, x: isize, y: isize, boundary: &B) -> bool {
        match self.count_live_neighbors(x, y, boundary) {
            0 | 1 => false,
            2 => boundary.lookup(self, x, y),
            3 => true,
            _ => false,
        }
    }

    /// Advance one generation.
    ///
    /// The next generation is built in a separate buffer so every cell is
    /// evaluated against the previous generation, then swapped in.
    pub fn step<B: Boundary + ?Sized>(&mut self, boundary: &B) {
        let next: Vec<Vec<bool>> = (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let (x, y) = self.index_to_coord(col as isize, row as isize);
                        self.evaluate_next(x, y, boundary)
                    })
                    .collect()
            })
            .collect();

        self.cells = next;
    }

    /// Grow the grid to at least `width` x `height`. Never shrinks.
    ///
    /// New columns are added on the right. New rows are added above the
    /// existing ones in storage, so every existing cell keeps its Cartesian
    /// coordinate.
    pub fn extend(&mut self, width: usize, height: usize) {
        if width > self.width {
            for row in &mut self.cells {
                row.resize(width, false);
            }
            self.width = width;
        }

        if height > self.height {
            let mut grown = vec![vec![false; self.width]; height - self.height];
            grown.append(&mut self.cells);
            self.cells = grown;
            self.height = height;
        }
    }

    /// Text lines for display, top storage row first.
    ///
    /// Each cell is written as `repeat` copies of its glyph. The iterator is
    /// lazy and can be cloned to restart it.
    pub fn render(
        &self,
        alive_glyph: char,
        dead_glyph: char,
        repeat: usize,
    ) -> impl Iterator<Item = String> + Clone + '_ {
        self.cells.iter().map(move |row| {
            let mut line = String::with_capacity(row.len() * repeat);
            for &alive in row {
                let glyph = if alive { alive_glyph } else { dead_glyph };
                line.extend(std::iter::repeat_n(glyph, repeat));
            }
            line
        })
    }

    /// Cartesian coordinates of every live cell
    pub fn live_cells(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, alive)| **alive)
                .map(move |(col, _)| self.index_to_coord(col as isize, row as isize))
        })
    }

    pub fn population(&self) -> usize {
        self.cells.iter().flatten().filter(|&&alive| alive).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = PatternFormat::default();
        for line in self.render(format.alive.glyph(), format.dead.glyph(), 1) {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
