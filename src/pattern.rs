//! Pattern text format and the stores that serve named patterns

use crate::error::{LifeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Glider used when no pattern is given at startup
pub const DEFAULT_PATTERN: &str = "..O..\n...O.\n.OOO.";

/// A single character standing for one cell state in pattern text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token(char);

impl Token {
    pub fn glyph(self) -> char {
        self.0
    }
}

impl FromStr for Token {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Token(c)),
            _ => Err(LifeError::InvalidToken(s.to_string())),
        }
    }
}

/// The two-symbol alphabet of pattern text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternFormat {
    pub alive: Token,
    pub dead: Token,
}

impl PatternFormat {
    pub fn new(alive: Token, dead: Token) -> Result<Self> {
        if alive == dead {
            return Err(LifeError::InvalidToken(format!(
                "{} (alive and dead tokens must differ)",
                alive.glyph()
            )));
        }
        Ok(Self { alive, dead })
    }

    /// Parse a token pair given as strings, e.g. from the command line
    pub fn parse(alive: &str, dead: &str) -> Result<Self> {
        Self::new(alive.parse()?, dead.parse()?)
    }

    pub fn is_alive(&self, c: char) -> bool {
        c == self.alive.glyph()
    }
}

impl Default for PatternFormat {
    fn default() -> Self {
        Self {
            alive: Token('O'),
            dead: Token('.'),
        }
    }
}

/// Source of named starting patterns
pub trait PatternStore: Send + Sync {
    /// Every pattern name the store can load
    fn names(&self) -> Result<Vec<String>>;

    /// Raw pattern text for an exact name from [`PatternStore::names`]
    fn load(&self, name: &str) -> Result<String>;
}

/// Named pattern compiled into the binary
pub struct Pattern {
    pub name: &'static str,
    pub text: &'static str,
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "glider",
        text: DEFAULT_PATTERN,
    },
    Pattern {
        name: "blinker",
        text: "...\nOOO\n...",
    },
    Pattern {
        name: "toad",
        text: "....\n.OOO\nOOO.\n....",
    },
    Pattern {
        name: "beacon",
        text: "OO..\nOO..\n..OO\n..OO",
    },
    Pattern {
        name: "pulsar",
        text: concat!(
            "..OOO...OOO..\n",
            ".............\n",
            "O....O.O....O\n",
            "O....O.O....O\n",
            "O....O.O....O\n",
            "..OOO...OOO..\n",
            ".............\n",
            "..OOO...OOO..\n",
            "O....O.O....O\n",
            "O....O.O....O\n",
            "O....O.O....O\n",
            ".............\n",
            "..OOO...OOO..",
        ),
    },
    Pattern {
        name: "r-pentomino",
        text: ".OO\nOO.\n.O.",
    },
    Pattern {
        name: "gosper-glider-gun",
        text: concat!(
            "........................O...........\n",
            "......................O.O...........\n",
            "............OO......OO............OO\n",
            "...........O...O....OO............OO\n",
            "OO........O.....O...OO..............\n",
            "OO........O...O.OO....O.O...........\n",
            "..........O.....O.......O...........\n",
            "...........O...O....................\n",
            "............OO......................",
        ),
    },
];

/// Patterns compiled into the binary
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPatterns;

impl PatternStore for BuiltinPatterns {
    fn names(&self) -> Result<Vec<String>> {
        Ok(PATTERNS.iter().map(|p| p.name.to_string()).collect())
    }

    fn load(&self, name: &str) -> Result<String> {
        PATTERNS
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.text.to_string())
            .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
    }
}

/// Patterns stored as one text file per pattern in a directory.
///
/// A pattern's name is its file name without the extension. When several
/// files share a name, the one whose file name sorts first is used.
#[derive(Clone, Debug)]
pub struct DirPatterns {
    root: PathBuf,
}

impl DirPatterns {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_error(&self, source: std::io::Error) -> LifeError {
        LifeError::PatternStore {
            path: self.root.clone(),
            source,
        }
    }

    fn entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| self.store_error(e))? {
            let path = entry.map_err(|e| self.store_error(e))?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.push((stem.to_string(), path.clone()));
            }
        }
        // One entry per name; the alphabetically first file name wins
        entries.sort();
        entries.dedup_by(|later, kept| {
            let shadowed = later.0 == kept.0;
            if shadowed {
                warn!(name = %kept.0, ignored = %later.1.display(), "duplicate pattern name");
            }
            shadowed
        });
        Ok(entries)
    }
}

impl PatternStore for DirPatterns {
    fn names(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|(name, _)| name).collect())
    }

    fn load(&self, name: &str) -> Result<String> {
        let (_, path) = self
            .entries()?
            .into_iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))?;
        debug!(path = %path.display(), "loading pattern");
        read_pattern_file(&path)
    }
}

/// Read a single pattern file given on the command line
pub fn read_pattern_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| LifeError::PatternStore {
        path: path.to_path_buf(),
        source,
    })
}
