//! Error types for board construction and configuration loading.
//!
//! The search itself has no error path: running out of frontier or out of
//! time is reported through [`crate::solver::Verdict`], not as an error.

use thiserror::Error;

/// Rejection reasons for a malformed board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,

    #[error("board dimension {dim} is too small (minimum is 2)")]
    TooSmall { dim: usize },

    #[error("board dimension {dim} is too large (maximum is {max})")]
    TooLarge { dim: usize, max: usize },

    #[error("row {row} has {len} tiles, expected {dim}")]
    NotSquare { row: usize, len: usize, dim: usize },

    #[error("tile {tile} is out of range (maximum is {max})")]
    TileOutOfRange { tile: u16, max: u16 },

    #[error("tile {tile} appears more than once")]
    DuplicateTile { tile: u16 },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
