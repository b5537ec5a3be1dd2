//! Sliding-tile puzzle solver.
//!
//! This crate finds shortest solutions to N×N sliding-tile puzzles with A*
//! over the Manhattan heuristic, and detects unsolvable boards by searching
//! a one-swap twin of the board in lockstep. Whichever of the pair reaches
//! the goal first settles the question.

pub mod board;
pub mod config;
pub mod error;
pub mod node;
pub mod solver;
pub mod state;

// Re-export main types
pub use board::{Board, Slide, BLANK, MAX_DIM};
pub use config::{DuplicatePolicy, SolverConfig};
pub use error::{BoardError, ConfigError};
pub use node::SearchNode;
pub use solver::{LaneStats, SearchStats, Solver, Termination, Verdict};
pub use state::{PuzzleState, Successors};
