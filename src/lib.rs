//! Shortest-move solver for sliding-robot puzzles on a walled square grid.

pub mod board;
pub mod config;
pub mod error;
pub mod explore;
pub mod geometry;
pub mod puzzle;
pub mod search;
pub mod slide;
pub mod solver;
pub mod state;

pub use board::{Board, BoardBuilder};
pub use config::SolverConfig;
pub use error::{PuzzleError, PuzzleResult};
pub use explore::{explore, Exploration};
pub use geometry::{Cell, Color, ColorSet, Direction, Move, Walls, MAX_BOARD_SIZE, ROBOT_COUNT};
pub use puzzle::{Puzzle, PuzzleFile, Request, Target, WallSegment};
pub use search::{search, Path, Query, SearchStats};
pub use slide::SlideTable;
pub use solver::{Report, Solver};
pub use state::State;
