//! Input validation errors.
//!
//! Running out of search budget is not an error: the solver reports it as a
//! missing path. Broken internal invariants panic.

use std::fmt;

use crate::geometry::{Cell, Color, MAX_BOARD_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// Board side outside `2..=MAX_BOARD_SIZE`.
    BoardSize(usize),
    /// Wall grid rows or columns do not match the declared size.
    WallGridShape {
        size: usize,
        rows: usize,
        cols: usize,
    },
    /// A robot, target or wall segment lies off the board.
    CellOutOfBounds { what: String, cell: Cell },
    /// Two robots share a cell.
    DuplicatePosition { first: Color, second: Color, cell: Cell },
    /// The target robot is not on the board.
    MissingRobot(Color),
    /// The target sits in a walled-off region the robot can never enter.
    TargetUnreachable { color: Color, target: Cell },
    /// An explicit movable subset leaves out the robot that has to reach the target.
    TargetNotMovable(Color),
    /// The explore policy was configured without any depth.
    EmptySchedule,
    /// A "COLOR row col" request could not be parsed.
    Request(String),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::BoardSize(size) => {
                write!(f, "board size {size} is outside 2..={MAX_BOARD_SIZE}")
            }
            PuzzleError::WallGridShape { size, rows, cols } => write!(
                f,
                "wall grid is {rows}x{cols} but the board is {size}x{size}"
            ),
            PuzzleError::CellOutOfBounds { what, cell } => {
                write!(f, "{what} at {cell} is off the board")
            }
            PuzzleError::DuplicatePosition {
                first,
                second,
                cell,
            } => write!(f, "robots {first} and {second} both stand on {cell}"),
            PuzzleError::MissingRobot(color) => write!(f, "no {color} robot on the board"),
            PuzzleError::TargetUnreachable { color, target } => write!(
                f,
                "target {target} is walled off from the {color} robot"
            ),
            PuzzleError::TargetNotMovable(color) => {
                write!(f, "movable subset does not include the {color} robot")
            }
            PuzzleError::EmptySchedule => write!(f, "depth schedule is empty"),
            PuzzleError::Request(reason) => write!(f, "bad request: {reason}"),
        }
    }
}

impl std::error::Error for PuzzleError {}

pub type PuzzleResult<T> = Result<T, PuzzleError>;
