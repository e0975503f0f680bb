//! Puzzle input format and request parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardBuilder};
use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::{Cell, Color, ColorSet, Direction};
use crate::state::State;

/// A wall on one side of one cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct WallSegment {
    pub row: u8,
    pub col: u8,
    pub side: Direction,
}

/// Robot and cell it has to reach.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Target {
    pub color: Color,
    pub cell: Cell,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.color, self.cell)
    }
}

/// Parses `"COLOR row col"`, e.g. `"yellow 3 6"` or `"Y 3 6"`.
impl FromStr for Target {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let [color, row, col] = words[..] else {
            return Err(PuzzleError::Request(format!(
                "expected \"COLOR row col\", got {text:?}"
            )));
        };
        let color = Color::from_initial(color)
            .ok_or_else(|| PuzzleError::Request(format!("unknown color {color:?}")))?;
        let coord = |word: &str| {
            word.parse::<u8>()
                .map_err(|e| PuzzleError::Request(format!("coordinate {word:?}: {e}")))
        };
        Ok(Target {
            color,
            cell: Cell::new(coord(row)?, coord(col)?),
        })
    }
}

/// What to solve on a given board and robot placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Request {
    pub target: Target,
    /// Run one search with exactly these robots movable instead of the explore policy.
    #[serde(default)]
    pub movable: Option<ColorSet>,
    /// Depth limit for that single search.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl Request {
    pub fn new(target: Target) -> Self {
        Request {
            target,
            movable: None,
            max_depth: None,
        }
    }
}

/// On-disk puzzle description.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleFile {
    pub size: usize,
    /// Full grid of wall masks, one row per board row.
    #[serde(default)]
    pub walls: Option<Vec<Vec<u8>>>,
    #[serde(default)]
    pub segments: Vec<WallSegment>,
    #[serde(default)]
    pub center_block: bool,
    pub robots: BTreeMap<Color, Cell>,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default)]
    pub movable: Option<ColorSet>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

/// A parsed puzzle: board, robots and the request stored with them, if any.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub board: Board,
    pub robots: State,
    pub request: Option<Request>,
}

impl PuzzleFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn into_puzzle(self) -> PuzzleResult<Puzzle> {
        let mut builder = match &self.walls {
            Some(rows) => BoardBuilder::from_masks(self.size, rows)?,
            None => BoardBuilder::new(self.size)?,
        };
        for segment in &self.segments {
            builder.wall(Cell::new(segment.row, segment.col), segment.side)?;
        }
        if self.center_block {
            builder.center_block();
        }
        let board = builder.build();

        let robots = State::from_robots(self.robots.iter().map(|(&c, &cell)| (c, cell)));
        robots.validate(board.size())?;

        let request = self.target.map(|target| Request {
            target,
            movable: self.movable,
            max_depth: self.max_depth,
        });

        Ok(Puzzle {
            board,
            robots,
            request,
        })
    }
}

/// Rejects requests the search could only answer with garbage.
pub fn validate_request(board: &Board, robots: &State, request: &Request) -> PuzzleResult<()> {
    robots.validate(board.size())?;

    let Target { color, cell } = request.target;
    if !board.contains(cell) {
        return Err(PuzzleError::CellOutOfBounds {
            what: "target".to_string(),
            cell,
        });
    }
    if !robots.is_present(color) {
        return Err(PuzzleError::MissingRobot(color));
    }
    if !crate::board::same_room(board, robots.cell(color), cell) {
        return Err(PuzzleError::TargetUnreachable { color, target: cell });
    }
    if let Some(movable) = request.movable {
        if !movable.contains(color) {
            return Err(PuzzleError::TargetNotMovable(color));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "size": 4,
        "segments": [{"row": 1, "col": 1, "side": "right"}],
        "robots": {"yellow": {"row": 0, "col": 0}, "red": {"row": 0, "col": 3}},
        "target": {"color": "yellow", "cell": {"row": 0, "col": 2}},
        "movable": ["yellow"]
    }"#;

    #[test]
    fn parses_a_puzzle_file() {
        let puzzle = PuzzleFile::from_json(SAMPLE).unwrap().into_puzzle().unwrap();
        assert_eq!(puzzle.board.size(), 4);
        assert!(puzzle.board.walls(Cell::new(1, 2)).blocks(Direction::Left));
        assert_eq!(puzzle.robots.cell(Color::Red), Cell::new(0, 3));
        assert!(!puzzle.robots.is_present(Color::Blue));
        let request = puzzle.request.unwrap();
        assert_eq!(request.target.cell, Cell::new(0, 2));
        assert_eq!(request.movable, Some(ColorSet::single(Color::Yellow)));
        assert_eq!(request.max_depth, None);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_robots() {
        assert!(PuzzleFile::from_json(r#"{"size": 4, "robots": {}, "extra": 1}"#).is_err());

        let clash = r#"{"size": 4, "robots": {
            "blue": {"row": 1, "col": 1}, "green": {"row": 1, "col": 1}}}"#;
        let err = PuzzleFile::from_json(clash).unwrap().into_puzzle().unwrap_err();
        assert!(matches!(err, PuzzleError::DuplicatePosition { .. }));

        let off = r#"{"size": 4, "robots": {"blue": {"row": 9, "col": 1}}}"#;
        let err = PuzzleFile::from_json(off).unwrap().into_puzzle().unwrap_err();
        assert!(matches!(err, PuzzleError::CellOutOfBounds { .. }));
    }

    #[test]
    fn parses_target_requests() {
        let target: Target = "YELLOW 3 6".parse().unwrap();
        assert_eq!(
            target,
            Target {
                color: Color::Yellow,
                cell: Cell::new(3, 6)
            }
        );
        assert_eq!("b 0 0".parse::<Target>().unwrap().color, Color::Blue);
        assert!("purple 1 1".parse::<Target>().is_err());
        assert!("red 1".parse::<Target>().is_err());
        assert!("red 1 -2".parse::<Target>().is_err());
    }

    #[test]
    fn request_validation() {
        let board = Board::standard(16).unwrap();
        let robots = State::from_robots([(Color::Yellow, Cell::new(0, 0))]);
        let request = |color, row, col| Request::new(Target {
            color,
            cell: Cell::new(row, col),
        });

        assert!(validate_request(&board, &robots, &request(Color::Yellow, 3, 6)).is_ok());
        assert_eq!(
            validate_request(&board, &robots, &request(Color::Red, 3, 6)),
            Err(PuzzleError::MissingRobot(Color::Red))
        );
        assert_eq!(
            validate_request(&board, &robots, &request(Color::Yellow, 7, 8)),
            Err(PuzzleError::TargetUnreachable {
                color: Color::Yellow,
                target: Cell::new(7, 8)
            })
        );
        assert!(matches!(
            validate_request(&board, &robots, &request(Color::Yellow, 16, 0)),
            Err(PuzzleError::CellOutOfBounds { .. })
        ));

        let mut only_red = request(Color::Yellow, 3, 6);
        only_red.movable = Some(ColorSet::single(Color::Red));
        assert_eq!(
            validate_request(&board, &robots, &only_red),
            Err(PuzzleError::TargetNotMovable(Color::Yellow))
        );

        let mut with_absent = request(Color::Yellow, 3, 6);
        with_absent.movable = Some(ColorSet::from(vec![Color::Yellow, Color::Blue]));
        assert!(validate_request(&board, &robots, &with_absent).is_ok());
    }
}
