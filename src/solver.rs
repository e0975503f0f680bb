use log::info;
use serde::Serialize;

use crate::board::Board;
use crate::config::SolverConfig;
use crate::error::PuzzleResult;
use crate::explore::explore;
use crate::geometry::{Cell, Color, ColorSet};
use crate::puzzle::{validate_request, Request};
use crate::search::{search, Path, Query, SearchStats};
use crate::slide::SlideTable;
use crate::state::State;

/// Outcome of one solve request.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Report {
    pub color: Color,
    pub target: Cell,
    pub start: State,
    /// `None` when no path exists within the budget; empty when already solved.
    pub path: Option<Path>,
    pub movable: ColorSet,
    pub stats: SearchStats,
}

impl Report {
    pub fn is_solved(&self) -> bool {
        self.path.is_some()
    }
}

/// Board, its slide table and the search settings, reused across requests.
#[derive(Clone, Debug)]
pub struct Solver {
    board: Board,
    table: SlideTable,
    config: SolverConfig,
}

impl Solver {
    pub fn new(board: Board, config: SolverConfig) -> PuzzleResult<Self> {
        config.validate()?;
        let table = SlideTable::new(&board);
        Ok(Solver {
            board,
            table,
            config,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn table(&self) -> &SlideTable {
        &self.table
    }

    /// Validates the request, then runs either one bounded search (when the request
    /// names a movable subset or a depth) or the explore policy.
    pub fn solve(&self, robots: &State, request: &Request) -> PuzzleResult<Report> {
        validate_request(&self.board, robots, request)?;
        let target = request.target;
        info!("solving {target}");

        let report = if request.movable.is_some() || request.max_depth.is_some() {
            let movable = request.movable.unwrap_or(ColorSet::ALL);
            let max_depth = request
                .max_depth
                .unwrap_or_else(|| self.default_depth(robots, movable));
            let query = Query {
                start: *robots,
                color: target.color,
                target: target.cell,
                movable,
                max_depth,
            };
            let mut stats = SearchStats::default();
            let path = search(&self.table, &query, &mut stats);
            Report {
                color: target.color,
                target: target.cell,
                start: *robots,
                path,
                movable,
                stats,
            }
        } else {
            let found = explore(&self.table, robots, target.color, target.cell, &self.config);
            Report {
                color: target.color,
                target: target.cell,
                start: *robots,
                path: found.path,
                movable: found.movable,
                stats: found.stats,
            }
        };

        match &report.path {
            Some(path) => info!("solved in {} moves: {path}", path.len()),
            None => info!("no solution within budget"),
        }
        Ok(report)
    }

    /// Schedule depth for the number of helpers in `movable` that are on the board, or
    /// its last entry.
    fn default_depth(&self, robots: &State, movable: ColorSet) -> u32 {
        let helpers = movable
            .iter()
            .filter(|&c| robots.is_present(c))
            .count()
            .saturating_sub(1);
        let schedule = &self.config.depth_schedule;
        schedule
            .get(helpers)
            .or_else(|| schedule.last())
            .map_or(0, |&d| u32::from(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PuzzleError;
    use crate::geometry::{Direction, Move};
    use crate::puzzle::Target;

    fn yellow_to(row: u8, col: u8) -> Request {
        Request::new(Target {
            color: Color::Yellow,
            cell: Cell::new(row, col),
        })
    }

    #[test]
    fn explicit_subset_runs_a_single_search() {
        let solver = Solver::new(Board::open(4).unwrap(), SolverConfig::default()).unwrap();
        // Yellow only stops on (1,0) once Red has slid left onto (2,0)
        let robots = State::from_robots([
            (Color::Yellow, Cell::new(0, 0)),
            (Color::Red, Cell::new(2, 2)),
        ]);

        let mut request = yellow_to(1, 0);
        request.movable = Some(ColorSet::single(Color::Yellow));
        let report = solver.solve(&robots, &request).unwrap();
        assert!(!report.is_solved());
        assert_eq!(report.stats.trials, 1);

        request.movable = None;
        request.max_depth = Some(2);
        let report = solver.solve(&robots, &request).unwrap();
        assert_eq!(
            report.path.unwrap().moves(),
            &[
                Move::new(Color::Red, Direction::Left),
                Move::new(Color::Yellow, Direction::Bottom)
            ]
        );
        assert_eq!(report.movable, ColorSet::ALL);
    }

    #[test]
    fn absent_colors_do_not_shrink_the_depth() {
        let config = SolverConfig {
            depth_schedule: vec![3, 1],
            parallel: false,
        };
        let solver = Solver::new(Board::open(4).unwrap(), config).unwrap();
        let robots = State::from_robots([(Color::Yellow, Cell::new(0, 0))]);

        let mut request = yellow_to(3, 3);
        request.movable = Some(ColorSet::from(vec![Color::Yellow, Color::Blue]));
        let report = solver.solve(&robots, &request).unwrap();
        assert_eq!(report.path.map(|p| p.len()), Some(2));
    }

    #[test]
    fn target_robot_must_be_movable() {
        let solver = Solver::new(Board::open(4).unwrap(), SolverConfig::default()).unwrap();
        let robots = State::from_robots([
            (Color::Yellow, Cell::new(0, 0)),
            (Color::Red, Cell::new(2, 2)),
        ]);
        let mut request = yellow_to(3, 3);
        request.movable = Some(ColorSet::single(Color::Red));
        assert_eq!(
            solver.solve(&robots, &request).unwrap_err(),
            PuzzleError::TargetNotMovable(Color::Yellow)
        );
    }

    #[test]
    fn invalid_requests_fail_before_searching() {
        let solver = Solver::new(Board::standard(16).unwrap(), SolverConfig::default()).unwrap();
        let robots = State::from_robots([(Color::Yellow, Cell::new(0, 0))]);
        assert!(matches!(
            solver.solve(&robots, &yellow_to(8, 8)),
            Err(PuzzleError::TargetUnreachable { .. })
        ));
    }

    #[test]
    fn rejects_an_all_zero_schedule() {
        let config = SolverConfig {
            depth_schedule: vec![0, 0],
            parallel: false,
        };
        assert_eq!(
            Solver::new(Board::open(4).unwrap(), config).unwrap_err(),
            PuzzleError::EmptySchedule
        );
    }

    #[test]
    fn default_depth_follows_the_schedule() {
        let solver = Solver::new(Board::open(4).unwrap(), SolverConfig::default()).unwrap();
        let full = State::from_robots([
            (Color::Blue, Cell::new(0, 0)),
            (Color::Yellow, Cell::new(0, 1)),
            (Color::Green, Cell::new(0, 2)),
            (Color::Red, Cell::new(0, 3)),
        ]);
        assert_eq!(solver.default_depth(&full, ColorSet::single(Color::Red)), 32);
        assert_eq!(solver.default_depth(&full, ColorSet::ALL), 7);

        let pair = State::from_robots([
            (Color::Yellow, Cell::new(0, 1)),
            (Color::Red, Cell::new(0, 3)),
        ]);
        assert_eq!(solver.default_depth(&pair, ColorSet::ALL), 16);
    }
}
