//! Property tests for the search on random small boards.

use proptest::prelude::*;

use ricochet_solver::{
    search, Board, BoardBuilder, Cell, Color, ColorSet, Direction, Query, SearchStats,
    SlideTable, SolverConfig, State,
};

const SIZE: u8 = 6;

fn build_board(segments: &[(u8, u8, usize)]) -> Board {
    let mut builder = BoardBuilder::new(SIZE as usize).unwrap();
    for &(row, col, side) in segments {
        builder.wall(Cell::new(row, col), Direction::ALL[side]).unwrap();
    }
    builder.build()
}

fn cell(idx: u8) -> Cell {
    Cell::new(idx / SIZE, idx % SIZE)
}

fn setup() -> impl Strategy<Value = (Vec<(u8, u8, usize)>, Vec<u8>, u8)> {
    (
        prop::collection::vec((0..SIZE, 0..SIZE, 0usize..4), 0..12),
        prop::sample::subsequence((0..SIZE * SIZE).collect::<Vec<_>>(), 3),
        0..SIZE * SIZE,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Replaying a found path never stalls, keeps robots apart and ends on the target.
    #[test]
    fn prop_replay_is_sound((segments, robots, target) in setup()) {
        let board = build_board(&segments);
        let table = SlideTable::new(&board);
        let start = State::from_robots([
            (Color::Blue, cell(robots[0])),
            (Color::Green, cell(robots[1])),
            (Color::Red, cell(robots[2])),
        ]);
        let query = Query {
            start,
            color: Color::Blue,
            target: cell(target),
            movable: ColorSet::ALL,
            max_depth: 5,
        };

        if let Some(path) = search(&table, &query, &mut SearchStats::default()) {
            prop_assert!(path.len() <= 5);
            let states = path.replay(&table, &start);
            for (mv, pair) in path.moves().iter().zip(states.windows(2)) {
                prop_assert_ne!(pair[0].cell(mv.color), pair[1].cell(mv.color));
                prop_assert!(pair[1].validate(board.size()).is_ok());
            }
            prop_assert_eq!(states.last().unwrap().cell(Color::Blue), cell(target));
        }
    }

    /// The same query always yields the same answer, and a deeper limit never changes
    /// a path that was already found.
    #[test]
    fn prop_search_is_deterministic((segments, robots, target) in setup()) {
        let table = SlideTable::new(&build_board(&segments));
        let start = State::from_robots([
            (Color::Yellow, cell(robots[0])),
            (Color::Red, cell(robots[1])),
        ]);
        let mut query = Query {
            start,
            color: Color::Yellow,
            target: cell(target),
            movable: ColorSet::ALL,
            max_depth: 4,
        };
        let first = search(&table, &query, &mut SearchStats::default());
        let second = search(&table, &query, &mut SearchStats::default());
        prop_assert_eq!(&first, &second);

        query.max_depth = 6;
        let deeper = search(&table, &query, &mut SearchStats::default());
        if first.is_some() {
            prop_assert_eq!(first, deeper);
        }
    }

    /// The explore result is never longer than a search with every robot movable
    /// under the first schedule depth, and sequential and parallel runs agree.
    #[test]
    fn prop_explore_modes_agree((segments, robots, target) in setup()) {
        let table = SlideTable::new(&build_board(&segments));
        let start = State::from_robots([
            (Color::Blue, cell(robots[0])),
            (Color::Yellow, cell(robots[1])),
            (Color::Green, cell(robots[2])),
        ]);
        let sequential = SolverConfig { depth_schedule: vec![8, 5, 4], parallel: false };
        let parallel = SolverConfig { parallel: true, ..sequential.clone() };

        let a = ricochet_solver::explore(&table, &start, Color::Blue, cell(target), &sequential);
        let b = ricochet_solver::explore(&table, &start, Color::Blue, cell(target), &parallel);
        prop_assert_eq!(&a.path, &b.path);
        prop_assert_eq!(a.movable, b.movable);

        let query = Query {
            start,
            color: Color::Blue,
            target: cell(target),
            movable: ColorSet::ALL,
            max_depth: 4,
        };
        if let Some(full) = search(&table, &query, &mut SearchStats::default()) {
            prop_assert!(a.path.map_or(false, |p| p.len() <= full.len()));
        }
    }
}
