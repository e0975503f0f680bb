use crate::board::Board;
use crate::geometry::{Cell, Color, Direction, Move};
use crate::state::State;

/// Wall-only slide destinations for every cell and direction.
///
/// For horizontal directions the table holds the destination column, for vertical ones
/// the destination row. Built once per board.
#[derive(Clone, Debug)]
pub struct SlideTable {
    size: usize,
    limits: Vec<u8>,
}

impl SlideTable {
    pub fn new(board: &Board) -> Self {
        let size = board.size();
        let mut table = SlideTable {
            size,
            limits: vec![0u8; 4 * size * size],
        };
        let last = (size - 1) as u8;

        for i in 0..size as u8 {
            // Leftward stop: the nearest LEFT wall at or before the column
            let mut bound = 0u8;
            for j in 0..size as u8 {
                let cell = Cell::new(i, j);
                if board.walls(cell).blocks(Direction::Left) {
                    bound = j;
                }
                table.set(Direction::Left, cell, bound);
            }

            let mut bound = last;
            for j in (0..size as u8).rev() {
                let cell = Cell::new(i, j);
                if board.walls(cell).blocks(Direction::Right) {
                    bound = j;
                }
                table.set(Direction::Right, cell, bound);
            }
        }

        for j in 0..size as u8 {
            let mut bound = 0u8;
            for i in 0..size as u8 {
                let cell = Cell::new(i, j);
                if board.walls(cell).blocks(Direction::Top) {
                    bound = i;
                }
                table.set(Direction::Top, cell, bound);
            }

            let mut bound = last;
            for i in (0..size as u8).rev() {
                let cell = Cell::new(i, j);
                if board.walls(cell).blocks(Direction::Bottom) {
                    bound = i;
                }
                table.set(Direction::Bottom, cell, bound);
            }
        }

        table
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn to_idx(&self, dir: Direction, cell: Cell) -> usize {
        (dir.index() * self.size + cell.row as usize) * self.size + cell.col as usize
    }

    #[inline(always)]
    fn set(&mut self, dir: Direction, cell: Cell, bound: u8) {
        let idx = self.to_idx(dir, cell);
        self.limits[idx] = bound;
    }

    /// Where a lone robot on `from` stops when sliding in `dir`.
    #[inline(always)]
    pub fn wall_stop(&self, from: Cell, dir: Direction) -> Cell {
        let bound = self.limits[self.to_idx(dir, from)];
        match dir {
            Direction::Top | Direction::Bottom => Cell::new(bound, from.col),
            Direction::Left | Direction::Right => Cell::new(from.row, bound),
        }
    }

    /// Destination of `color` sliding in `dir`, stopping one short of the first robot
    /// in its way. Returns the robot's own cell when it cannot move.
    #[inline(always)]
    pub fn slide(&self, state: &State, color: Color, dir: Direction) -> Cell {
        let src = state.cell(color);
        assert!(src.in_bounds(self.size), "{color} robot is not on the board");
        let (i, j) = (src.row, src.col);
        let mut bound = self.limits[self.to_idx(dir, src)];

        for (other, pos) in state.robots() {
            if other == color {
                continue;
            }
            match dir {
                Direction::Left => {
                    if pos.row == i && bound <= pos.col && pos.col < j {
                        bound = pos.col + 1;
                    }
                }
                Direction::Right => {
                    if pos.row == i && j < pos.col && pos.col <= bound {
                        bound = pos.col - 1;
                    }
                }
                Direction::Top => {
                    if pos.col == j && bound <= pos.row && pos.row < i {
                        bound = pos.row + 1;
                    }
                }
                Direction::Bottom => {
                    if pos.col == j && i < pos.row && pos.row <= bound {
                        bound = pos.row - 1;
                    }
                }
            }
        }

        let dst = match dir {
            Direction::Top | Direction::Bottom => Cell::new(bound, j),
            Direction::Left | Direction::Right => Cell::new(i, bound),
        };
        assert!(dst.in_bounds(self.size), "slide left the board: {dst}");
        assert!(
            state.robots().all(|(c, at)| c == color || at != dst),
            "{color} slid onto another robot at {dst}"
        );
        dst
    }

    /// Applies `mv` to `state`. `None` when the robot would not move.
    #[inline(always)]
    pub fn apply(&self, state: &State, mv: Move) -> Option<State> {
        let src = state.cell(mv.color);
        if src.is_none() {
            return None;
        }
        let dst = self.slide(state, mv.color, mv.direction);
        if dst == src {
            return None;
        }
        Some(state.with_robot(mv.color, dst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;

    #[test]
    fn open_board_slides_to_the_edge() {
        let board = Board::open(4).unwrap();
        let table = SlideTable::new(&board);
        for cell in board.cells() {
            assert_eq!(table.wall_stop(cell, Direction::Top), Cell::new(0, cell.col));
            assert_eq!(table.wall_stop(cell, Direction::Bottom), Cell::new(3, cell.col));
            assert_eq!(table.wall_stop(cell, Direction::Left), Cell::new(cell.row, 0));
            assert_eq!(table.wall_stop(cell, Direction::Right), Cell::new(cell.row, 3));
        }
    }

    #[test]
    fn interior_walls_stop_slides_from_both_sides() {
        let mut builder = BoardBuilder::new(6).unwrap();
        builder.wall(Cell::new(2, 2), Direction::Right).unwrap();
        builder.wall(Cell::new(3, 4), Direction::Top).unwrap();
        let table = SlideTable::new(&builder.build());

        assert_eq!(table.wall_stop(Cell::new(2, 0), Direction::Right), Cell::new(2, 2));
        assert_eq!(table.wall_stop(Cell::new(2, 5), Direction::Left), Cell::new(2, 3));
        assert_eq!(table.wall_stop(Cell::new(2, 2), Direction::Right), Cell::new(2, 2));
        assert_eq!(table.wall_stop(Cell::new(0, 4), Direction::Bottom), Cell::new(2, 4));
        assert_eq!(table.wall_stop(Cell::new(5, 4), Direction::Top), Cell::new(3, 4));
        assert_eq!(table.wall_stop(Cell::new(1, 0), Direction::Right), Cell::new(1, 5));
    }

    #[test]
    #[should_panic(expected = "not on the board")]
    fn sliding_an_off_board_robot_panics() {
        let table = SlideTable::new(&Board::open(4).unwrap());
        let state = State::from_robots([(Color::Green, Cell::new(9, 9))]);
        table.slide(&state, Color::Green, Direction::Left);
    }

    #[test]
    fn robots_block_one_cell_short() {
        let table = SlideTable::new(&Board::open(4).unwrap());
        let state = State::from_robots([
            (Color::Yellow, Cell::new(0, 0)),
            (Color::Red, Cell::new(0, 3)),
        ]);
        assert_eq!(table.slide(&state, Color::Yellow, Direction::Right), Cell::new(0, 2));
        assert_eq!(table.slide(&state, Color::Red, Direction::Left), Cell::new(0, 1));
        assert_eq!(table.slide(&state, Color::Yellow, Direction::Bottom), Cell::new(3, 0));
    }

    #[test]
    fn nearest_of_several_blockers_wins() {
        let table = SlideTable::new(&Board::open(8).unwrap());
        let state = State::from_robots([
            (Color::Blue, Cell::new(7, 3)),
            (Color::Green, Cell::new(4, 3)),
            (Color::Red, Cell::new(1, 3)),
            (Color::Yellow, Cell::new(2, 5)),
        ]);
        assert_eq!(table.slide(&state, Color::Blue, Direction::Top), Cell::new(5, 3));
        assert_eq!(table.slide(&state, Color::Red, Direction::Bottom), Cell::new(3, 3));
        assert_eq!(table.slide(&state, Color::Green, Direction::Top), Cell::new(2, 3));
    }

    #[test]
    fn blocked_moves_are_no_ops() {
        let table = SlideTable::new(&Board::open(4).unwrap());
        let state = State::from_robots([
            (Color::Yellow, Cell::new(0, 0)),
            (Color::Red, Cell::new(0, 1)),
        ]);
        assert_eq!(table.apply(&state, Move::new(Color::Yellow, Direction::Right)), None);
        assert_eq!(table.apply(&state, Move::new(Color::Yellow, Direction::Top)), None);
        assert_eq!(table.apply(&state, Move::new(Color::Green, Direction::Top)), None);
        assert_eq!(
            table.apply(&state, Move::new(Color::Red, Direction::Right)),
            Some(state.with_robot(Color::Red, Cell::new(0, 3)))
        );
    }
}
