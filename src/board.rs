use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::{Cell, Direction, Walls, MAX_BOARD_SIZE};
use crate::state::State;

const NO_ROOM: u16 = u16::MAX;

/// Square grid of per-cell wall masks.
///
/// Only `BoardBuilder` creates boards, and it makes every wall two-sided and closes
/// the boundary, so the grid never needs re-checking afterwards.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    size: usize,
    walls: Vec<Walls>,
}

impl Board {
    /// Boundary walls plus the enclosed central block of the physical game.
    pub fn standard(size: usize) -> PuzzleResult<Board> {
        let mut builder = BoardBuilder::new(size)?;
        builder.center_block();
        Ok(builder.build())
    }

    /// Boundary walls only.
    pub fn open(size: usize) -> PuzzleResult<Board> {
        Ok(BoardBuilder::new(size)?.build())
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn walls(&self, cell: Cell) -> Walls {
        self.walls[self.to_idx(cell)]
    }

    #[inline(always)]
    pub fn to_idx(&self, cell: Cell) -> usize {
        cell.row as usize * self.size + cell.col as usize
    }

    #[inline(always)]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.size)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| Cell::new(row as u8, col as u8)))
    }

    /// Labels each cell with the id of its wall-connected region.
    ///
    /// A robot can never leave the region it starts in.
    pub fn rooms(&self) -> Vec<u16> {
        let mut room_ids = vec![NO_ROOM; self.size * self.size];
        let mut current_room_id = 0u16;
        let mut queue = VecDeque::with_capacity(self.size * 2);

        for start in self.cells() {
            let start_idx = self.to_idx(start);
            if room_ids[start_idx] != NO_ROOM {
                continue;
            }
            room_ids[start_idx] = current_room_id;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                for dir in Direction::ALL {
                    if self.walls(current).blocks(dir) {
                        continue;
                    }
                    if let Some(next) = current.step(dir, self.size) {
                        let next_idx = self.to_idx(next);
                        if room_ids[next_idx] == NO_ROOM {
                            room_ids[next_idx] = current_room_id;
                            queue.push_back(next);
                        }
                    }
                }
            }
            current_room_id += 1;
        }

        room_ids
    }

    /// ASCII drawing of the board with robots as capital letters and the target as `*`.
    pub fn render(&self, robots: &State, target: Option<Cell>) -> String {
        let mut out = String::with_capacity((self.size * 4 + 2) * (self.size * 2 + 1));

        for row in 0..self.size {
            for col in 0..self.size {
                let walls = self.walls(Cell::new(row as u8, col as u8));
                out.push('+');
                out.push_str(if walls.blocks(Direction::Top) { "---" } else { "   " });
            }
            out.push_str("+\n");

            for col in 0..self.size {
                let cell = Cell::new(row as u8, col as u8);
                let walls = self.walls(cell);
                out.push(if walls.blocks(Direction::Left) { '|' } else { ' ' });
                let mark = match robots.color_at(cell) {
                    Some(color) => color.letter(),
                    None if target == Some(cell) => '*',
                    None if walls == Walls::ALL => '#',
                    None => ' ',
                };
                let _ = write!(out, " {mark} ");
            }
            let last = self.walls(Cell::new(row as u8, (self.size - 1) as u8));
            out.push(if last.blocks(Direction::Right) { '|' } else { ' ' });
            out.push('\n');
        }

        for col in 0..self.size {
            let walls = self.walls(Cell::new((self.size - 1) as u8, col as u8));
            out.push('+');
            out.push_str(if walls.blocks(Direction::Bottom) { "---" } else { "   " });
        }
        out.push_str("+\n");
        out
    }
}

/// Collects walls and produces a consistent `Board`.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    size: usize,
    walls: Vec<Walls>,
}

impl BoardBuilder {
    pub fn new(size: usize) -> PuzzleResult<Self> {
        if !(2..=MAX_BOARD_SIZE).contains(&size) {
            return Err(PuzzleError::BoardSize(size));
        }
        Ok(BoardBuilder {
            size,
            walls: vec![Walls::NONE; size * size],
        })
    }

    /// Starts from a full grid of raw masks (TOP=8, BOTTOM=4, LEFT=2, RIGHT=1).
    pub fn from_masks(size: usize, rows: &[Vec<u8>]) -> PuzzleResult<Self> {
        let mut builder = BoardBuilder::new(size)?;
        let cols = rows.iter().map(Vec::len).find(|&len| len != size).unwrap_or(size);
        if rows.len() != size || cols != size {
            return Err(PuzzleError::WallGridShape {
                size,
                rows: rows.len(),
                cols,
            });
        }
        for (row, masks) in rows.iter().enumerate() {
            for (col, &mask) in masks.iter().enumerate() {
                builder.walls[row * size + col] |= Walls(mask & Walls::ALL.0);
            }
        }
        Ok(builder)
    }

    /// Adds a wall on `side` of `cell`; the neighbour receives the mirrored flag.
    pub fn wall(&mut self, cell: Cell, side: Direction) -> PuzzleResult<&mut Self> {
        if !cell.in_bounds(self.size) {
            return Err(PuzzleError::CellOutOfBounds {
                what: format!("{side} wall"),
                cell,
            });
        }
        self.set(cell, side);
        Ok(self)
    }

    /// Encloses the central 2×2 block (the centre cell on odd sizes).
    pub fn center_block(&mut self) -> &mut Self {
        let (lo, hi) = if self.size % 2 == 0 {
            (self.size / 2 - 1, self.size / 2)
        } else {
            (self.size / 2, self.size / 2)
        };
        for row in lo..=hi {
            for col in lo..=hi {
                for dir in Direction::ALL {
                    self.set(Cell::new(row as u8, col as u8), dir);
                }
            }
        }
        self
    }

    pub fn build(mut self) -> Board {
        let size = self.size;
        let last = (size - 1) as u8;

        // Fill external walls
        for i in 0..size as u8 {
            self.walls[i as usize] |= Walls::TOP;
            self.walls[last as usize * size + i as usize] |= Walls::BOTTOM;
            self.walls[i as usize * size] |= Walls::LEFT;
            self.walls[i as usize * size + last as usize] |= Walls::RIGHT;
        }

        // Mirror every interior wall onto its neighbour
        for row in 0..size {
            for col in 0..size {
                let cell = Cell::new(row as u8, col as u8);
                let walls = self.walls[row * size + col];
                for dir in Direction::ALL {
                    if walls.blocks(dir) {
                        self.set(cell, dir);
                    }
                }
            }
        }

        Board {
            size,
            walls: self.walls,
        }
    }

    fn set(&mut self, cell: Cell, side: Direction) {
        let idx = cell.row as usize * self.size + cell.col as usize;
        self.walls[idx] |= side.wall();
        if let Some(next) = cell.step(side, self.size) {
            let next_idx = next.row as usize * self.size + next.col as usize;
            self.walls[next_idx] |= side.opposite().wall();
        }
    }
}

/// Whether a robot standing on `from` can ever stop on `target`.
pub(crate) fn same_room(board: &Board, from: Cell, target: Cell) -> bool {
    let rooms = board.rooms();
    rooms[board.to_idx(from)] == rooms[board.to_idx(target)]
}
