use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};
use crate::geometry::{Cell, Color, ColorSet, ROBOT_COUNT};

/// Positions of all robots, indexed by color.
///
/// Robots missing from the puzzle sit on `Cell::NONE`; they never move and never
/// block a slide. States are plain values: equality and hashing cover every slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct State {
    slots: [Cell; ROBOT_COUNT],
}

impl State {
    #[inline(always)]
    pub const fn from_slots(slots: [Cell; ROBOT_COUNT]) -> Self {
        State { slots }
    }

    pub fn from_robots<I: IntoIterator<Item = (Color, Cell)>>(robots: I) -> Self {
        let mut slots = [Cell::NONE; ROBOT_COUNT];
        for (color, cell) in robots {
            slots[color.index()] = cell;
        }
        State { slots }
    }

    #[inline(always)]
    pub fn cell(&self, color: Color) -> Cell {
        self.slots[color.index()]
    }

    #[inline(always)]
    pub fn slots(&self) -> &[Cell; ROBOT_COUNT] {
        &self.slots
    }

    /// Copy of this state with `color` moved to `cell`.
    #[inline(always)]
    pub fn with_robot(&self, color: Color, cell: Cell) -> State {
        let mut slots = self.slots;
        slots[color.index()] = cell;
        State { slots }
    }

    #[inline(always)]
    pub fn is_present(&self, color: Color) -> bool {
        !self.cell(color).is_none()
    }

    pub fn present(&self) -> ColorSet {
        Color::ALL.into_iter().filter(|&c| self.is_present(c)).collect()
    }

    /// Robots on the board, in color order.
    pub fn robots(&self) -> impl Iterator<Item = (Color, Cell)> + '_ {
        Color::ALL
            .into_iter()
            .map(|c| (c, self.cell(c)))
            .filter(|(_, cell)| !cell.is_none())
    }

    pub fn color_at(&self, cell: Cell) -> Option<Color> {
        if cell.is_none() {
            return None;
        }
        self.robots().find(|&(_, at)| at == cell).map(|(c, _)| c)
    }

    /// Checks that every robot is on a `size`×`size` board and no two share a cell.
    pub fn validate(&self, size: usize) -> PuzzleResult<()> {
        for (color, cell) in self.robots() {
            if !cell.in_bounds(size) {
                return Err(PuzzleError::CellOutOfBounds {
                    what: format!("{color} robot"),
                    cell,
                });
            }
        }
        for (i, (first, a)) in self.robots().enumerate() {
            if let Some((second, _)) = self.robots().skip(i + 1).find(|&(_, b)| a == b) {
                return Err(PuzzleError::DuplicatePosition {
                    first,
                    second,
                    cell: a,
                });
            }
        }
        Ok(())
    }

    /// Same check as `validate`, for assertions.
    #[inline(always)]
    pub(crate) fn is_well_formed(&self, size: usize) -> bool {
        self.validate(size).is_ok()
    }
}
