use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of robot colors on the board.
pub const ROBOT_COUNT: usize = 4;

/// Largest supported board side. Coordinates are `u8` and `u8::MAX` is reserved for
/// `Cell::NONE`.
pub const MAX_BOARD_SIZE: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[repr(C)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    /// Slot of a robot that is not on the board.
    pub const NONE: Cell = Cell {
        row: u8::MAX,
        col: u8::MAX,
    };

    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        Cell { row, col }
    }

    #[inline(always)]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline(always)]
    pub fn in_bounds(self, size: usize) -> bool {
        (self.row as usize) < size && (self.col as usize) < size
    }

    /// The adjacent cell in `dir`, if it stays on a `size`×`size` board.
    pub fn step(self, dir: Direction, size: usize) -> Option<Cell> {
        let (drow, dcol) = dir.offset();
        let row = self.row as i16 + drow as i16;
        let col = self.col as i16 + dcol as i16;
        if row < 0 || col < 0 || row as usize >= size || col as usize >= size {
            return None;
        }
        Some(Cell::new(row as u8, col as u8))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "(none)")
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

/// Slide direction. The order of `ALL` is the move generation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    #[inline(always)]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The wall flag that stops a slide in this direction.
    #[inline(always)]
    pub const fn wall(self) -> Walls {
        match self {
            Direction::Top => Walls::TOP,
            Direction::Bottom => Walls::BOTTOM,
            Direction::Left => Walls::LEFT,
            Direction::Right => Walls::RIGHT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Robot color. The discriminant is the robot's slot in a `State`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Yellow,
    Green,
    Red,
}

impl Color {
    pub const ALL: [Color; ROBOT_COUNT] = [Color::Blue, Color::Yellow, Color::Green, Color::Red];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Red => "red",
        }
    }

    /// Single letter used by the board renderer.
    pub const fn letter(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Red => 'R',
        }
    }

    /// Looks a color up by the first letter of `word`, ignoring case.
    pub fn from_initial(word: &str) -> Option<Color> {
        let first = word.chars().next()?.to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.letter().to_ascii_lowercase() == first)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of colors, iterated in `Color::ALL` order. Serialized as a list of names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);
    pub const ALL: ColorSet = ColorSet((1 << ROBOT_COUNT) - 1);

    #[inline(always)]
    pub const fn single(color: Color) -> Self {
        ColorSet(1 << color.index())
    }

    #[inline(always)]
    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << color.index();
    }

    #[inline(always)]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & (1 << color.index()) != 0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::EMPTY;
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl From<Vec<Color>> for ColorSet {
    fn from(colors: Vec<Color>) -> Self {
        colors.into_iter().collect()
    }
}

impl From<ColorSet> for Vec<Color> {
    fn from(set: ColorSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, color) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{color}")?;
        }
        f.write_str("}")
    }
}

/// Wall bitmask of a single cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Walls(pub u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const TOP: Walls = Walls(0b1000);
    pub const BOTTOM: Walls = Walls(0b0100);
    pub const LEFT: Walls = Walls(0b0010);
    pub const RIGHT: Walls = Walls(0b0001);
    pub const ALL: Walls = Walls(0b1111);

    #[inline(always)]
    pub const fn contains(self, other: Walls) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub const fn blocks(self, dir: Direction) -> bool {
        self.contains(dir.wall())
    }

    #[inline(always)]
    pub const fn union(self, other: Walls) -> Walls {
        Walls(self.0 | other.0)
    }
}

impl std::ops::BitOr for Walls {
    type Output = Walls;

    #[inline(always)]
    fn bitor(self, rhs: Walls) -> Walls {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Walls {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Walls) {
        self.0 |= rhs.0;
    }
}

/// One slide of one robot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move {
    pub color: Color,
    pub direction: Direction,
}

impl Move {
    #[inline(always)]
    pub const fn new(color: Color, direction: Direction) -> Self {
        Move { color, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.direction)
    }
}
