//! Bounded breadth-first search over robot states.
//!
//! Every discovered state lives once in an arena together with the link to the state
//! it was first reached from. The hash index maps full `State` values to arena slots,
//! so two states only share a slot when they are equal.

use std::fmt;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::{Cell, Color, ColorSet, Direction, Move};
use crate::slide::SlideTable;
use crate::state::State;

pub type Moves = SmallVec<[Move; 16]>;

/// Ordered list of slides. Empty when the target robot already stands on the target.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    moves: Moves,
}

impl Path {
    pub fn new(moves: Moves) -> Self {
        Path { moves }
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Replays the moves from `start`, returning `start` followed by the state after
    /// each move.
    ///
    /// Panics if a move does not change the position: such a path cannot come out of
    /// the search.
    pub fn replay(&self, table: &SlideTable, start: &State) -> Vec<State> {
        let mut states = Vec::with_capacity(self.len() + 1);
        let mut current = *start;
        states.push(current);
        for (step, &mv) in self.moves.iter().enumerate() {
            current = match table.apply(&current, mv) {
                Some(next) => next,
                None => panic!("move {} ({mv}) does not change the position", step + 1),
            };
            states.push(current);
        }
        states
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

/// Counters accumulated over one or more searches.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct SearchStats {
    pub trials: u64,
    pub expanded: u64,
    pub discovered: u64,
    pub deepest: u32,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.trials += other.trials;
        self.expanded += other.expanded;
        self.discovered += other.discovered;
        self.deepest = self.deepest.max(other.deepest);
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trials, {} states expanded, {} discovered, depth {}",
            self.trials, self.expanded, self.discovered, self.deepest
        )
    }
}

/// Parameters of a single bounded search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Query {
    pub start: State,
    pub color: Color,
    pub target: Cell,
    pub movable: ColorSet,
    pub max_depth: u32,
}

const ROOT: u32 = 0;

struct Node {
    state: State,
    parent: u32,
    // `None` only for the root
    mv: Option<Move>,
}

struct Arena {
    nodes: Vec<Node>,
    index: FxHashMap<State, u32>,
}

impl Arena {
    fn new(start: State) -> Self {
        let mut index = FxHashMap::with_capacity_and_hasher(1024, Default::default());
        index.insert(start, ROOT);
        Arena {
            nodes: vec![Node {
                state: start,
                parent: ROOT,
                mv: None,
            }],
            index,
        }
    }

    /// Records `state` as reached from `parent` by `mv` unless it was seen before.
    #[inline(always)]
    fn discover(&mut self, state: State, parent: u32, mv: Move) -> Option<u32> {
        use std::collections::hash_map::Entry;

        match self.index.entry(state) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let id = u32::try_from(self.nodes.len())
                    .unwrap_or_else(|_| panic!("more than {} states discovered", u32::MAX));
                slot.insert(id);
                self.nodes.push(Node {
                    state,
                    parent,
                    mv: Some(mv),
                });
                Some(id)
            }
        }
    }

    /// Walks parent links back to the root.
    fn reconstruct(&self, mut id: u32) -> Path {
        let mut moves = Moves::new();
        let mut node = &self.nodes[id as usize];
        while let Some(mv) = node.mv {
            moves.push(mv);
            id = node.parent;
            node = &self.nodes[id as usize];
        }
        assert_eq!(id, ROOT, "parent chain ended at a non-root state");
        moves.reverse();
        Path::new(moves)
    }
}

/// Shortest path (in slides) that brings `query.color` onto `query.target`, moving
/// only robots in `query.movable` and using at most `query.max_depth` slides.
///
/// `Some` with an empty path means the robot is already on the target; `None` means no
/// path exists within the depth limit.
///
/// # Panics
///
/// If `query.start` has a robot off the board or two robots on one cell. Callers
/// check untrusted input with `State::validate` first.
pub fn search(table: &SlideTable, query: &Query, stats: &mut SearchStats) -> Option<Path> {
    assert!(
        query.start.is_well_formed(table.size()),
        "invalid start state {:?}",
        query.start
    );
    stats.trials += 1;

    if query.start.cell(query.color) == query.target {
        return Some(Path::default());
    }

    let movable: ColorSet = query
        .movable
        .iter()
        .filter(|&c| query.start.is_present(c))
        .collect();

    let mut arena = Arena::new(query.start);
    let mut frontier: Vec<u32> = vec![ROOT];
    let mut next_frontier: Vec<u32> = Vec::new();

    for depth in 0..query.max_depth {
        debug!(
            "depth {depth}: frontier {}, discovered {}",
            frontier.len(),
            arena.nodes.len()
        );
        stats.deepest = stats.deepest.max(depth + 1);

        for &id in &frontier {
            let state = arena.nodes[id as usize].state;
            stats.expanded += 1;

            for color in movable.iter() {
                let src = state.cell(color);
                for direction in Direction::ALL {
                    let dst = table.slide(&state, color, direction);
                    if dst == src {
                        continue;
                    }
                    let next = state.with_robot(color, dst);
                    debug_assert!(
                        next.is_well_formed(table.size()),
                        "slide produced an invalid state {next:?}"
                    );

                    let Some(next_id) = arena.discover(next, id, Move::new(color, direction))
                    else {
                        continue;
                    };
                    if color == query.color && dst == query.target {
                        stats.discovered += arena.nodes.len() as u64 - 1;
                        return Some(arena.reconstruct(next_id));
                    }
                    next_frontier.push(next_id);
                }
            }
        }

        if next_frontier.is_empty() {
            break;
        }
        std::mem::swap(&mut frontier, &mut next_frontier);
        next_frontier.clear();
    }

    stats.discovered += arena.nodes.len() as u64 - 1;
    None
}
