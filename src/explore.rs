//! Explore policy: bounded searches with growing sets of helper robots.
//!
//! Round `k` lets the target robot plus every `k`-subset of the other robots move,
//! with the depth limit `schedule[k]`. More helpers mean a larger branching factor, so
//! the schedule shrinks as `k` grows. The best path found so far caps the depth of
//! every later trial.

use std::sync::atomic::{AtomicU32, Ordering};

use arrayvec::ArrayVec;
use itertools::Itertools;
use log::{info, trace};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::geometry::{Cell, Color, ColorSet, ROBOT_COUNT};
use crate::search::{search, Path, Query, SearchStats};
use crate::slide::SlideTable;
use crate::state::State;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Exploration {
    pub path: Option<Path>,
    /// Robots allowed to move in the trial that produced `path`.
    pub movable: ColorSet,
    pub stats: SearchStats,
}

#[derive(Clone, Copy)]
struct Trial {
    order: usize,
    movable: ColorSet,
    depth: u8,
}

/// Runs the explore policy for `color` towards `target`.
///
/// Sequential and parallel runs return the same path: the shortest one, ties going to
/// the trial that comes first in round and subset order.
///
/// # Panics
///
/// If `start` is not a valid placement on the table's board or has no `color` robot.
pub fn explore(
    table: &SlideTable,
    start: &State,
    color: Color,
    target: Cell,
    config: &SolverConfig,
) -> Exploration {
    assert!(start.is_well_formed(table.size()), "invalid start state {start:?}");
    assert!(start.is_present(color), "{color} robot is not on the board");

    if start.cell(color) == target {
        return Exploration {
            path: Some(Path::default()),
            movable: ColorSet::EMPTY,
            stats: SearchStats::default(),
        };
    }

    let helpers: ArrayVec<Color, ROBOT_COUNT> = start
        .robots()
        .map(|(c, _)| c)
        .filter(|&c| c != color)
        .collect();

    let mut order = 0usize;
    let rounds: Vec<Vec<Trial>> = config
        .depth_schedule
        .iter()
        .take(helpers.len() + 1)
        .enumerate()
        .map(|(k, &depth)| {
            helpers
                .iter()
                .copied()
                .combinations(k)
                .map(|subset| {
                    let mut movable: ColorSet = subset.into_iter().collect();
                    movable.insert(color);
                    order += 1;
                    Trial {
                        order,
                        movable,
                        depth,
                    }
                })
                .collect()
        })
        .collect();

    info!(
        "exploring {color} -> {target}: {} helpers, {} trials",
        helpers.len(),
        rounds.iter().map(Vec::len).sum::<usize>()
    );

    let exploration = if config.parallel {
        explore_parallel(table, start, color, target, &rounds)
    } else {
        explore_sequential(table, start, color, target, &rounds)
    };

    match &exploration.path {
        Some(path) => info!(
            "best path for {color}: {} moves with {} ({})",
            path.len(),
            exploration.movable,
            exploration.stats
        ),
        None => info!("no path for {color} within the schedule ({})", exploration.stats),
    }
    exploration
}

fn explore_sequential(
    table: &SlideTable,
    start: &State,
    color: Color,
    target: Cell,
    rounds: &[Vec<Trial>],
) -> Exploration {
    let mut best: Option<(Path, ColorSet)> = None;
    let mut stats = SearchStats::default();

    for (k, round) in rounds.iter().enumerate() {
        for trial in round {
            // Only strictly shorter paths can improve on the incumbent
            let cap = best.as_ref().map_or(u32::MAX, |(p, _)| p.len() as u32 - 1);
            let max_depth = u32::from(trial.depth).min(cap);
            if max_depth == 0 {
                continue;
            }

            trace!("trial {}: {} up to depth {max_depth}", trial.order, trial.movable);
            let query = Query {
                start: *start,
                color,
                target,
                movable: trial.movable,
                max_depth,
            };
            if let Some(path) = search(table, &query, &mut stats) {
                debug_assert!(path.len() as u32 <= max_depth);
                best = Some((path, trial.movable));
            }
        }
        info!(
            "round {k} done: best {:?}",
            best.as_ref().map(|(p, _)| p.len())
        );
    }

    let (path, movable) = match best {
        Some((path, movable)) => (Some(path), movable),
        None => (None, ColorSet::EMPTY),
    };
    Exploration {
        path,
        movable,
        stats,
    }
}

/// Best path shared between worker threads.
struct Incumbent {
    bound: AtomicU32,
    best: Mutex<Option<(usize, Path, ColorSet)>>,
}

impl Incumbent {
    fn new() -> Self {
        Incumbent {
            bound: AtomicU32::new(u32::MAX),
            best: Mutex::new(None),
        }
    }

    #[inline]
    fn bound(&self) -> u32 {
        self.bound.load(Ordering::Relaxed)
    }

    /// Installs the candidate if it is shorter, or as long but from an earlier trial.
    fn offer(&self, order: usize, path: Path, movable: ColorSet) {
        let mut best = self.best.lock();
        let better = match best.as_ref() {
            None => true,
            Some((best_order, best_path, _)) => {
                (path.len(), order) < (best_path.len(), *best_order)
            }
        };
        if better {
            self.bound.store(path.len() as u32, Ordering::Relaxed);
            *best = Some((order, path, movable));
        }
    }
}

fn explore_parallel(
    table: &SlideTable,
    start: &State,
    color: Color,
    target: Cell,
    rounds: &[Vec<Trial>],
) -> Exploration {
    let incumbent = Incumbent::new();
    let mut stats = SearchStats::default();

    for (k, round) in rounds.iter().enumerate() {
        let round_stats = round
            .par_iter()
            .map(|trial| {
                let mut stats = SearchStats::default();
                // Equal lengths stay searchable so the earliest trial can still win a tie
                let max_depth = u32::from(trial.depth).min(incumbent.bound());
                if max_depth == 0 {
                    return stats;
                }

                trace!("trial {}: {} up to depth {max_depth}", trial.order, trial.movable);
                let query = Query {
                    start: *start,
                    color,
                    target,
                    movable: trial.movable,
                    max_depth,
                };
                if let Some(path) = search(table, &query, &mut stats) {
                    incumbent.offer(trial.order, path, trial.movable);
                }
                stats
            })
            .reduce(SearchStats::default, |mut acc, s| {
                acc.merge(&s);
                acc
            });
        stats.merge(&round_stats);

        let bound = incumbent.bound();
        info!(
            "round {k} done: best {:?}",
            (bound != u32::MAX).then_some(bound)
        );
    }

    let (path, movable) = match incumbent.best.into_inner() {
        Some((_, path, movable)) => (Some(path), movable),
        None => (None, ColorSet::EMPTY),
    };
    Exploration {
        path,
        movable,
        stats,
    }
}
