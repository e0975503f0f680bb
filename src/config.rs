use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};

/// Depth limit per number of helper robots allowed to move (index 0: target robot alone).
pub const DEFAULT_DEPTH_SCHEDULE: [u8; 4] = [32, 16, 10, 7];

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Depth limits for 0, 1, 2, ... helpers. Helper counts past the end are not tried.
    pub depth_schedule: Vec<u8>,
    /// Run the trials of each explore round on the rayon pool.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            depth_schedule: DEFAULT_DEPTH_SCHEDULE.to_vec(),
            parallel: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> PuzzleResult<()> {
        if self.depth_schedule.iter().all(|&d| d == 0) {
            return Err(PuzzleError::EmptySchedule);
        }
        Ok(())
    }

    /// Parses a comma separated schedule such as `20,12,8`.
    pub fn parse_schedule(text: &str) -> PuzzleResult<Vec<u8>> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u8>()
                    .map_err(|e| PuzzleError::Request(format!("depth {s:?}: {e}")))
            })
            .collect()
    }
}
