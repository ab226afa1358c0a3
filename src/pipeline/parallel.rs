use serde::{Deserialize, Serialize};

/// Controls whether plate measurements of a frame run sequentially or with Rayon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    pub enabled: bool,
    pub min_candidates_for_parallel: usize,
}

impl ParallelOptions {
    pub fn new(enabled: bool, min_candidates_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_candidates_for_parallel: min_candidates_for_parallel.max(1),
        }
    }

    /// Always measure sequentially.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_candidates_for_parallel: usize::MAX,
        }
    }

    /// True when `candidate_count` plates should be measured in parallel.
    pub fn should_parallelize(&self, candidate_count: usize) -> bool {
        cfg!(feature = "parallel")
            && self.enabled
            && candidate_count >= self.min_candidates_for_parallel.max(1)
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_candidates_for_parallel: 4,
        }
    }
}
