//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::search::SearchError;

/// Which backpropagation strategy a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// UCT descent with leaf-to-root accumulation after every rollout.
    #[default]
    Incremental,
    /// One random root-to-leaf path per iteration, then a full recomputation
    /// of every node's statistics from the terminal leaves.
    Recompute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Iterations per decision.
    pub iterations: u32,
    /// Plies below the root after which an iteration stops and scores 0.
    pub max_depth: usize,
    /// UCT exploration constant.
    pub exploration: f64,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            max_depth: 50,
            exploration: std::f64::consts::SQRT_2,
            mode: SearchMode::Incremental,
        }
    }
}

impl SearchConfig {
    /// Parses a RON document; omitted fields keep their defaults.
    pub fn from_ron(src: &str) -> Result<Self, SearchError> {
        Ok(ron::from_str(src)?)
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}
