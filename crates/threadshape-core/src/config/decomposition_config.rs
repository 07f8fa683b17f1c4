//! Decomposition configuration.

use serde::{Deserialize, Serialize};

use crate::traits::SolverOptions;

/// Configuration for the decomposition orchestrator and solver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Target ranks. Default: [9].
    #[serde(default)]
    pub ranks: Vec<usize>,
    /// Seed for random initialization. Default: none.
    pub seed: Option<u64>,
    /// Initialization method passed to the solver. Default: "svd".
    pub init: Option<String>,
    /// Iteration cap passed to the solver. Default: 100.
    pub max_iterations: Option<usize>,
    /// Convergence tolerance passed to the solver. Default: 1e-8.
    pub tolerance: Option<f64>,
    /// External solver program and arguments.
    #[serde(default)]
    pub solver_command: Vec<String>,
}

impl DecompositionConfig {
    /// Requested ranks, ascending and deduplicated.
    pub fn effective_ranks(&self) -> Vec<usize> {
        let mut ranks = if self.ranks.is_empty() {
            vec![9]
        } else {
            self.ranks.clone()
        };
        ranks.sort_unstable();
        ranks.dedup();
        ranks
    }

    pub fn solver_options(&self) -> SolverOptions {
        let defaults = SolverOptions::default();
        SolverOptions {
            seed: self.seed,
            init: self.init.clone().unwrap_or(defaults.init),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
        }
    }
}
