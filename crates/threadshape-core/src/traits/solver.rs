//! CpSolver trait.

use serde::{Deserialize, Serialize};

use crate::errors::SolverError;
use crate::types::{CpFactors, Tensor3};

/// Options forwarded verbatim to the decomposition solver.
///
/// A fixed `seed` is required for reproducible random initialization; the
/// default `svd` initialization is deterministic on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub seed: Option<u64>,
    pub init: String,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            seed: None,
            init: "svd".to_string(),
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

/// Canonical polyadic (PARAFAC) decomposition solver.
pub trait CpSolver {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Decompose `tensor` into `rank` components, returning the horizon,
    /// conversation and feature factors.
    fn decompose(
        &self,
        tensor: &Tensor3,
        rank: usize,
        options: &SolverOptions,
    ) -> Result<CpFactors, SolverError>;
}
