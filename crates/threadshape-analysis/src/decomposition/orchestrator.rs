//! DecompositionOrchestrator: one solver call per requested rank.

use std::time::Instant;

use threadshape_core::config::DecompositionConfig;
use threadshape_core::errors::SolverError;
use threadshape_core::traits::{CpSolver, SolverOptions};
use threadshape_core::types::{CpFactors, RankToFactors, Tensor3, TensorMode};

/// Factors for every rank that succeeded, plus the failures of those that did not.
#[derive(Debug, Default)]
pub struct DecompositionOutcome {
    pub factors: RankToFactors,
    pub failures: Vec<SolverError>,
}

impl DecompositionOutcome {
    pub fn all_failed(&self) -> bool {
        self.factors.is_empty()
    }
}

pub struct DecompositionOrchestrator<'a> {
    solver: &'a dyn CpSolver,
    ranks: Vec<usize>,
    options: SolverOptions,
}

impl<'a> DecompositionOrchestrator<'a> {
    pub fn new(solver: &'a dyn CpSolver, ranks: Vec<usize>, options: SolverOptions) -> Self {
        let mut ranks = ranks;
        ranks.sort_unstable();
        ranks.dedup();
        Self {
            solver,
            ranks,
            options,
        }
    }

    pub fn from_config(solver: &'a dyn CpSolver, config: &DecompositionConfig) -> Self {
        Self::new(solver, config.effective_ranks(), config.solver_options())
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Decompose `tensor` at every configured rank, ascending. A failing rank
    /// is recorded and does not stop the others. No retries.
    pub fn run(&self, tensor: &Tensor3) -> DecompositionOutcome {
        let mut outcome = DecompositionOutcome::default();
        for &rank in &self.ranks {
            let started = Instant::now();
            match self.decompose_rank(tensor, rank) {
                Ok(factors) => {
                    tracing::info!(
                        rank,
                        solver = self.solver.name(),
                        duration_ms = started.elapsed().as_millis() as u64,
                        "decomposition succeeded"
                    );
                    outcome.factors.insert(rank, factors);
                }
                Err(err) => {
                    tracing::warn!(rank, solver = self.solver.name(), error = %err, "decomposition failed");
                    outcome.failures.push(err);
                }
            }
        }
        outcome
    }

    /// Invoke the solver once and check the shape contract of its output.
    pub fn decompose_rank(&self, tensor: &Tensor3, rank: usize) -> Result<CpFactors, SolverError> {
        if rank == 0 {
            return Err(SolverError::InvalidRank { rank });
        }
        let factors = self.solver.decompose(tensor, rank, &self.options)?;
        factors
            .check_shape(tensor.shape(), rank)
            .map_err(|message| SolverError::MalformedOutput { rank, message })?;
        for mode in TensorMode::ALL {
            if factors.factor(mode).iter().any(|v| !v.is_finite()) {
                return Err(SolverError::MalformedOutput {
                    rank,
                    message: format!("{mode} factor contains non-finite values"),
                });
            }
        }
        Ok(factors)
    }
}
