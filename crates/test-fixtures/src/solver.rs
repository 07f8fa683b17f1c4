//! Reference and misbehaving CP solvers.

use std::cell::Cell;

use threadshape_core::errors::SolverError;
use threadshape_core::traits::{CpSolver, SolverOptions};
use threadshape_core::types::{CpFactors, FactorMatrix, Tensor3};

/// Greedy CP: one higher-order power iteration per component, deflating the
/// residual after each. Exact for rank-one tensors, which is all the tests
/// need. Rejects ranks above the smallest tensor dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerIterationSolver;

impl CpSolver for PowerIterationSolver {
    fn name(&self) -> &str {
        "power-iteration"
    }

    fn decompose(&self, tensor: &Tensor3, rank: usize, options: &SolverOptions) -> Result<CpFactors, SolverError> {
        if rank == 0 {
            return Err(SolverError::InvalidRank { rank });
        }
        if rank > tensor.min_dimension() {
            return Err(SolverError::RankTooLarge {
                rank,
                max: tensor.min_dimension(),
            });
        }

        let [nh, nc, nf] = tensor.shape();
        let mut residual = tensor.clone();
        let mut columns = Vec::with_capacity(rank);
        for _ in 0..rank {
            let (lambda, a, b, c) = rank_one(&residual, options);
            residual = Tensor3::from_fn([nh, nc, nf], |h, ci, f| {
                residual.fiber(h, ci)[f] - lambda * a[h] * b[ci] * c[f]
            });
            columns.push((a.into_iter().map(|v| v * lambda).collect::<Vec<_>>(), b, c));
        }

        Ok(CpFactors::new(
            FactorMatrix::from_fn(nh, rank, |i, r| columns[r].0[i]),
            FactorMatrix::from_fn(nc, rank, |i, r| columns[r].1[i]),
            FactorMatrix::from_fn(nf, rank, |i, r| columns[r].2[i]),
        ))
    }
}

fn rank_one(t: &Tensor3, options: &SolverOptions) -> (f64, Vec<f64>, Vec<f64>, Vec<f64>) {
    let [nh, nc, nf] = t.shape();
    let mut a = vec![0.0; nh];
    let mut b = start_vector(nc);
    let mut c = start_vector(nf);
    let mut lambda = 0.0;

    for _ in 0..options.max_iterations.max(1) {
        for (h, a_h) in a.iter_mut().enumerate() {
            *a_h = (0..nc)
                .map(|ci| b[ci] * dot(t.fiber(h, ci), &c))
                .sum();
        }
        normalize(&mut a);
        for (ci, b_c) in b.iter_mut().enumerate() {
            *b_c = (0..nh).map(|h| a[h] * dot(t.fiber(h, ci), &c)).sum();
        }
        normalize(&mut b);
        let mut next = vec![0.0; nf];
        for h in 0..nh {
            for ci in 0..nc {
                let w = a[h] * b[ci];
                for (n, v) in next.iter_mut().zip(t.fiber(h, ci)) {
                    *n += w * v;
                }
            }
        }
        let next_lambda = normalize(&mut next);
        c = next;
        let converged = (next_lambda - lambda).abs() <= options.tolerance * next_lambda.abs().max(1.0);
        lambda = next_lambda;
        if converged {
            break;
        }
    }
    (lambda, a, b, c)
}

fn start_vector(n: usize) -> Vec<f64> {
    let mut v: Vec<f64> = (0..n).map(|i| 1.0 + 0.1 * i as f64).collect();
    normalize(&mut v);
    v
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// Scale to unit length in place; returns the original norm. Zero vectors are
/// left alone.
fn normalize(v: &mut [f64]) -> f64 {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    norm
}

/// Fails for the listed ranks, delegates the rest.
pub struct FailingSolver<S> {
    pub inner: S,
    pub fail_ranks: Vec<usize>,
}

impl<S: CpSolver> CpSolver for FailingSolver<S> {
    fn name(&self) -> &str {
        "failing"
    }

    fn decompose(&self, tensor: &Tensor3, rank: usize, options: &SolverOptions) -> Result<CpFactors, SolverError> {
        if self.fail_ranks.contains(&rank) {
            return Err(SolverError::Failed {
                rank,
                message: "scripted failure".to_string(),
            });
        }
        self.inner.decompose(tensor, rank, options)
    }
}

/// Returns factors with one row too many in the conversation mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MalformedSolver;

impl CpSolver for MalformedSolver {
    fn name(&self) -> &str {
        "malformed"
    }

    fn decompose(&self, tensor: &Tensor3, rank: usize, _options: &SolverOptions) -> Result<CpFactors, SolverError> {
        let [nh, nc, nf] = tensor.shape();
        Ok(CpFactors::new(
            FactorMatrix::from_element(nh, rank, 1.0),
            FactorMatrix::from_element(nc + 1, rank, 1.0),
            FactorMatrix::from_element(nf, rank, 1.0),
        ))
    }
}

/// Counts calls to the wrapped solver.
pub struct CountingSolver<S> {
    inner: S,
    calls: Cell<usize>,
}

impl<S> CountingSolver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<S: CpSolver> CpSolver for CountingSolver<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn decompose(&self, tensor: &Tensor3, rank: usize, options: &SolverOptions) -> Result<CpFactors, SolverError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.decompose(tensor, rank, options)
    }
}
