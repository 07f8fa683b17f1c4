//! CommandSolver: delegates CP decomposition to an external program.
//!
//! Protocol: one JSON [`SolverRequest`] on the child's stdin, one JSON
//! [`SolverResponse`] on its stdout. Factor matrices travel as lists of rows.
//! There is no timeout; a hung solver hangs the stage.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use threadshape_core::config::DecompositionConfig;
use threadshape_core::errors::SolverError;
use threadshape_core::traits::{CpSolver, SolverOptions};
use threadshape_core::types::{CpFactors, FactorMatrix, Tensor3};

/// Request written to the solver's stdin. `data` is row-major over `shape`.
#[derive(Debug, Serialize)]
pub struct SolverRequest<'a> {
    pub shape: [usize; 3],
    pub data: &'a [f64],
    pub rank: usize,
    pub options: &'a SolverOptions,
}

/// Response read from the solver's stdout: horizon, conversation and feature
/// factors, in that order.
#[derive(Debug, Deserialize)]
pub struct SolverResponse {
    pub factors: Vec<Vec<Vec<f64>>>,
}

/// Runs `program args...` once per rank.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
}

impl CommandSolver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &DecompositionConfig) -> Result<Self, SolverError> {
        match config.solver_command.split_first() {
            Some((program, args)) => Ok(Self::new(program.clone(), args.to_vec())),
            None => Err(SolverError::NotConfigured {
                message: "decomposition.solver_command is empty".to_string(),
            }),
        }
    }

    fn invoke(&self, payload: Vec<u8>, rank: usize) -> Result<Vec<u8>, SolverError> {
        let failed = |message: String| SolverError::Failed { rank, message };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(format!("could not start `{}`: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| failed("solver stdin unavailable".to_string()))?;
        // Written from a separate thread so a solver that streams output before
        // draining its input cannot deadlock against us.
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child
            .wait_with_output()
            .map_err(|e| failed(format!("waiting for solver: {e}")))?;
        let write_result = writer
            .join()
            .map_err(|_| failed("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{}: {}", output.status, stderr.trim())));
        }
        if let Err(e) = write_result {
            return Err(failed(format!("writing request: {e}")));
        }
        Ok(output.stdout)
    }
}

impl CpSolver for CommandSolver {
    fn name(&self) -> &str {
        &self.program
    }

    fn decompose(
        &self,
        tensor: &Tensor3,
        rank: usize,
        options: &SolverOptions,
    ) -> Result<CpFactors, SolverError> {
        let request = SolverRequest {
            shape: tensor.shape(),
            data: tensor.data(),
            rank,
            options,
        };
        let payload = serde_json::to_vec(&request).map_err(|e| SolverError::Failed {
            rank,
            message: format!("encoding request: {e}"),
        })?;
        tracing::debug!(rank, program = %self.program, bytes = payload.len(), "invoking external solver");

        let stdout = self.invoke(payload, rank)?;
        let response: SolverResponse =
            serde_json::from_slice(&stdout).map_err(|e| SolverError::MalformedOutput {
                rank,
                message: format!("invalid response JSON: {e}"),
            })?;
        response.into_factors(rank)
    }
}

impl SolverResponse {
    fn into_factors(self, rank: usize) -> Result<CpFactors, SolverError> {
        let malformed = |message: String| SolverError::MalformedOutput { rank, message };
        let [horizon, conversation, feature]: [Vec<Vec<f64>>; 3] = self
            .factors
            .try_into()
            .map_err(|v: Vec<_>| malformed(format!("expected 3 factor matrices, got {}", v.len())))?;
        Ok(CpFactors::new(
            rows_to_matrix(horizon, rank).map_err(malformed)?,
            rows_to_matrix(conversation, rank).map_err(malformed)?,
            rows_to_matrix(feature, rank).map_err(malformed)?,
        ))
    }
}

/// Build a matrix from a list of equal-length rows. An empty list is a
/// (0, rank) matrix.
fn rows_to_matrix(rows: Vec<Vec<f64>>, rank: usize) -> Result<FactorMatrix, String> {
    let ncols = rows.first().map_or(rank, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(format!(
            "row {bad} has {} columns, expected {ncols}",
            rows[bad].len()
        ));
    }
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(FactorMatrix::from_row_slice(nrows, ncols, &flat))
}
