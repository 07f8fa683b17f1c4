//! Pipeline errors and non-fatal error collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error_code::{self, ThreadshapeErrorCode};
use super::{
    ConfigError, CorpusError, DetectionError, ReportError, SolverError, StorageError,
    TensorError,
};

/// Errors that can occur during pipeline execution.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Tensor error: {0}")]
    Tensor(#[from] TensorError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("All {} requested ranks failed to decompose: {}", failures.len(), describe_failures(failures))]
    AllRanksFailed { failures: Vec<SolverError> },
}

impl ThreadshapeErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Tensor(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Solver(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::AllRanksFailed { .. } => error_code::SOLVER_FAILURE,
        }
    }
}

fn describe_failures(failures: &[SolverError]) -> String {
    failures
        .iter()
        .map(|e| e.display_with_code())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The four independently runnable pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    BuildTensor,
    Decompose,
    Summarize,
    DetailedExamples,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildTensor => "build-tensor",
            Self::Decompose => "decompose",
            Self::Summarize => "summarize",
            Self::DetailedExamples => "detailed-examples",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pipeline error tagged with the stage that raised it.
#[derive(Debug, thiserror::Error)]
#[error("Stage {stage} failed: {error}")]
pub struct StageError {
    pub stage: PipelineStage,
    #[source]
    pub error: PipelineError,
}

impl StageError {
    pub fn new(stage: PipelineStage, error: impl Into<PipelineError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

impl ThreadshapeErrorCode for StageError {
    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

/// Result of a stage that accumulates non-fatal errors.
/// Allows partial results to be returned even when some items fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the stage.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_stage_and_key() {
        let err = StageError::new(
            PipelineStage::Summarize,
            StorageError::NotFound {
                key: "rank-to-factors".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("summarize"));
        assert!(msg.contains("rank-to-factors"));
        assert_eq!(err.error_code(), error_code::ARTIFACT_NOT_FOUND);
    }

    #[test]
    fn all_ranks_failed_lists_every_reason() {
        let err = PipelineError::AllRanksFailed {
            failures: vec![
                SolverError::InvalidRank { rank: 0 },
                SolverError::RankTooLarge { rank: 9, max: 2 },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("All 2 requested ranks failed to decompose: "));
        assert!(msg.contains(&SolverError::InvalidRank { rank: 0 }.display_with_code()));
        assert!(msg.contains(&SolverError::RankTooLarge { rank: 9, max: 2 }.display_with_code()));
    }

    #[test]
    fn pipeline_result_collects_errors() {
        let mut result: PipelineResult<Vec<usize>> = PipelineResult::new(vec![1]);
        assert!(result.is_clean());
        result.add_error(SolverError::RankTooLarge { rank: 9, max: 2 });
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.data, vec![1]);
    }
}
