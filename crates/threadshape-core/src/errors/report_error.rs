//! Reporting errors.

use super::error_code::{self, ThreadshapeErrorCode};
use super::{CorpusError, DetectionError};

/// Errors raised while summarizing or reporting on persisted factors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Side table {table} has {actual} entries, factor matrix has {expected} rows")]
    LengthMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No factors persisted for rank {rank}")]
    RankNotAvailable { rank: usize },

    #[error("Flagged index {index} could not be resolved: {source}")]
    ResolutionFailure {
        index: usize,
        #[source]
        source: CorpusError,
    },

    #[error("Flagged index {index} is outside the entity table ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),
}

impl ThreadshapeErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ResolutionFailure { .. } | Self::IndexOutOfRange { .. } => {
                error_code::RESOLUTION_FAILURE
            }
            Self::Detection(e) => e.error_code(),
            _ => error_code::REPORT_ERROR,
        }
    }
}
