//! Anomaly detection errors.

use super::error_code::{self, ThreadshapeErrorCode};

/// Errors that can occur while standardizing a factor column.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Component {component} has zero variance; z-scores are undefined")]
    DegenerateColumn { component: usize },

    #[error("Component {component} out of range for rank {rank}")]
    ComponentOutOfRange { component: usize, rank: usize },

    #[error("Threshold must be a positive finite number, got {threshold}")]
    InvalidThreshold { threshold: f64 },
}

impl ThreadshapeErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DegenerateColumn { .. } => error_code::DEGENERATE_COLUMN,
            _ => error_code::DETECTION_ERROR,
        }
    }
}
