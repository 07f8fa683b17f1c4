//! Decomposition solver errors.

use super::error_code::{self, ThreadshapeErrorCode};

/// Failures producing CP factors for one rank. Fatal for that rank only.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Rank {rank} is not a valid decomposition rank")]
    InvalidRank { rank: usize },

    #[error("Rank {rank} exceeds the smallest tensor dimension ({max})")]
    RankTooLarge { rank: usize, max: usize },

    #[error("Solver failed at rank {rank}: {message}")]
    Failed { rank: usize, message: String },

    #[error("Solver returned malformed factors at rank {rank}: {message}")]
    MalformedOutput { rank: usize, message: String },

    #[error("Solver is not configured: {message}")]
    NotConfigured { message: String },
}

impl SolverError {
    /// The rank this failure belongs to, when it is rank-specific.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Self::InvalidRank { rank }
            | Self::RankTooLarge { rank, .. }
            | Self::Failed { rank, .. }
            | Self::MalformedOutput { rank, .. } => Some(*rank),
            Self::NotConfigured { .. } => None,
        }
    }
}

impl ThreadshapeErrorCode for SolverError {
    fn error_code(&self) -> &'static str {
        error_code::SOLVER_FAILURE
    }
}
