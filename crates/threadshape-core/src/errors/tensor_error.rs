//! Tensor assembly errors.

use super::error_code::{self, ThreadshapeErrorCode};

/// Errors raised while assembling or decoding the conversation tensor.
/// All of them abort the build: the tensor's shape invariant cannot hold.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    #[error(
        "Snapshot for conversation {conversation_id} at horizon {horizon} has {actual} features, expected {expected}"
    )]
    ShapeMismatch {
        conversation_id: String,
        horizon: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Snapshot for conversation {conversation_id} at horizon {horizon} has unexpected feature {name}"
    )]
    FeatureNameMismatch {
        conversation_id: String,
        horizon: usize,
        name: String,
    },

    #[error("Feature extraction failed for conversation {conversation_id} at horizon {horizon}: {message}")]
    ExtractionFailed {
        conversation_id: String,
        horizon: usize,
        message: String,
    },

    #[error("Corpus contains no conversations")]
    EmptyCorpus,

    #[error("Horizon range {min}..={max} is empty")]
    EmptyHorizonRange { min: usize, max: usize },

    #[error("Tensor data length {actual} does not match shape {shape:?} ({expected} cells)")]
    InvalidShape {
        shape: [usize; 3],
        expected: usize,
        actual: usize,
    },
}

impl ThreadshapeErrorCode for TensorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } | Self::FeatureNameMismatch { .. } => {
                error_code::SHAPE_MISMATCH
            }
            Self::ExtractionFailed { .. } => error_code::EXTRACTION_FAILED,
            _ => error_code::TENSOR_ERROR,
        }
    }
}
