//! FeatureExtractor trait.

use crate::errors::TensorError;
use crate::types::{Conversation, FeatureSnapshot};

/// Computes structural features of a conversation's first `horizon` turns.
///
/// Must be deterministic, and produce the same ordered feature names for every
/// conversation and horizon. Missing values are reported as NaN.
pub trait FeatureExtractor {
    fn extract(
        &self,
        conversation: &Conversation,
        horizon: usize,
    ) -> Result<FeatureSnapshot, TensorError>;
}
