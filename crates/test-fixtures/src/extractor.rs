//! Feature extractors that replay known values.

use std::cell::Cell;

use rustc_hash::FxHashMap;
use threadshape_core::errors::TensorError;
use threadshape_core::traits::FeatureExtractor;
use threadshape_core::types::{Conversation, FeatureSnapshot, Tensor3};

/// Serves snapshot (c, h) from slot (h - first_horizon, c, :) of a tensor,
/// where c is the conversation's position in `ids`.
pub struct TensorExtractor {
    tensor: Tensor3,
    ids: FxHashMap<String, usize>,
    feature_names: Vec<String>,
    first_horizon: usize,
    calls: Cell<usize>,
}

impl TensorExtractor {
    pub fn new(tensor: Tensor3, ids: &[String], feature_names: Vec<String>, first_horizon: usize) -> Self {
        assert_eq!(ids.len(), tensor.conversations());
        assert_eq!(feature_names.len(), tensor.features());
        Self {
            tensor,
            ids: ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect(),
            feature_names,
            first_horizon,
            calls: Cell::new(0),
        }
    }

    /// Number of `extract` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FeatureExtractor for TensorExtractor {
    fn extract(&self, conversation: &Conversation, horizon: usize) -> Result<FeatureSnapshot, TensorError> {
        self.calls.set(self.calls.get() + 1);
        let failed = |message: &str| TensorError::ExtractionFailed {
            conversation_id: conversation.id.clone(),
            horizon,
            message: message.to_string(),
        };
        let c = *self.ids.get(&conversation.id).ok_or_else(|| failed("unknown conversation"))?;
        let h = horizon
            .checked_sub(self.first_horizon)
            .filter(|&h| h < self.tensor.horizons())
            .ok_or_else(|| failed("horizon outside fixture range"))?;
        Ok(self
            .feature_names
            .iter()
            .cloned()
            .zip(self.tensor.fiber(h, c).iter().copied())
            .collect())
    }
}

/// Extractor backed by a closure, for one-off edge cases.
pub struct FnExtractor<F>(F);

impl<F> FnExtractor<F>
where
    F: Fn(&Conversation, usize) -> Result<FeatureSnapshot, TensorError>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> FeatureExtractor for FnExtractor<F>
where
    F: Fn(&Conversation, usize) -> Result<FeatureSnapshot, TensorError>,
{
    fn extract(&self, conversation: &Conversation, horizon: usize) -> Result<FeatureSnapshot, TensorError> {
        (self.0)(conversation, horizon)
    }
}
