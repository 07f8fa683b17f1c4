//! FeatureMatrixBuilder: one extractor call per (conversation, horizon).
//!
//! Conversations are visited in corpus enumeration order and horizons in
//! ascending order. The first snapshot fixes the feature-name order; every
//! later snapshot is written by name into that order.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use threadshape_core::config::TensorConfig;
use threadshape_core::errors::{PipelineError, TensorError};
use threadshape_core::traits::{CorpusStore, FeatureExtractor};
use threadshape_core::types::collections::FxHashMap;
use threadshape_core::types::{FeatureSnapshot, Tensor3};

/// Everything the tensor stage produces, in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorBuild {
    pub tensor: Tensor3,
    pub feature_names: Vec<String>,
    pub entity_ids: Vec<String>,
    pub group_labels: Vec<String>,
    pub horizons: Vec<usize>,
    /// Cells that held a missing value and were overwritten with the imputation constant.
    pub imputed_cells: usize,
}

/// Assembles the (horizon, conversation, feature) tensor.
pub struct FeatureMatrixBuilder<'a> {
    extractor: &'a dyn FeatureExtractor,
    horizons: Vec<usize>,
    horizon_bounds: (usize, usize),
    feature_count: Option<usize>,
    impute_value: f64,
}

impl<'a> FeatureMatrixBuilder<'a> {
    pub fn new(extractor: &'a dyn FeatureExtractor, config: &TensorConfig) -> Self {
        Self {
            extractor,
            horizons: config.horizons().collect(),
            horizon_bounds: (config.effective_horizon_min(), config.effective_horizon_max()),
            feature_count: config.feature_count,
            impute_value: config.effective_impute_value(),
        }
    }

    pub fn horizons(&self) -> &[usize] {
        &self.horizons
    }

    /// Build the tensor over every conversation of `corpus`.
    ///
    /// Any shape or name disagreement aborts the whole build; nothing partial
    /// is returned.
    pub fn build(&self, corpus: &dyn CorpusStore) -> Result<TensorBuild, PipelineError> {
        let started = Instant::now();
        let ids = corpus.conversation_ids()?;
        if ids.is_empty() {
            return Err(TensorError::EmptyCorpus.into());
        }
        let (first_horizon, num_horizons) = match self.horizons.first() {
            Some(&h) => (h, self.horizons.len()),
            None => {
                let (min, max) = self.horizon_bounds;
                return Err(TensorError::EmptyHorizonRange { min, max }.into());
            }
        };

        let first_convo = corpus.conversation(&ids[0])?;
        let first_snapshot = self.extractor.extract(&first_convo, first_horizon)?;
        let layout = FeatureLayout::establish(&first_snapshot, self.feature_count, &first_convo.id, first_horizon)?;

        tracing::info!(
            conversations = ids.len(),
            horizons = num_horizons,
            features = layout.len(),
            "assembling feature tensor"
        );

        let mut tensor = Tensor3::zeros([num_horizons, ids.len(), layout.len()]);
        let mut group_labels = Vec::with_capacity(ids.len());
        let mut pending_convo = Some(first_convo);
        let mut pending_snapshot = Some(first_snapshot);

        for (c, id) in ids.iter().enumerate() {
            let convo = match pending_convo.take() {
                Some(convo) => convo,
                None => corpus.conversation(id)?,
            };
            for (h, &horizon) in self.horizons.iter().enumerate() {
                let snapshot = match pending_snapshot.take() {
                    Some(snapshot) => snapshot,
                    None => self.extractor.extract(&convo, horizon)?,
                };
                layout.write(&snapshot, tensor.fiber_mut(h, c), &convo.id, horizon)?;
            }
            tracing::trace!(conversation = %convo.id, index = c, "conversation assembled");
            group_labels.push(convo.group);
        }

        let imputed_cells = tensor.impute_missing(self.impute_value);
        tracing::info!(
            shape = ?tensor.shape(),
            imputed_cells,
            impute_value = self.impute_value,
            duration_ms = started.elapsed().as_millis() as u64,
            "feature tensor assembled"
        );

        Ok(TensorBuild {
            tensor,
            feature_names: layout.names,
            entity_ids: ids,
            group_labels,
            horizons: self.horizons.clone(),
            imputed_cells,
        })
    }
}

/// The fixed feature-name order and a name -> slot index.
struct FeatureLayout {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl FeatureLayout {
    fn establish(
        snapshot: &FeatureSnapshot,
        feature_count: Option<usize>,
        conversation_id: &str,
        horizon: usize,
    ) -> Result<Self, TensorError> {
        if let Some(expected) = feature_count {
            if snapshot.len() != expected {
                return Err(TensorError::ShapeMismatch {
                    conversation_id: conversation_id.to_string(),
                    horizon,
                    expected,
                    actual: snapshot.len(),
                });
            }
        }
        let names: Vec<String> = snapshot.names().map(str::to_string).collect();
        let mut index = FxHashMap::default();
        for (slot, name) in names.iter().enumerate() {
            if index.insert(name.clone(), slot).is_some() {
                return Err(TensorError::FeatureNameMismatch {
                    conversation_id: conversation_id.to_string(),
                    horizon,
                    name: name.clone(),
                });
            }
        }
        Ok(Self { names, index })
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    /// Write `snapshot` into `fiber` in layout order.
    fn write(
        &self,
        snapshot: &FeatureSnapshot,
        fiber: &mut [f64],
        conversation_id: &str,
        horizon: usize,
    ) -> Result<(), TensorError> {
        if snapshot.len() != self.names.len() {
            return Err(TensorError::ShapeMismatch {
                conversation_id: conversation_id.to_string(),
                horizon,
                expected: self.names.len(),
                actual: snapshot.len(),
            });
        }

        if snapshot.names().eq(self.names.iter().map(String::as_str)) {
            for (cell, (_, value)) in fiber.iter_mut().zip(snapshot.iter()) {
                *cell = value;
            }
            return Ok(());
        }

        let mut written = vec![false; self.names.len()];
        for (name, value) in snapshot.iter() {
            let slot = match self.index.get(name) {
                Some(&slot) if !written[slot] => slot,
                _ => {
                    return Err(TensorError::FeatureNameMismatch {
                        conversation_id: conversation_id.to_string(),
                        horizon,
                        name: name.to_string(),
                    })
                }
            };
            fiber[slot] = value;
            written[slot] = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, f64)]) -> FeatureSnapshot {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn layout_reorders_by_name() {
        let layout = FeatureLayout::establish(&snap(&[("a", 1.0), ("b", 2.0)]), None, "c", 3).unwrap();
        let mut fiber = [0.0; 2];
        layout.write(&snap(&[("b", 20.0), ("a", 10.0)]), &mut fiber, "c", 3).unwrap();
        assert_eq!(fiber, [10.0, 20.0]);
    }

    #[test]
    fn layout_rejects_unknown_and_repeated_names() {
        let layout = FeatureLayout::establish(&snap(&[("a", 1.0), ("b", 2.0)]), None, "c", 3).unwrap();
        let mut fiber = [0.0; 2];
        assert!(matches!(
            layout.write(&snap(&[("a", 1.0), ("z", 2.0)]), &mut fiber, "c", 3),
            Err(TensorError::FeatureNameMismatch { .. })
        ));
        assert!(matches!(
            layout.write(&snap(&[("b", 1.0), ("b", 2.0)]), &mut fiber, "c", 3),
            Err(TensorError::FeatureNameMismatch { .. })
        ));
    }

    #[test]
    fn configured_count_is_enforced_on_first_snapshot() {
        let err = FeatureLayout::establish(&snap(&[("a", 1.0)]), Some(2), "c", 3).err().unwrap();
        assert!(matches!(err, TensorError::ShapeMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn duplicate_names_in_first_snapshot_are_rejected() {
        let err = FeatureLayout::establish(&snap(&[("a", 1.0), ("a", 2.0)]), None, "c", 3).err().unwrap();
        assert!(matches!(err, TensorError::FeatureNameMismatch { .. }));
    }
}
