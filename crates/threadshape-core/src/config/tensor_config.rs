//! Tensor assembly configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Configuration for the feature-matrix builder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TensorConfig {
    /// Smallest observation horizon (inclusive). Default: 3.
    pub horizon_min: Option<usize>,
    /// Largest observation horizon (inclusive). Default: 20.
    pub horizon_max: Option<usize>,
    /// Required feature count per snapshot. Default: taken from the first snapshot.
    pub feature_count: Option<usize>,
    /// Value written over missing cells before decomposition. Default: -1.0.
    pub impute_value: Option<f64>,
}

impl TensorConfig {
    pub fn effective_horizon_min(&self) -> usize {
        self.horizon_min.unwrap_or(3)
    }

    pub fn effective_horizon_max(&self) -> usize {
        self.horizon_max.unwrap_or(20)
    }

    pub fn horizons(&self) -> RangeInclusive<usize> {
        self.effective_horizon_min()..=self.effective_horizon_max()
    }

    pub fn effective_impute_value(&self) -> f64 {
        self.impute_value.unwrap_or(-1.0)
    }
}
