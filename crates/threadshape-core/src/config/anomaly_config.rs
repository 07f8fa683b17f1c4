//! Anomaly detection configuration.

use serde::{Deserialize, Serialize};

/// What to do with a factor column whose standard deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// No entry is anomalous; the result is marked degenerate.
    #[default]
    Empty,
    /// Raise `DetectionError::DegenerateColumn`.
    Fail,
}

/// Configuration for the anomaly detector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Symmetric z-score threshold. Default: 1.5.
    pub threshold: Option<f64>,
    /// Zero-variance column policy. Default: empty.
    pub degenerate_policy: Option<DegeneratePolicy>,
}

impl AnomalyConfig {
    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(1.5)
    }

    pub fn effective_degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy.unwrap_or_default()
    }
}
