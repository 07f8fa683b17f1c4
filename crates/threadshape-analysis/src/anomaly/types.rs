//! Anomaly detection result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a deviation from the column mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub const ALL: [Polarity; 2] = [Self::Positive, Self::Negative];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One flagged entry of a factor column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub component: usize,
    pub polarity: Polarity,
    /// Row index into the factor matrix (horizon, conversation or feature index).
    pub index: usize,
    pub z_score: f64,
}

/// Mean, population standard deviation and largest magnitude of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub std_dev: f64,
    pub max_abs: f64,
}

impl ColumnStats {
    /// A column is degenerate when its statistics are non-finite or its spread
    /// is negligible relative to its largest entry. The test is scale-free, so
    /// a column of uniformly tiny values still scores.
    pub fn is_degenerate(&self) -> bool {
        !self.mean.is_finite()
            || !self.std_dev.is_finite()
            || !self.max_abs.is_finite()
            || self.std_dev <= 1e-12 * self.max_abs
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Positive and negative outlier rows for one latent component.
///
/// Both index lists are ascending and disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAnomalies {
    pub component: usize,
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
    /// The column had no usable spread; both lists are empty.
    pub degenerate: bool,
}

impl ComponentAnomalies {
    pub fn degenerate(component: usize) -> Self {
        Self {
            component,
            degenerate: true,
            ..Default::default()
        }
    }

    pub fn indices(&self, polarity: Polarity) -> &[usize] {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }

    pub fn flagged_count(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flagged_count() == 0
    }
}
