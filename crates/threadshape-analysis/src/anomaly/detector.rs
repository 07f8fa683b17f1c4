//! AnomalyDetector: symmetric z-score thresholding per latent component.

use threadshape_core::config::{AnomalyConfig, DegeneratePolicy};
use threadshape_core::errors::DetectionError;
use threadshape_core::types::FactorMatrix;

use super::types::{AnomalyRecord, ColumnStats, ComponentAnomalies, Polarity};
use super::zscore;

/// Flags factor rows whose z-score exceeds `threshold` in either direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    threshold: f64,
    policy: DegeneratePolicy,
}

impl AnomalyDetector {
    pub fn new(threshold: f64, policy: DegeneratePolicy) -> Result<Self, DetectionError> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(DetectionError::InvalidThreshold { threshold });
        }
        Ok(Self { threshold, policy })
    }

    pub fn from_config(config: &AnomalyConfig) -> Result<Self, DetectionError> {
        Self::new(
            config.effective_threshold(),
            config.effective_degenerate_policy(),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// Positive (z > threshold) and negative (z < -threshold) rows of column
    /// `component`.
    pub fn detect(
        &self,
        matrix: &FactorMatrix,
        component: usize,
    ) -> Result<ComponentAnomalies, DetectionError> {
        let Some((_, scores)) = self.scores(matrix, component)? else {
            return Ok(ComponentAnomalies::degenerate(component));
        };

        let mut anomalies = ComponentAnomalies {
            component,
            ..Default::default()
        };
        for (index, &z) in scores.iter().enumerate() {
            if z > self.threshold {
                anomalies.positive.push(index);
            } else if z < -self.threshold {
                anomalies.negative.push(index);
            }
        }
        Ok(anomalies)
    }

    /// [`detect`](Self::detect) over every column, in component order.
    pub fn detect_all(&self, matrix: &FactorMatrix) -> Result<Vec<ComponentAnomalies>, DetectionError> {
        (0..matrix.ncols())
            .map(|component| self.detect(matrix, component))
            .collect()
    }

    /// Flagged entries of column `component` with their z-scores, positive
    /// before negative, ascending index within each polarity.
    pub fn records(
        &self,
        matrix: &FactorMatrix,
        component: usize,
    ) -> Result<Vec<AnomalyRecord>, DetectionError> {
        let Some((_, scores)) = self.scores(matrix, component)? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for polarity in Polarity::ALL {
            for (index, &z_score) in scores.iter().enumerate() {
                let flagged = match polarity {
                    Polarity::Positive => z_score > self.threshold,
                    Polarity::Negative => z_score < -self.threshold,
                };
                if flagged {
                    records.push(AnomalyRecord {
                        component,
                        polarity,
                        index,
                        z_score,
                    });
                }
            }
        }
        Ok(records)
    }

    /// Column statistics and z-scores, `None` when the column is degenerate
    /// and the policy allows it.
    fn scores(
        &self,
        matrix: &FactorMatrix,
        component: usize,
    ) -> Result<Option<(ColumnStats, Vec<f64>)>, DetectionError> {
        if component >= matrix.ncols() {
            return Err(DetectionError::ComponentOutOfRange {
                component,
                rank: matrix.ncols(),
            });
        }
        let column: Vec<f64> = matrix.column(component).iter().copied().collect();
        match zscore::standardize(&column) {
            Some(scored) => Ok(Some(scored)),
            None => match self.policy {
                DegeneratePolicy::Empty => {
                    tracing::debug!(component, rows = column.len(), "degenerate factor column");
                    Ok(None)
                }
                DegeneratePolicy::Fail => Err(DetectionError::DegenerateColumn { component }),
            },
        }
    }
}
