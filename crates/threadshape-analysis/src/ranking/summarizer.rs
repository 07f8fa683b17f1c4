//! GroupedRankingSummarizer: per component and polarity, which groups,
//! features and horizons stand out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use threadshape_core::config::ReportConfig;
use threadshape_core::errors::ReportError;
use threadshape_core::types::{CpFactors, TensorMode};

use super::groups::{group_totals, rank_groups, RankingEntry};
use crate::anomaly::{AnomalyDetector, Polarity};

/// Side tables that label factor rows, all in tensor index order.
#[derive(Debug, Clone, Copy)]
pub struct ReportTables<'a> {
    pub group_labels: &'a [String],
    pub feature_names: &'a [String],
    pub horizons: &'a [usize],
}

/// What stood out for one component in one direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolaritySummary {
    /// Flagged conversations, before grouping.
    pub flagged_conversations: usize,
    /// Top groups by prevalence ratio.
    pub groups: Vec<RankingEntry>,
    /// Top flagged feature names in ascending feature-index order.
    pub features: Vec<String>,
    /// Flagged horizon values, ascending.
    pub horizons: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub component: usize,
    pub positive: PolaritySummary,
    pub negative: PolaritySummary,
    /// Modes whose factor column for this component had no usable spread.
    pub degenerate_modes: Vec<TensorMode>,
}

impl ComponentSummary {
    pub fn polarity(&self, polarity: Polarity) -> &PolaritySummary {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }
}

/// Summary of every component at one rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub rank: usize,
    pub threshold: f64,
    pub components: Vec<ComponentSummary>,
}

/// Aggregates anomaly sets by group label and truncates to the top entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedRankingSummarizer {
    top_groups: usize,
    top_features: usize,
}

impl GroupedRankingSummarizer {
    pub fn new(top_groups: usize, top_features: usize) -> Self {
        Self {
            top_groups,
            top_features,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.effective_top_groups(), config.effective_top_features())
    }

    /// Top groups among the flagged conversation indices of one polarity.
    fn ranked_groups(
        &self,
        flagged: &[usize],
        group_labels: &[String],
        totals: &BTreeMap<&str, usize>,
    ) -> Result<Vec<RankingEntry>, ReportError> {
        let mut groups = rank_groups(flagged, group_labels, totals)?;
        groups.truncate(self.top_groups);
        Ok(groups)
    }

    /// Top flagged feature names in detection order.
    pub fn top_features(
        &self,
        flagged: &[usize],
        feature_names: &[String],
    ) -> Result<Vec<String>, ReportError> {
        flagged
            .iter()
            .take(self.top_features)
            .map(|&index| {
                feature_names
                    .get(index)
                    .cloned()
                    .ok_or(ReportError::IndexOutOfRange {
                        index,
                        len: feature_names.len(),
                    })
            })
            .collect()
    }

    /// Detect anomalies in all three factor matrices at one rank and summarize
    /// every component.
    pub fn summarize(
        &self,
        rank: usize,
        factors: &CpFactors,
        detector: &AnomalyDetector,
        tables: ReportTables<'_>,
    ) -> Result<Summary, ReportError> {
        check_len("group-labels", factors.conversation.nrows(), tables.group_labels.len())?;
        check_len("feature-names", factors.feature.nrows(), tables.feature_names.len())?;
        check_len("horizons", factors.horizon.nrows(), tables.horizons.len())?;

        let totals = group_totals(tables.group_labels);
        let mut components = Vec::with_capacity(factors.rank());
        for component in 0..factors.rank() {
            let conversation = detector.detect(&factors.conversation, component)?;
            let feature = detector.detect(&factors.feature, component)?;
            let horizon = detector.detect(&factors.horizon, component)?;

            let degenerate_modes = [
                (TensorMode::Horizon, horizon.degenerate),
                (TensorMode::Conversation, conversation.degenerate),
                (TensorMode::Feature, feature.degenerate),
            ]
            .into_iter()
            .filter_map(|(mode, degenerate)| degenerate.then_some(mode))
            .collect();

            let polarity_summary = |polarity: Polarity| -> Result<PolaritySummary, ReportError> {
                let flagged = conversation.indices(polarity);
                Ok(PolaritySummary {
                    flagged_conversations: flagged.len(),
                    groups: self.ranked_groups(flagged, tables.group_labels, &totals)?,
                    features: self.top_features(feature.indices(polarity), tables.feature_names)?,
                    horizons: horizon
                        .indices(polarity)
                        .iter()
                        .map(|&h| tables.horizons[h])
                        .collect(),
                })
            };

            components.push(ComponentSummary {
                component,
                positive: polarity_summary(Polarity::Positive)?,
                negative: polarity_summary(Polarity::Negative)?,
                degenerate_modes,
            });
        }

        tracing::debug!(rank, components = components.len(), "summary computed");
        Ok(Summary {
            rank,
            threshold: detector.threshold(),
            components,
        })
    }
}

fn check_len(table: &'static str, expected: usize, actual: usize) -> Result<(), ReportError> {
    if expected != actual {
        return Err(ReportError::LengthMismatch {
            table,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use threadshape_core::config::DegeneratePolicy;
    use threadshape_core::types::FactorMatrix;

    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn factors() -> CpFactors {
        CpFactors::new(
            FactorMatrix::from_column_slice(2, 1, &[1.0, 2.0]),
            FactorMatrix::from_column_slice(5, 1, &[10.0, 1.0, 1.0, 1.0, 1.0]),
            FactorMatrix::from_column_slice(5, 1, &[1.0, 1.0, 1.0, 1.0, -8.0]),
        )
    }

    #[test]
    fn summary_labels_groups_features_and_horizons() {
        let labels = strings(&["a", "a", "b", "b", "b"]);
        let names = strings(&["f0", "f1", "f2", "f3", "f4"]);
        let horizons = [3, 4];
        let detector = AnomalyDetector::new(1.5, DegeneratePolicy::Empty).unwrap();
        let summary = GroupedRankingSummarizer::new(5, 10)
            .summarize(
                1,
                &factors(),
                &detector,
                ReportTables {
                    group_labels: &labels,
                    feature_names: &names,
                    horizons: &horizons,
                },
            )
            .unwrap();

        let c = &summary.components[0];
        assert_eq!(c.positive.flagged_conversations, 1);
        assert_eq!(c.positive.groups[0].group, "a");
        assert_eq!(c.positive.groups[0].total, 2);
        assert!(c.negative.groups.is_empty());
        assert_eq!(c.negative.features, vec!["f4".to_string()]);
        assert!(c.positive.features.is_empty());
        // two-row horizon column scores exactly +/-1
        assert!(c.positive.horizons.is_empty());
        assert!(c.degenerate_modes.is_empty());
    }

    #[test]
    fn side_table_length_mismatch() {
        let labels = strings(&["a", "b"]);
        let names = strings(&["f0", "f1", "f2", "f3", "f4"]);
        let detector = AnomalyDetector::new(1.5, DegeneratePolicy::Empty).unwrap();
        let err = GroupedRankingSummarizer::new(5, 10)
            .summarize(
                1,
                &factors(),
                &detector,
                ReportTables {
                    group_labels: &labels,
                    feature_names: &names,
                    horizons: &[3, 4],
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::LengthMismatch {
                table: "group-labels",
                expected: 5,
                actual: 2
            }
        ));
    }

    #[test]
    fn top_features_truncates_in_detection_order() {
        let names = strings(&["a", "b", "c", "d"]);
        let top = GroupedRankingSummarizer::new(5, 2)
            .top_features(&[1, 2, 3], &names)
            .unwrap();
        assert_eq!(top, strings(&["b", "c"]));
    }

    #[test]
    fn groups_truncate_to_top_k() {
        let labels = strings(&["a", "b", "c", "d"]);
        let totals = group_totals(&labels);
        let summarizer = GroupedRankingSummarizer::new(2, 10);
        let positive = summarizer.ranked_groups(&[0, 1, 2, 3], &labels, &totals).unwrap();
        assert_eq!(positive.len(), 2);
        assert!(summarizer.ranked_groups(&[], &labels, &totals).unwrap().is_empty());
    }
}
