//! Prevalence ratios per group label.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use threadshape_core::errors::ReportError;

/// One group's share of flagged conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub group: String,
    pub flagged: usize,
    /// Members of the group across the whole corpus.
    pub total: usize,
    /// `flagged / total`, in [0, 1].
    pub ratio: f64,
}

/// Membership count per group label.
pub fn group_totals(group_labels: &[String]) -> BTreeMap<&str, usize> {
    let mut totals = BTreeMap::new();
    for label in group_labels {
        *totals.entry(label.as_str()).or_insert(0) += 1;
    }
    totals
}

/// Rank the groups of the `flagged` conversation indices by prevalence ratio,
/// descending, ties broken by ascending group label.
///
/// Only groups with at least one flagged member appear. Repeated indices count
/// once.
pub fn rank_groups(
    flagged: &[usize],
    group_labels: &[String],
    totals: &BTreeMap<&str, usize>,
) -> Result<Vec<RankingEntry>, ReportError> {
    let unique: BTreeSet<usize> = flagged.iter().copied().collect();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for index in unique {
        let label = group_labels.get(index).ok_or(ReportError::IndexOutOfRange {
            index,
            len: group_labels.len(),
        })?;
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<RankingEntry> = counts
        .into_iter()
        .filter_map(|(group, flagged)| {
            let total = totals.get(group).copied().unwrap_or(0);
            (total > 0).then(|| RankingEntry {
                group: group.to_string(),
                flagged,
                total,
                ratio: flagged as f64 / total as f64,
            })
        })
        .collect();

    entries.sort_by(|a, b| match b.ratio.total_cmp(&a.ratio) {
        Ordering::Equal => a.group.cmp(&b.group),
        other => other,
    });
    Ok(entries)
}
