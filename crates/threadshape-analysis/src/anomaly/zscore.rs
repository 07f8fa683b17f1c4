//! Column standardization with population statistics.
//!
//! Uses ddof = 0 so z-scores agree with a standard scaler fitted on the
//! column. No iterative masking: every entry is scored against the full
//! column.

use statrs::statistics::Statistics;

use super::types::ColumnStats;

/// Mean, population standard deviation and largest magnitude of `values`.
///
/// An empty slice yields NaN statistics, which [`ColumnStats::is_degenerate`]
/// treats as degenerate.
pub fn column_stats(values: &[f64]) -> ColumnStats {
    ColumnStats {
        mean: values.iter().mean(),
        std_dev: values.iter().population_std_dev(),
        max_abs: values.iter().abs_max(),
    }
}

/// Z-score every entry. Returns `None` for a degenerate column.
pub fn standardize(values: &[f64]) -> Option<(ColumnStats, Vec<f64>)> {
    let stats = column_stats(values);
    if stats.is_degenerate() {
        return None;
    }
    let scores = values.iter().map(|&v| stats.z_score(v)).collect();
    Some((stats, scores))
}
