//! Reporting configuration.

use serde::{Deserialize, Serialize};

/// Configuration for summaries and detailed examples.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Rank to report on. Default: the largest persisted rank.
    pub rank: Option<usize>,
    /// Groups listed per component and polarity. Default: 5.
    pub top_groups: Option<usize>,
    /// Features listed per component and polarity. Default: 10.
    pub top_features: Option<usize>,
    /// Detailed examples per component and polarity. Default: all.
    pub max_examples: Option<usize>,
}

impl ReportConfig {
    pub fn effective_top_groups(&self) -> usize {
        self.top_groups.unwrap_or(5)
    }

    pub fn effective_top_features(&self) -> usize {
        self.top_features.unwrap_or(10)
    }
}
