//! Group-normalized ranking of flagged conversations and flagged features.

pub mod groups;
pub mod summarizer;

pub use groups::{group_totals, rank_groups, RankingEntry};
pub use summarizer::{ComponentSummary, GroupedRankingSummarizer, PolaritySummary, ReportTables, Summary};
