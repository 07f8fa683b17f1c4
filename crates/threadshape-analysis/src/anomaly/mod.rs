//! Z-score anomaly detection on factor-matrix columns.

pub mod detector;
pub mod types;
pub mod zscore;

pub use detector::AnomalyDetector;
pub use types::{AnomalyRecord, ColumnStats, ComponentAnomalies, Polarity};
