//! Configuration system for threadshape.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod anomaly_config;
pub mod decomposition_config;
pub mod report_config;
pub mod storage_config;
pub mod tensor_config;
pub mod threadshape_config;

pub use anomaly_config::{AnomalyConfig, DegeneratePolicy};
pub use decomposition_config::DecompositionConfig;
pub use report_config::ReportConfig;
pub use storage_config::{StorageBackend, StorageConfig};
pub use tensor_config::TensorConfig;
pub use threadshape_config::{CliOverrides, ThreadshapeConfig};
