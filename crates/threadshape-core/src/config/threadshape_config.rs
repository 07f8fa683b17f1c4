//! Top-level threadshape configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnomalyConfig, DecompositionConfig, DegeneratePolicy, ReportConfig, StorageConfig, TensorConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the working root.
pub const PROJECT_CONFIG_FILE: &str = "threadshape.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`THREADSHAPE_*`)
/// 3. Project config (`threadshape.toml` in the working root)
/// 4. User config (`~/.threadshape/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThreadshapeConfig {
    pub tensor: TensorConfig,
    pub decomposition: DecompositionConfig,
    pub anomaly: AnomalyConfig,
    pub report: ReportConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub horizon_min: Option<usize>,
    pub horizon_max: Option<usize>,
    pub ranks: Option<Vec<usize>>,
    pub threshold: Option<f64>,
    pub seed: Option<u64>,
    pub report_rank: Option<usize>,
    pub work_dir: Option<PathBuf>,
}

impl ThreadshapeConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ThreadshapeConfig) -> Result<(), ConfigError> {
        let min = config.tensor.effective_horizon_min();
        let max = config.tensor.effective_horizon_max();
        if min == 0 {
            return Err(invalid("tensor.horizon_min", "must be at least 1"));
        }
        if min > max {
            return Err(invalid(
                "tensor.horizon_max",
                "must be greater than or equal to tensor.horizon_min",
            ));
        }
        if config.tensor.feature_count == Some(0) {
            return Err(invalid("tensor.feature_count", "must be greater than 0"));
        }
        if !config.tensor.effective_impute_value().is_finite() {
            return Err(invalid("tensor.impute_value", "must be a finite number"));
        }
        if config.decomposition.ranks.contains(&0) {
            return Err(invalid("decomposition.ranks", "ranks must be greater than 0"));
        }
        if let Some(tol) = config.decomposition.tolerance {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(invalid("decomposition.tolerance", "must be a positive number"));
            }
        }
        if config.decomposition.max_iterations == Some(0) {
            return Err(invalid("decomposition.max_iterations", "must be greater than 0"));
        }
        let threshold = config.anomaly.effective_threshold();
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(invalid("anomaly.threshold", "must be a positive number"));
        }
        if config.report.rank == Some(0) {
            return Err(invalid("report.rank", "must be greater than 0"));
        }
        if config.report.top_groups == Some(0) {
            return Err(invalid("report.top_groups", "must be greater than 0"));
        }
        if config.report.top_features == Some(0) {
            return Err(invalid("report.top_features", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.threadshape/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".threadshape").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ThreadshapeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ThreadshapeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it sets a value.
    fn merge(base: &mut ThreadshapeConfig, other: &ThreadshapeConfig) {
        // Tensor
        if other.tensor.horizon_min.is_some() {
            base.tensor.horizon_min = other.tensor.horizon_min;
        }
        if other.tensor.horizon_max.is_some() {
            base.tensor.horizon_max = other.tensor.horizon_max;
        }
        if other.tensor.feature_count.is_some() {
            base.tensor.feature_count = other.tensor.feature_count;
        }
        if other.tensor.impute_value.is_some() {
            base.tensor.impute_value = other.tensor.impute_value;
        }

        // Decomposition
        if !other.decomposition.ranks.is_empty() {
            base.decomposition.ranks = other.decomposition.ranks.clone();
        }
        if other.decomposition.seed.is_some() {
            base.decomposition.seed = other.decomposition.seed;
        }
        if other.decomposition.init.is_some() {
            base.decomposition.init = other.decomposition.init.clone();
        }
        if other.decomposition.max_iterations.is_some() {
            base.decomposition.max_iterations = other.decomposition.max_iterations;
        }
        if other.decomposition.tolerance.is_some() {
            base.decomposition.tolerance = other.decomposition.tolerance;
        }
        if !other.decomposition.solver_command.is_empty() {
            base.decomposition.solver_command = other.decomposition.solver_command.clone();
        }

        // Anomaly
        if other.anomaly.threshold.is_some() {
            base.anomaly.threshold = other.anomaly.threshold;
        }
        if other.anomaly.degenerate_policy.is_some() {
            base.anomaly.degenerate_policy = other.anomaly.degenerate_policy;
        }

        // Report
        if other.report.rank.is_some() {
            base.report.rank = other.report.rank;
        }
        if other.report.top_groups.is_some() {
            base.report.top_groups = other.report.top_groups;
        }
        if other.report.top_features.is_some() {
            base.report.top_features = other.report.top_features;
        }
        if other.report.max_examples.is_some() {
            base.report.max_examples = other.report.max_examples;
        }

        // Storage
        if other.storage.work_dir.is_some() {
            base.storage.work_dir = other.storage.work_dir.clone();
        }
        if other.storage.backend.is_some() {
            base.storage.backend = other.storage.backend;
        }
        if other.storage.database_file.is_some() {
            base.storage.database_file = other.storage.database_file.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `THREADSHAPE_ANOMALY_THRESHOLD`, `THREADSHAPE_DECOMPOSITION_RANKS=5,9`, etc.
    fn apply_env_overrides(config: &mut ThreadshapeConfig) {
        if let Some(v) = env_parse::<usize>("THREADSHAPE_TENSOR_HORIZON_MIN") {
            config.tensor.horizon_min = Some(v);
        }
        if let Some(v) = env_parse::<usize>("THREADSHAPE_TENSOR_HORIZON_MAX") {
            config.tensor.horizon_max = Some(v);
        }
        if let Some(v) = env_parse::<f64>("THREADSHAPE_TENSOR_IMPUTE_VALUE") {
            config.tensor.impute_value = Some(v);
        }
        if let Ok(val) = std::env::var("THREADSHAPE_DECOMPOSITION_RANKS") {
            let ranks: Result<Vec<usize>, _> =
                val.split(',').map(|s| s.trim().parse::<usize>()).collect();
            match ranks {
                Ok(ranks) if !ranks.is_empty() => config.decomposition.ranks = ranks,
                _ => tracing::warn!(value = %val, "ignoring unparsable THREADSHAPE_DECOMPOSITION_RANKS"),
            }
        }
        if let Some(v) = env_parse::<u64>("THREADSHAPE_DECOMPOSITION_SEED") {
            config.decomposition.seed = Some(v);
        }
        if let Some(v) = env_parse::<f64>("THREADSHAPE_ANOMALY_THRESHOLD") {
            config.anomaly.threshold = Some(v);
        }
        if let Ok(val) = std::env::var("THREADSHAPE_ANOMALY_DEGENERATE_POLICY") {
            match val.as_str() {
                "empty" => config.anomaly.degenerate_policy = Some(DegeneratePolicy::Empty),
                "fail" => config.anomaly.degenerate_policy = Some(DegeneratePolicy::Fail),
                _ => {}
            }
        }
        if let Some(v) = env_parse::<usize>("THREADSHAPE_REPORT_RANK") {
            config.report.rank = Some(v);
        }
        if let Ok(val) = std::env::var("THREADSHAPE_STORAGE_WORK_DIR") {
            config.storage.work_dir = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ThreadshapeConfig, cli: &CliOverrides) {
        if let Some(v) = cli.horizon_min {
            config.tensor.horizon_min = Some(v);
        }
        if let Some(v) = cli.horizon_max {
            config.tensor.horizon_max = Some(v);
        }
        if let Some(ref v) = cli.ranks {
            config.decomposition.ranks = v.clone();
        }
        if let Some(v) = cli.threshold {
            config.anomaly.threshold = Some(v);
        }
        if let Some(v) = cli.seed {
            config.decomposition.seed = Some(v);
        }
        if let Some(v) = cli.report_rank {
            config.report.rank = Some(v);
        }
        if let Some(ref v) = cli.work_dir {
            config.storage.work_dir = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
