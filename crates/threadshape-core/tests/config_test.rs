//! Tests for the threadshape configuration system.

use std::sync::Mutex;

use threadshape_core::config::{CliOverrides, DegeneratePolicy, StorageBackend, ThreadshapeConfig};
use threadshape_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_KEYS: [&str; 9] = [
    "THREADSHAPE_TENSOR_HORIZON_MIN",
    "THREADSHAPE_TENSOR_HORIZON_MAX",
    "THREADSHAPE_TENSOR_IMPUTE_VALUE",
    "THREADSHAPE_DECOMPOSITION_RANKS",
    "THREADSHAPE_DECOMPOSITION_SEED",
    "THREADSHAPE_ANOMALY_THRESHOLD",
    "THREADSHAPE_ANOMALY_DEGENERATE_POLICY",
    "THREADSHAPE_REPORT_RANK",
    "THREADSHAPE_STORAGE_WORK_DIR",
];

/// Point HOME at an empty directory and clear every THREADSHAPE_ variable.
fn isolate_env(home: &std::path::Path) {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
}

#[test]
fn defaults_when_no_files_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempfile::TempDir::new().unwrap();
    let root = tempfile::TempDir::new().unwrap();
    isolate_env(home.path());

    let config = ThreadshapeConfig::load(root.path(), None).unwrap();
    assert_eq!(config.tensor.horizons(), 3..=20);
    assert_eq!(config.tensor.effective_impute_value(), -1.0);
    assert_eq!(config.decomposition.effective_ranks(), vec![9]);
    assert_eq!(config.anomaly.effective_threshold(), 1.5);
    assert_eq!(config.anomaly.effective_degenerate_policy(), DegeneratePolicy::Empty);
    assert_eq!(config.report.effective_top_groups(), 5);
    assert_eq!(config.report.effective_top_features(), 10);
    assert_eq!(config.storage.effective_backend(), StorageBackend::Sqlite);
    assert_eq!(config.storage.effective_work_dir(root.path()), root.path().join("data"));
}

#[test]
fn layered_resolution_cli_over_env_over_project_over_user() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempfile::TempDir::new().unwrap();
    let root = tempfile::TempDir::new().unwrap();
    isolate_env(home.path());

    std::fs::create_dir_all(home.path().join(".threadshape")).unwrap();
    std::fs::write(
        home.path().join(".threadshape/config.toml"),
        "[report]\ntop_groups = 7\ntop_features = 3\n",
    )
    .unwrap();
    std::fs::write(
        root.path().join("threadshape.toml"),
        r#"
[tensor]
horizon_min = 4
horizon_max = 12

[decomposition]
ranks = [5, 9]

[report]
top_features = 4

[anomaly]
degenerate_policy = "fail"
"#,
    )
    .unwrap();
    std::env::set_var("THREADSHAPE_TENSOR_HORIZON_MAX", "10");
    std::env::set_var("THREADSHAPE_DECOMPOSITION_RANKS", "2,3");

    let cli = CliOverrides {
        ranks: Some(vec![4]),
        ..Default::default()
    };
    let config = ThreadshapeConfig::load(root.path(), Some(&cli)).unwrap();

    // user layer survives where nobody overrides it
    assert_eq!(config.report.effective_top_groups(), 7);
    // project beats user
    assert_eq!(config.report.effective_top_features(), 4);
    assert_eq!(config.tensor.effective_horizon_min(), 4);
    assert_eq!(config.anomaly.effective_degenerate_policy(), DegeneratePolicy::Fail);
    // env beats project
    assert_eq!(config.tensor.effective_horizon_max(), 10);
    // cli beats env
    assert_eq!(config.decomposition.effective_ranks(), vec![4]);

    isolate_env(home.path());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempfile::TempDir::new().unwrap();
    let root = tempfile::TempDir::new().unwrap();
    isolate_env(home.path());
    std::fs::write(root.path().join("threadshape.toml"), "not toml {{{{").unwrap();

    match ThreadshapeConfig::load(root.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn validation_rejects_bad_values() {
    let cases = [
        ("[tensor]\nhorizon_min = 10\nhorizon_max = 5\n", "tensor.horizon_max"),
        ("[tensor]\nhorizon_min = 0\n", "tensor.horizon_min"),
        ("[decomposition]\nranks = [0, 2]\n", "decomposition.ranks"),
        ("[anomaly]\nthreshold = -1.0\n", "anomaly.threshold"),
        ("[report]\ntop_groups = 0\n", "report.top_groups"),
    ];
    for (toml, field) in cases {
        match ThreadshapeConfig::from_toml(toml) {
            Err(ConfigError::ValidationFailed { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected ValidationFailed for {field}, got {other:?}"),
        }
    }
}

#[test]
fn ranks_are_sorted_and_deduplicated() {
    let config = ThreadshapeConfig::from_toml("[decomposition]\nranks = [9, 3, 9, 5]\n").unwrap();
    assert_eq!(config.decomposition.effective_ranks(), vec![3, 5, 9]);
}

#[test]
fn solver_options_carry_seed_and_defaults() {
    let config = ThreadshapeConfig::from_toml("[decomposition]\nseed = 42\ninit = \"random\"\n").unwrap();
    let opts = config.decomposition.solver_options();
    assert_eq!(opts.seed, Some(42));
    assert_eq!(opts.init, "random");
    assert_eq!(opts.max_iterations, 100);
    assert_eq!(opts.tolerance, 1e-8);
}

#[test]
fn toml_round_trip() {
    let config = ThreadshapeConfig::from_toml("[anomaly]\nthreshold = 2.0\n[storage]\nbackend = \"files\"\n").unwrap();
    let text = config.to_toml().unwrap();
    let back = ThreadshapeConfig::from_toml(&text).unwrap();
    assert_eq!(back.anomaly.effective_threshold(), 2.0);
    assert_eq!(back.storage.effective_backend(), StorageBackend::Files);
}
