//! Artifact store tests across the SQLite, file and memory backends.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use tempfile::TempDir;
use threadshape_core::config::{StorageBackend, StorageConfig};
use threadshape_core::errors::StorageError;
use threadshape_core::traits::{ArtifactStore, ArtifactStoreExt};
use threadshape_core::types::{ArtifactKey, CpFactors, RankToFactors, Tensor3};
use threadshape_storage::{open_store, FileArtifactStore, MemoryArtifactStore, SqliteArtifactStore};

fn backends(dir: &TempDir) -> Vec<(&'static str, Box<dyn ArtifactStore>)> {
    vec![
        (
            "sqlite",
            Box::new(SqliteArtifactStore::open(&dir.path().join("a.db")).unwrap()),
        ),
        (
            "sqlite-memory",
            Box::new(SqliteArtifactStore::open_in_memory().unwrap()),
        ),
        (
            "files",
            Box::new(FileArtifactStore::open(&dir.path().join("files")).unwrap()),
        ),
        ("memory", Box::new(MemoryArtifactStore::new())),
    ]
}

fn sample_factors() -> RankToFactors {
    let mut map = BTreeMap::new();
    map.insert(
        2,
        CpFactors::new(
            DMatrix::from_row_slice(2, 2, &[1.0, -0.5, 0.25, 2.0]),
            DMatrix::from_row_slice(3, 2, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]),
            DMatrix::from_row_slice(1, 2, &[7.0, -7.0]),
        ),
    );
    map
}

#[test]
fn every_key_round_trips_on_every_backend() {
    let dir = TempDir::new().unwrap();
    for (name, store) in backends(&dir) {
        let labels = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let ids = vec!["t1".to_string(), "t2".to_string(), "t3".to_string()];
        let names = vec!["f0".to_string()];
        let horizons = vec![3usize, 4];
        let tensor = Tensor3::from_fn([2, 3, 1], |h, c, _| (h * 3 + c) as f64 - 2.5);
        let factors = sample_factors();

        store.put(ArtifactKey::GroupLabels, &labels).unwrap();
        store.put(ArtifactKey::EntityIds, &ids).unwrap();
        store.put(ArtifactKey::FeatureNames, &names).unwrap();
        store.put(ArtifactKey::Horizons, &horizons).unwrap();
        store.put(ArtifactKey::Tensor, &tensor).unwrap();
        store.put(ArtifactKey::RankToFactors, &factors).unwrap();

        assert_eq!(store.get::<Vec<String>>(ArtifactKey::GroupLabels).unwrap(), labels, "{name}");
        assert_eq!(store.get::<Vec<String>>(ArtifactKey::EntityIds).unwrap(), ids, "{name}");
        assert_eq!(store.get::<Vec<String>>(ArtifactKey::FeatureNames).unwrap(), names, "{name}");
        assert_eq!(store.get::<Vec<usize>>(ArtifactKey::Horizons).unwrap(), horizons, "{name}");
        assert_eq!(store.get::<Tensor3>(ArtifactKey::Tensor).unwrap(), tensor, "{name}");
        assert_eq!(store.get::<RankToFactors>(ArtifactKey::RankToFactors).unwrap(), factors, "{name}");
    }
}

#[test]
fn missing_key_is_not_found_naming_the_key() {
    let dir = TempDir::new().unwrap();
    for (name, store) in backends(&dir) {
        match store.get_raw(ArtifactKey::RankToFactors) {
            Err(StorageError::NotFound { key }) => assert_eq!(key, "rank-to-factors", "{name}"),
            other => panic!("{name}: expected NotFound, got {other:?}"),
        }
        assert!(!store.contains(ArtifactKey::RankToFactors).unwrap(), "{name}");
    }
}

#[test]
fn put_overwrites_and_delete_removes() {
    let dir = TempDir::new().unwrap();
    for (name, store) in backends(&dir) {
        store.put_raw(ArtifactKey::Tensor, b"first").unwrap();
        store.put_raw(ArtifactKey::Tensor, b"second").unwrap();
        assert_eq!(store.get_raw(ArtifactKey::Tensor).unwrap(), b"second", "{name}");

        store.delete(ArtifactKey::Tensor).unwrap();
        assert!(!store.contains(ArtifactKey::Tensor).unwrap(), "{name}");
        // deleting twice is fine
        store.delete(ArtifactKey::Tensor).unwrap();
    }
}

#[test]
fn batch_writes_every_entry() {
    let dir = TempDir::new().unwrap();
    for (name, store) in backends(&dir) {
        let batch = vec![
            (ArtifactKey::EntityIds, b"[\"x\"]".to_vec()),
            (ArtifactKey::GroupLabels, b"[\"g\"]".to_vec()),
        ];
        store.put_batch(&batch).unwrap();
        assert!(
            store
                .contains_all(&[ArtifactKey::EntityIds, ArtifactKey::GroupLabels])
                .unwrap(),
            "{name}"
        );
        assert!(!store.contains_all(&ArtifactKey::TENSOR_STAGE).unwrap(), "{name}");
    }
}

#[test]
fn undecodable_blob_is_a_serialization_error() {
    let store = MemoryArtifactStore::new();
    store.put_raw(ArtifactKey::Tensor, b"{\"shape\":[1,1,2],\"data\":[1.0]}").unwrap();
    match store.get::<Tensor3>(ArtifactKey::Tensor) {
        Err(StorageError::Serialization { key, .. }) => assert_eq!(key, "tensor"),
        other => panic!("expected Serialization, got {other:?}"),
    }
}

#[test]
fn sqlite_artifacts_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("artifacts.db");
    {
        let store = SqliteArtifactStore::open(&path).unwrap();
        store.put(ArtifactKey::Horizons, &vec![3usize, 4, 5]).unwrap();
    }
    let store = SqliteArtifactStore::open(&path).unwrap();
    assert_eq!(store.get::<Vec<usize>>(ArtifactKey::Horizons).unwrap(), vec![3, 4, 5]);
    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "horizons");
    assert_eq!(rows[0].byte_len, "[3,4,5]".len() as i64);
}

#[test]
fn sqlite_connection_accepts_repeated_writes() {
    let store = SqliteArtifactStore::open_in_memory().unwrap();
    store.put_raw(ArtifactKey::Tensor, b"{}").unwrap();
    store
        .put_batch(&[
            (ArtifactKey::EntityIds, b"[\"t1\"]".to_vec()),
            (ArtifactKey::GroupLabels, b"[\"a\"]".to_vec()),
        ])
        .unwrap();
    store.put_raw(ArtifactKey::Tensor, b"[]").unwrap();
    store.delete(ArtifactKey::GroupLabels).unwrap();

    assert_eq!(store.get_raw(ArtifactKey::Tensor).unwrap(), b"[]".to_vec());
    assert_eq!(store.get_raw(ArtifactKey::EntityIds).unwrap(), b"[\"t1\"]".to_vec());
    assert!(!store.contains(ArtifactKey::GroupLabels).unwrap());
    store
        .with_conn(|conn| {
            assert!(conn.is_autocommit());
            Ok(())
        })
        .unwrap();
}

#[test]
fn sqlite_schema_version_and_wal() {
    let dir = TempDir::new().unwrap();
    let store = SqliteArtifactStore::open(&dir.path().join("v.db")).unwrap();
    store
        .with_conn(|conn| {
            assert_eq!(threadshape_storage::migrations::current_version(conn)?, 1);
            assert!(threadshape_storage::connection::pragmas::verify_wal_mode(conn)?);
            Ok(())
        })
        .unwrap();
}

#[test]
fn file_store_leaves_no_staging_files() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::open(dir.path()).unwrap();
    store.put(ArtifactKey::EntityIds, &vec!["t1"]).unwrap();
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["entity-ids.json".to_string()]);
}

#[test]
fn open_store_honours_backend() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        work_dir: Some("work".into()),
        backend: Some(StorageBackend::Files),
        database_file: None,
    };
    let store = open_store(&config, dir.path()).unwrap();
    store.put(ArtifactKey::Horizons, &vec![1usize]).unwrap();
    assert!(dir.path().join("work/horizons.json").is_file());

    let config = StorageConfig::default();
    let store = open_store(&config, dir.path()).unwrap();
    store.put(ArtifactKey::Horizons, &vec![1usize]).unwrap();
    assert!(dir.path().join("data/artifacts.db").is_file());
}
