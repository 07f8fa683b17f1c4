//! threadshape-storage: artifact persistence and corpus loading.
//!
//! - `SqliteArtifactStore`: one `artifacts` table, schema via `PRAGMA user_version`
//! - `FileArtifactStore`: one `<key>.json` per artifact, atomic rename on write
//! - `MemoryArtifactStore`: process-local, for tests
//! - `JsonlCorpus`: conversations plus precomputed features from a JSONL file

pub mod connection;
pub mod corpus;
pub mod file_store;
pub mod memory_store;
pub mod migrations;
pub mod open;
pub mod queries;
pub mod sqlite_store;

pub use corpus::JsonlCorpus;
pub use file_store::FileArtifactStore;
pub use memory_store::MemoryArtifactStore;
pub use open::open_store;
pub use sqlite_store::SqliteArtifactStore;
