//! V001: artifact table.

pub const MIGRATION_SQL: &str = r#"
-- One row per artifact key; payload is the JSON-encoded value.
CREATE TABLE IF NOT EXISTS artifacts (
    key TEXT PRIMARY KEY,
    payload BLOB NOT NULL,
    byte_len INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;
"#;
