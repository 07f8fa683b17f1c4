//! Write connection utilities: BEGIN IMMEDIATE transactions.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use threadshape_core::errors::StorageError;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// Either every statement in `f` commits or none does; an error from `f`
/// rolls back when the transaction drops.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL);").unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0)).unwrap()
    }

    fn insert(tx: &Transaction<'_>, v: i64) -> Result<(), StorageError> {
        tx.execute("INSERT INTO t (v) VALUES (?1)", [v])
            .map(|_| ())
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
    }

    #[test]
    fn consecutive_transactions_commit() {
        let conn = conn();
        with_immediate_transaction(&conn, |tx| insert(tx, 1)).unwrap();
        with_immediate_transaction(&conn, |tx| insert(tx, 2)).unwrap();
        assert_eq!(count(&conn), 2);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn failed_closure_rolls_back_and_connection_stays_usable() {
        let conn = conn();
        with_immediate_transaction(&conn, |tx| insert(tx, 1)).unwrap();

        let err = with_immediate_transaction(&conn, |tx| -> Result<(), StorageError> {
            insert(tx, 2)?;
            Err(StorageError::LockPoisoned)
        });
        assert!(matches!(err, Err(StorageError::LockPoisoned)));
        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 1);

        with_immediate_transaction(&conn, |tx| insert(tx, 3)).unwrap();
        assert_eq!(count(&conn), 2);
    }
}
