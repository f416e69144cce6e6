use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;

/// Open (or create) the database file at `path` and make sure the `Books`
/// table exists. The parent directory is created on first launch.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    debug!(path = %path.display(), "opened catalog database");
    Ok(conn)
}

/// Same schema on a throwaway in-memory database.
pub fn open_in_memory_database() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `Books` table when missing. The layout is fixed; there are no
/// migrations.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Books (
            Title TEXT,
            Book_ID TEXT PRIMARY KEY NOT NULL,
            Author TEXT,
            Status TEXT,
            Issuer_ID TEXT
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("library.db");

        open_database(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = open_in_memory_database().unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'Books'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
