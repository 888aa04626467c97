//! Schema for the `ui_storage` table.
//!
//! The applied revision is kept in SQLite's `user_version` pragma. Each
//! revision is a batch run once, in order, inside one transaction.

use rusqlite::Connection;

/// Revision batches; index + 1 is the revision number
const REVISIONS: &[&str] = &[
    // 1: snapshot slots keyed by name
    "CREATE TABLE IF NOT EXISTS ui_storage (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
];

/// Revision a fully upgraded database reports
pub const SCHEMA_VERSION: i64 = REVISIONS.len() as i64;

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring `conn` up to [`SCHEMA_VERSION`]. A database written by a newer
/// build is left untouched.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    let current = schema_version(conn)?;
    if current >= SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (revision, sql) in REVISIONS.iter().enumerate().skip(current.max(0) as usize) {
        tracing::info!(revision = revision + 1, "Upgrading ui_storage schema");
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()
}
