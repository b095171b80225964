//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Get current version
    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Apply migrations
    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Entry table: one row per allocated identifier, tombstones included
        CREATE TABLE entries (
            entry_id INTEGER PRIMARY KEY,     -- allocated by the meta counter, never reused
            owner BLOB NOT NULL,              -- 20 bytes, current owner address
            content TEXT NOT NULL,            -- plaintext body
            stress BLOB NOT NULL,             -- 32 bytes, ciphertext handle
            achievement BLOB NOT NULL,        -- 32 bytes, ciphertext handle
            mindset BLOB NOT NULL,            -- 32 bytes, ciphertext handle
            created_at INTEGER NOT NULL,      -- Unix ms
            updated_at INTEGER NOT NULL,      -- Unix ms
            alive INTEGER NOT NULL DEFAULT 1  -- 0 = tombstoned
        );

        -- Per-owner insertion-ordered index of live entries
        CREATE TABLE owner_index (
            owner BLOB NOT NULL,
            position INTEGER NOT NULL,        -- dense 0..n-1 per owner
            entry_id INTEGER NOT NULL UNIQUE,
            PRIMARY KEY (owner, position)
        );

        -- Singleton counters
        CREATE TABLE meta (
            key TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );
        INSERT INTO meta (key, value) VALUES ('next_entry_id', 1);

        -- Indexes for common queries
        CREATE INDEX idx_entries_owner ON entries(owner);
        CREATE INDEX idx_entries_alive ON entries(alive);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
