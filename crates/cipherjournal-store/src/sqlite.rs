//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the Cipherjournal ledger. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.
//! Every mutating operation runs inside a single transaction so identifier
//! allocation, the entry write, and the owner-index maintenance are
//! inseparable.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

use cipherjournal_core::{Address, CipherHandle, Entry, EntryDraft, EntryId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::Store;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path.as_ref())?;
        migration::migrate(&mut conn)?;
        debug!(path = %path.as_ref().display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn poisoned(e: PoisonError<MutexGuard<'_, Connection>>) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", e)),
    ))
}

fn join_failed(e: tokio::task::JoinError) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(format!("spawn_blocking failed: {}", e)),
    ))
}

// Helper to convert a row to Entry
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    let owner_bytes: Vec<u8> = row.get("owner")?;
    let stress_bytes: Vec<u8> = row.get("stress")?;
    let achievement_bytes: Vec<u8> = row.get("achievement")?;
    let mindset_bytes: Vec<u8> = row.get("mindset")?;

    let blob_err =
        |name: &str| rusqlite::Error::InvalidColumnType(0, name.into(), rusqlite::types::Type::Blob);

    Ok(Entry {
        id: EntryId(row.get::<_, i64>("entry_id")? as u64),
        owner: Address(owner_bytes.try_into().map_err(|_| blob_err("owner"))?),
        content: row.get("content")?,
        stress: CipherHandle(stress_bytes.try_into().map_err(|_| blob_err("stress"))?),
        achievement: CipherHandle(
            achievement_bytes
                .try_into()
                .map_err(|_| blob_err("achievement"))?,
        ),
        mindset: CipherHandle(mindset_bytes.try_into().map_err(|_| blob_err("mindset"))?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        alive: row.get::<_, i64>("alive")? != 0,
    })
}

/// Append an id at the end of an owner's index.
fn append_to_index(tx: &Transaction<'_>, owner: &Address, id: EntryId) -> Result<()> {
    let position: i64 = tx.query_row(
        "SELECT COUNT(*) FROM owner_index WHERE owner = ?1",
        params![owner.as_bytes().as_slice()],
        |row| row.get(0),
    )?;
    tx.execute(
        "INSERT INTO owner_index (owner, position, entry_id) VALUES (?1, ?2, ?3)",
        params![owner.as_bytes().as_slice(), position, id.as_u64() as i64],
    )?;
    Ok(())
}

/// Swap-with-last-then-truncate removal from an owner's index.
fn remove_from_index(tx: &Transaction<'_>, owner: &Address, id: EntryId) -> Result<()> {
    let owner_blob = owner.as_bytes().as_slice();

    let pos: i64 = tx
        .query_row(
            "SELECT position FROM owner_index WHERE owner = ?1 AND entry_id = ?2",
            params![owner_blob, id.as_u64() as i64],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| StoreError::Corrupt(format!("entry {id} missing from owner index")))?;

    let max_pos: i64 = tx.query_row(
        "SELECT MAX(position) FROM owner_index WHERE owner = ?1",
        params![owner_blob],
        |row| row.get(0),
    )?;

    tx.execute(
        "DELETE FROM owner_index WHERE owner = ?1 AND position = ?2",
        params![owner_blob, pos],
    )?;

    // Move the last id into the vacated slot to keep positions dense.
    if pos != max_pos {
        tx.execute(
            "UPDATE owner_index SET position = ?1 WHERE owner = ?2 AND position = ?3",
            params![pos, owner_blob, max_pos],
        )?;
    }

    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_entry(&self, draft: EntryDraft) -> Result<Entry> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(poisoned)?;
            let tx = conn.transaction()?;

            let next: i64 = tx.query_row(
                "SELECT value FROM meta WHERE key = 'next_entry_id'",
                [],
                |row| row.get(0),
            )?;
            let id = EntryId(next as u64);
            let entry = draft.into_entry(id);

            tx.execute(
                "INSERT INTO entries (
                    entry_id, owner, content, stress, achievement, mindset,
                    created_at, updated_at, alive
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
                params![
                    next,
                    entry.owner.as_bytes().as_slice(),
                    &entry.content,
                    entry.stress.as_bytes().as_slice(),
                    entry.achievement.as_bytes().as_slice(),
                    entry.mindset.as_bytes().as_slice(),
                    entry.created_at,
                    entry.updated_at,
                ],
            )?;

            append_to_index(&tx, &entry.owner, id)?;

            tx.execute(
                "UPDATE meta SET value = value + 1 WHERE key = 'next_entry_id'",
                [],
            )?;

            tx.commit()?;
            Ok(entry)
        })
        .await
        .map_err(join_failed)?
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            conn.query_row(
                "SELECT entry_id, owner, content, stress, achievement, mindset,
                        created_at, updated_at, alive
                 FROM entries WHERE entry_id = ?1",
                params![id.as_u64() as i64],
                row_to_entry,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
        .map_err(join_failed)?
    }

    async fn replace_entry(&self, entry: &Entry) -> Result<()> {
        let entry = entry.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let changed = conn.execute(
                "UPDATE entries
                 SET content = ?1, stress = ?2, achievement = ?3, mindset = ?4, updated_at = ?5
                 WHERE entry_id = ?6 AND alive = 1",
                params![
                    &entry.content,
                    entry.stress.as_bytes().as_slice(),
                    entry.achievement.as_bytes().as_slice(),
                    entry.mindset.as_bytes().as_slice(),
                    entry.updated_at,
                    entry.id.as_u64() as i64,
                ],
            )?;

            if changed == 0 {
                return Err(StoreError::NotFound(entry.id));
            }
            Ok(())
        })
        .await
        .map_err(join_failed)?
    }

    async fn transfer_entry(&self, id: EntryId, new_owner: Address, at: i64) -> Result<()> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(poisoned)?;
            let tx = conn.transaction()?;

            let old_owner: Option<Vec<u8>> = tx
                .query_row(
                    "SELECT owner FROM entries WHERE entry_id = ?1 AND alive = 1",
                    params![id.as_u64() as i64],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(old_owner_bytes) = old_owner else {
                return Err(StoreError::NotFound(id));
            };
            let old_owner = Address(
                old_owner_bytes
                    .try_into()
                    .map_err(|_| StoreError::Corrupt("owner column is not 20 bytes".into()))?,
            );

            remove_from_index(&tx, &old_owner, id)?;
            append_to_index(&tx, &new_owner, id)?;

            tx.execute(
                "UPDATE entries SET owner = ?1, updated_at = ?2 WHERE entry_id = ?3",
                params![new_owner.as_bytes().as_slice(), at, id.as_u64() as i64],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(join_failed)?
    }

    async fn tombstone_entry(&self, id: EntryId) -> Result<bool> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(poisoned)?;
            let tx = conn.transaction()?;

            let owner: Option<Vec<u8>> = tx
                .query_row(
                    "SELECT owner FROM entries WHERE entry_id = ?1 AND alive = 1",
                    params![id.as_u64() as i64],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(owner_bytes) = owner else {
                // Absent or already tombstoned: non-fatal skip.
                return Ok(false);
            };
            let owner = Address(
                owner_bytes
                    .try_into()
                    .map_err(|_| StoreError::Corrupt("owner column is not 20 bytes".into()))?,
            );

            remove_from_index(&tx, &owner, id)?;
            tx.execute(
                "UPDATE entries SET alive = 0 WHERE entry_id = ?1",
                params![id.as_u64() as i64],
            )?;

            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(join_failed)?
    }

    async fn entries_for(&self, owner: &Address) -> Result<Vec<EntryId>> {
        let owner = *owner;
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let mut stmt = conn.prepare(
                "SELECT entry_id FROM owner_index WHERE owner = ?1 ORDER BY position",
            )?;

            let ids: Vec<EntryId> = stmt
                .query_map(params![owner.as_bytes().as_slice()], |row| {
                    row.get::<_, i64>(0).map(|v| EntryId(v as u64))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(ids)
        })
        .await
        .map_err(join_failed)?
    }

    async fn live_count(&self) -> Result<u64> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM entries WHERE alive = 1",
                [],
                |row| row.get(0),
            )?;

            Ok(count as u64)
        })
        .await
        .map_err(join_failed)?
    }
}
