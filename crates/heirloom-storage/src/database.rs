// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes go through one `tokio_rusqlite::Connection`, which runs every
//! closure on a single background thread. Clones of [`Database`] share that
//! connection. Do not open additional connections for writes.

use heirloom_config::StorageConfig;
use heirloom_core::HeirloomError;
use tracing::{debug, info};

use crate::migrations;

const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Handle to the Heirloom SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Opens (creating if needed) the database at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, HeirloomError> {
        Self::open_with(path, true).await
    }

    /// Opens the database described by the `[storage]` config section.
    pub async fn open_with_config(config: &StorageConfig) -> Result<Self, HeirloomError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    async fn open_with(path: &str, wal_mode: bool) -> Result<Self, HeirloomError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(HeirloomError::storage)?;
            }
        }

        // Schema setup runs on a plain blocking connection before the async
        // writer is opened, so the writer only ever sees a migrated schema.
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), HeirloomError> {
            let mut conn =
                rusqlite::Connection::open(&setup_path).map_err(HeirloomError::storage)?;
            if wal_mode {
                let mode: String = conn
                    .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                    .map_err(HeirloomError::storage)?;
                debug!(journal_mode = %mode, "journal mode set");
            }
            apply_connection_pragmas(&conn).map_err(HeirloomError::storage)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| HeirloomError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(HeirloomError::storage)?;
        conn.call(|conn| apply_connection_pragmas(conn))
            .await
            .map_err(map_tr_err)?;

        info!(path = %path, wal_mode, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// The shared single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Folds the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), HeirloomError> {
        self.conn
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(map_tr_err)?;
        debug!(path = %self.path, "WAL checkpoint complete");
        Ok(())
    }
}

/// Per-connection settings. `journal_mode` is stored in the file and is set
/// once during setup instead.
fn apply_connection_pragmas(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS.into()))?;
    Ok(())
}

/// Convert tokio-rusqlite errors to [`HeirloomError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HeirloomError {
    HeirloomError::storage(format!("database error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("heirloom.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('vault_meta', 'documents') ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await
            .unwrap();
        assert_eq!(tables, vec!["documents", "vault_meta"]);
    }

    #[tokio::test]
    async fn reopening_is_idempotent_and_uses_wal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heirloom.db");
        let path = path.to_str().unwrap();

        drop(Database::open(path).await.unwrap());
        let db = Database::open(path).await.unwrap();

        let mode: String = db
            .connection()
            .call(|conn| conn.pragma_query_value(None, "journal_mode", |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.checkpoint().await.unwrap();
    }

    #[tokio::test]
    async fn open_with_config_respects_wal_flag() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("plain.db").display().to_string(),
            wal_mode: false,
        };
        let db = Database::open_with_config(&config).await.unwrap();

        let mode: String = db
            .connection()
            .call(|conn| conn.pragma_query_value(None, "journal_mode", |row| row.get(0)))
            .await
            .unwrap();
        assert_ne!(mode.to_lowercase(), "wal");
    }
}
