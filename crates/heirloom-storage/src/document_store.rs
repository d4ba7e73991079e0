// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`DocumentStore`] over the `documents` table.

use async_trait::async_trait;
use heirloom_core::{DocumentStore, HeirloomError};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::database::{Database, map_tr_err};

/// Row id of the user's document.
pub const PRIMARY_DOCUMENT_ID: &str = "primary";

/// SQLite-backed document storage. Each write replaces the whole row in a
/// single statement.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db: Database,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// When the stored document was last written, as RFC 3339.
    pub async fn updated_at(&self) -> Result<Option<String>, HeirloomError> {
        self.db
            .connection()
            .call(|conn| {
                conn.query_row(
                    "SELECT updated_at FROM documents WHERE id = ?1",
                    params![PRIMARY_DOCUMENT_ID],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn read_document(&self) -> Result<Option<String>, HeirloomError> {
        self.db
            .connection()
            .call(|conn| {
                conn.query_row(
                    "SELECT body FROM documents WHERE id = ?1",
                    params![PRIMARY_DOCUMENT_ID],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn write_document(&self, body: &str) -> Result<(), HeirloomError> {
        let body = body.to_string();
        let bytes = body.len();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO documents (id, body, updated_at) VALUES (?1, ?2, ?3)",
                    params![PRIMARY_DOCUMENT_ID, body, updated_at],
                )
            })
            .await
            .map_err(map_tr_err)?;
        debug!(bytes, "document written");
        Ok(())
    }

    async fn delete_document(&self) -> Result<(), HeirloomError> {
        let removed = self
            .db
            .connection()
            .call(|conn| {
                conn.execute(
                    "DELETE FROM documents WHERE id = ?1",
                    params![PRIMARY_DOCUMENT_ID],
                )
            })
            .await
            .map_err(map_tr_err)?;
        debug!(removed, "document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn write_replaces_previous_body() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("doc.db").to_str().unwrap())
            .await
            .unwrap();
        let store = SqliteDocumentStore::new(db);

        assert_eq!(store.read_document().await.unwrap(), None);
        assert_eq!(store.updated_at().await.unwrap(), None);

        store.write_document(r#"{"pets":{}}"#).await.unwrap();
        store.write_document(r#"{"bills":{}}"#).await.unwrap();

        assert_eq!(
            store.read_document().await.unwrap().as_deref(),
            Some(r#"{"bills":{}}"#)
        );
        let stamp = store.updated_at().await.unwrap().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[tokio::test]
    async fn delete_removes_body_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("doc.db").to_str().unwrap())
            .await
            .unwrap();
        let store = SqliteDocumentStore::new(db);

        store.write_document(r#"{"pets":{}}"#).await.unwrap();
        store.delete_document().await.unwrap();
        assert_eq!(store.read_document().await.unwrap(), None);
        assert_eq!(store.updated_at().await.unwrap(), None);
        store.delete_document().await.unwrap();
    }
}
