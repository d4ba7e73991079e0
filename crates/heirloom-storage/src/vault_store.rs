// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`VaultStore`] and [`SettingsStore`] over the `vault_meta` key/value
//! table.

use async_trait::async_trait;
use heirloom_core::{HeirloomError, SettingsStore, VaultRecord, VaultStore};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, warn};

use crate::database::{Database, map_tr_err};

/// `vault_meta` key holding the ciphertext.
pub const WRAPPED_SECRET_KEY: &str = "wrapped_secret";

/// `vault_meta` key holding the IV.
pub const SECRET_IV_KEY: &str = "secret_iv";

/// SQLite-backed vault record storage.
#[derive(Debug, Clone)]
pub struct SqliteVaultStore {
    db: Database,
}

impl SqliteVaultStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VaultStore for SqliteVaultStore {
    async fn load_record(&self) -> Result<Option<VaultRecord>, HeirloomError> {
        let (secret, iv) = self
            .db
            .connection()
            .call(|conn| -> Result<(Option<Vec<u8>>, Option<Vec<u8>>), rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT value FROM vault_meta WHERE key = ?1")?;
                let secret = stmt
                    .query_row(params![WRAPPED_SECRET_KEY], |row| row.get(0))
                    .optional()?;
                let iv = stmt
                    .query_row(params![SECRET_IV_KEY], |row| row.get(0))
                    .optional()?;
                Ok((secret, iv))
            })
            .await
            .map_err(map_tr_err)?;

        match (secret, iv) {
            (Some(encrypted_secret), Some(iv)) => Ok(Some(VaultRecord {
                encrypted_secret,
                iv,
            })),
            (None, None) => Ok(None),
            (secret, iv) => {
                warn!(
                    has_secret = secret.is_some(),
                    has_iv = iv.is_some(),
                    "incomplete vault record treated as absent"
                );
                Ok(None)
            }
        }
    }

    async fn store_record(&self, record: &VaultRecord) -> Result<(), HeirloomError> {
        let secret = record.encrypted_secret.clone();
        let iv = record.iv.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                    params![WRAPPED_SECRET_KEY, secret],
                )?;
                tx.execute(
                    "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                    params![SECRET_IV_KEY, iv],
                )?;
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;
        debug!("vault record stored");
        Ok(())
    }

    async fn clear_record(&self) -> Result<(), HeirloomError> {
        let removed = self
            .db
            .connection()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                let tx = conn.transaction()?;
                let removed = tx.execute(
                    "DELETE FROM vault_meta WHERE key IN (?1, ?2)",
                    params![WRAPPED_SECRET_KEY, SECRET_IV_KEY],
                )?;
                tx.commit()?;
                Ok(removed)
            })
            .await
            .map_err(map_tr_err)?;
        debug!(removed, "vault record cleared");
        Ok(())
    }
}

fn reject_record_key(key: &str) -> Result<(), HeirloomError> {
    if key == WRAPPED_SECRET_KEY || key == SECRET_IV_KEY {
        return Err(HeirloomError::Validation(format!(
            "`{key}` is reserved for the vault record"
        )));
    }
    Ok(())
}

#[async_trait]
impl SettingsStore for SqliteVaultStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, HeirloomError> {
        reject_record_key(key)?;
        let key = key.to_string();
        let value: Option<Vec<u8>> = self
            .db
            .connection()
            .call(move |conn| {
                conn.query_row(
                    "SELECT value FROM vault_meta WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)?;
        value
            .map(|bytes| String::from_utf8(bytes).map_err(HeirloomError::storage))
            .transpose()
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), HeirloomError> {
        reject_record_key(key)?;
        let key = key.to_string();
        let value = value.as_bytes().to_vec();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )
            })
            .await
            .map_err(map_tr_err)?;
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> Result<(), HeirloomError> {
        reject_record_key(key)?;
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| conn.execute("DELETE FROM vault_meta WHERE key = ?1", params![key]))
            .await
            .map_err(map_tr_err)?;
        Ok(())
    }
}
