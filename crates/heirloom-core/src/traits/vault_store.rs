// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable storage for the wrapped secret.

use async_trait::async_trait;

use crate::error::HeirloomError;
use crate::types::VaultRecord;

/// Durable key/value storage holding at most one [`VaultRecord`].
///
/// Both halves of the record are written and removed together. A store that
/// finds only one half must report the record as absent.
#[async_trait]
pub trait VaultStore: Send + Sync {
    async fn load_record(&self) -> Result<Option<VaultRecord>, HeirloomError>;

    async fn store_record(&self, record: &VaultRecord) -> Result<(), HeirloomError>;

    /// Removes the record. Removing an absent record succeeds.
    async fn clear_record(&self) -> Result<(), HeirloomError>;
}
