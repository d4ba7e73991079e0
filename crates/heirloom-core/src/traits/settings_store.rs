// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small durable settings that live beside the vault record.

use async_trait::async_trait;

use crate::error::HeirloomError;

/// `settings` key holding the master secret's PHC hash string.
pub const SECRET_HASH_SETTING: &str = "secret_hash";

/// `settings` key holding the clear-on-exit flag (`"true"` / `"false"`).
pub const CLEAR_ON_EXIT_SETTING: &str = "clear_on_exit";

/// Durable string settings keyed by name.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, HeirloomError>;

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), HeirloomError>;

    /// Removes the setting. Removing an absent setting succeeds.
    async fn delete_setting(&self, key: &str) -> Result<(), HeirloomError>;
}
