// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable storage for the serialized document.

use async_trait::async_trait;

use crate::error::HeirloomError;

/// Durable storage for one serialized document.
///
/// Writes must be atomic from the caller's point of view: after a crash the
/// store holds either the previous body or the new one, never a mix.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the stored body, or `None` if nothing has been written yet.
    async fn read_document(&self) -> Result<Option<String>, HeirloomError>;

    async fn write_document(&self, body: &str) -> Result<(), HeirloomError>;

    /// Removes the stored body. Deleting an absent document succeeds.
    async fn delete_document(&self) -> Result<(), HeirloomError>;
}
