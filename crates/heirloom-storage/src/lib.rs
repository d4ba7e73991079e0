// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage for Heirloom.
//!
//! A WAL-mode database with embedded migrations holds two things: the
//! serialized document ([`SqliteDocumentStore`]) and the wrapped vault secret
//! ([`SqliteVaultStore`]). Both share one single-writer connection.

pub mod database;
pub mod document_store;
pub mod migrations;
pub mod vault_store;

pub use database::Database;
pub use document_store::{PRIMARY_DOCUMENT_ID, SqliteDocumentStore};
pub use vault_store::{SECRET_IV_KEY, SqliteVaultStore, WRAPPED_SECRET_KEY};
