// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Heirloom.
//!
//! This crate provides the error taxonomy, the shared types, and the
//! collaborator traits the vault and the persistence engine are written
//! against. Platform adapters implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorClass, HeirloomError, KeyStoreError};
pub use types::{
    BiometricAvailability, BiometricStatus, CipherMode, KeyHandle, PromptInfo, VaultRecord,
};

pub use traits::{
    BiometricChallenger, BoundCipher, CLEAR_ON_EXIT_SETTING, ChallengeError, DocumentStore,
    SECRET_HASH_SETTING, SecretRequiredObserver, SecureKeyStore, SettingsStore, VaultStore,
};
