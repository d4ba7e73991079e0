// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the platform boundary.
//!
//! The vault and the persistence engine only ever talk to the outside world
//! through these traits, so platform adapters (Android Keystore, Keychain,
//! SQLite) and in-memory fakes are interchangeable.

pub mod biometric;
pub mod document_store;
pub mod key_store;
pub mod observer;
pub mod settings_store;
pub mod vault_store;

pub use biometric::{BiometricChallenger, ChallengeError};
pub use document_store::DocumentStore;
pub use key_store::{BoundCipher, SecureKeyStore};
pub use observer::SecretRequiredObserver;
pub use settings_store::{CLEAR_ON_EXIT_SETTING, SECRET_HASH_SETTING, SettingsStore};
pub use vault_store::VaultStore;
