// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hardware-backed symmetric key store.

use crate::error::KeyStoreError;
use crate::types::{CipherMode, KeyHandle};

/// Store of non-exportable symmetric keys addressed by alias.
///
/// Keys are expected to be bound to the current biometric enrollment: when the
/// enrolled set changes, every later [`prepare_cipher`](Self::prepare_cipher)
/// call for an existing key must fail with
/// [`KeyStoreError::KeyPermanentlyInvalidated`] rather than a generic error.
pub trait SecureKeyStore: Send + Sync {
    /// Creates a fresh key under `alias`, destroying any previous key.
    fn generate_or_replace(&self, alias: &str) -> Result<KeyHandle, KeyStoreError>;

    /// Looks up the key stored under `alias`.
    fn get_key(&self, alias: &str) -> Result<Option<KeyHandle>, KeyStoreError>;

    /// Deletes the key stored under `alias`. Deleting a missing key is an error
    /// the caller may ignore.
    fn delete_key(&self, alias: &str) -> Result<(), KeyStoreError>;

    /// Returns a cipher bound to `key`, ready to be unlocked by a biometric
    /// challenge.
    fn prepare_cipher(
        &self,
        key: &KeyHandle,
        mode: CipherMode,
    ) -> Result<Box<dyn BoundCipher>, KeyStoreError>;
}

/// A single-use cipher bound to one key and one IV.
pub trait BoundCipher: Send {
    fn mode(&self) -> &CipherMode;

    /// The IV in use. For encrypt mode this is the freshly generated IV that
    /// must be persisted alongside the ciphertext.
    fn iv(&self) -> Vec<u8>;

    /// Runs the cipher over `input`.
    fn finish(&mut self, input: &[u8]) -> Result<Vec<u8>, KeyStoreError>;
}
