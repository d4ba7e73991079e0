// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! The IV is chosen by the caller so a cipher can report it before it runs.
//! [`generate_iv`] draws a fresh 96-bit IV from the system CSPRNG; reusing an
//! IV under the same key breaks GCM.

use heirloom_core::KeyStoreError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// AES-GCM IV length in bytes.
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn less_safe_key(key: &[u8; 32]) -> Result<LessSafeKey, KeyStoreError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeyStoreError::Backend("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypts `plaintext`, returning ciphertext with the tag appended.
pub fn seal(key: &[u8; 32], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>, KeyStoreError> {
    let key = less_safe_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(*iv), Aad::empty(), &mut in_out)
        .map_err(|_| KeyStoreError::Backend("AES-256-GCM encryption failed".to_string()))?;
    Ok(in_out)
}

/// Decrypts `ciphertext` (tag included). Fails if the key is wrong or the data
/// was tampered with.
pub fn open(key: &[u8; 32], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, KeyStoreError> {
    let key = less_safe_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(*iv), Aad::empty(), in_out.as_mut_slice())
        .map_err(|_| {
            KeyStoreError::Backend(
                "AES-256-GCM decryption failed -- wrong key or corrupted data".to_string(),
            )
        })?;
    Ok(plaintext.to_vec())
}

/// Random 32-byte key for AES-256-GCM.
pub fn generate_random_key() -> Result<[u8; 32], KeyStoreError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| KeyStoreError::Backend("failed to generate random key".to_string()))?;
    Ok(key)
}

/// Random IV for one encryption.
pub fn generate_iv() -> Result<[u8; IV_LEN], KeyStoreError> {
    let mut iv = [0u8; IV_LEN];
    SystemRandom::new()
        .fill(&mut iv)
        .map_err(|_| KeyStoreError::Backend("failed to generate random IV".to_string()))?;
    Ok(iv)
}
