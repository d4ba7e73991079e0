// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process [`SecureKeyStore`] for hosts without a platform keystore.
//!
//! Keys are random 256-bit values kept in zeroizing memory for the life of the
//! process. [`SoftwareKeyStore::invalidate_all`] marks every key permanently
//! unusable, which is what a platform keystore does when the enrolled
//! biometric set changes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use heirloom_core::{BoundCipher, CipherMode, KeyHandle, KeyStoreError, SecureKeyStore};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{self, IV_LEN};

struct StoredKey {
    material: Zeroizing<[u8; 32]>,
    invalidated: bool,
}

/// Software key store backed by ring AES-256-GCM.
#[derive(Default)]
pub struct SoftwareKeyStore {
    keys: Mutex<HashMap<String, StoredKey>>,
}

impl std::fmt::Debug for SoftwareKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let aliases: Vec<String> = self
            .keys
            .lock()
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("SoftwareKeyStore")
            .field("aliases", &aliases)
            .field("material", &"[REDACTED]")
            .finish()
    }
}

impl SoftwareKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permanently invalidates every stored key.
    pub fn invalidate_all(&self) -> Result<(), KeyStoreError> {
        let mut keys = self.lock()?;
        for key in keys.values_mut() {
            key.invalidated = true;
        }
        debug!(count = keys.len(), "software keys invalidated");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoredKey>>, KeyStoreError> {
        self.keys
            .lock()
            .map_err(|_| KeyStoreError::Backend("key store lock poisoned".to_string()))
    }
}

impl SecureKeyStore for SoftwareKeyStore {
    fn generate_or_replace(&self, alias: &str) -> Result<KeyHandle, KeyStoreError> {
        let material = Zeroizing::new(crypto::generate_random_key()?);
        self.lock()?.insert(
            alias.to_string(),
            StoredKey {
                material,
                invalidated: false,
            },
        );
        debug!(alias = %alias, "software key generated");
        Ok(KeyHandle::new(alias))
    }

    fn get_key(&self, alias: &str) -> Result<Option<KeyHandle>, KeyStoreError> {
        Ok(self
            .lock()?
            .contains_key(alias)
            .then(|| KeyHandle::new(alias)))
    }

    fn delete_key(&self, alias: &str) -> Result<(), KeyStoreError> {
        match self.lock()?.remove(alias) {
            Some(_) => Ok(()),
            None => Err(KeyStoreError::KeyNotFound(alias.to_string())),
        }
    }

    fn prepare_cipher(
        &self,
        key: &KeyHandle,
        mode: CipherMode,
    ) -> Result<Box<dyn BoundCipher>, KeyStoreError> {
        let material = {
            let keys = self.lock()?;
            let stored = keys
                .get(key.alias())
                .ok_or_else(|| KeyStoreError::KeyNotFound(key.alias().to_string()))?;
            if stored.invalidated {
                return Err(KeyStoreError::KeyPermanentlyInvalidated);
            }
            Zeroizing::new(*stored.material)
        };

        let iv = match &mode {
            CipherMode::Encrypt => crypto::generate_iv()?,
            CipherMode::Decrypt { iv } => iv.as_slice().try_into().map_err(|_| {
                KeyStoreError::Backend(format!(
                    "invalid IV length {} (expected {IV_LEN})",
                    iv.len()
                ))
            })?,
        };

        Ok(Box::new(SoftwareCipher {
            material,
            mode,
            iv,
            used: false,
        }))
    }
}

/// Single-use AES-256-GCM cipher handed out by [`SoftwareKeyStore`].
struct SoftwareCipher {
    material: Zeroizing<[u8; 32]>,
    mode: CipherMode,
    iv: [u8; IV_LEN],
    used: bool,
}

impl BoundCipher for SoftwareCipher {
    fn mode(&self) -> &CipherMode {
        &self.mode
    }

    fn iv(&self) -> Vec<u8> {
        self.iv.to_vec()
    }

    fn finish(&mut self, input: &[u8]) -> Result<Vec<u8>, KeyStoreError> {
        if self.used {
            return Err(KeyStoreError::Backend("cipher already used".to_string()));
        }
        self.used = true;
        match self.mode {
            CipherMode::Encrypt => crypto::seal(&self.material, &self.iv, input),
            CipherMode::Decrypt { .. } => crypto::open(&self.material, &self.iv, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIAS: &str = "test_key";

    fn encrypt(store: &SoftwareKeyStore, plaintext: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let key = store.get_key(ALIAS).unwrap().unwrap();
        let mut cipher = store.prepare_cipher(&key, CipherMode::Encrypt).unwrap();
        let iv = cipher.iv();
        (cipher.finish(plaintext).unwrap(), iv)
    }

    #[test]
    fn encrypt_then_decrypt() {
        let store = SoftwareKeyStore::new();
        let key = store.generate_or_replace(ALIAS).unwrap();
        let (ciphertext, iv) = encrypt(&store, b"open sesame");
        assert_eq!(iv.len(), IV_LEN);

        let mut cipher = store
            .prepare_cipher(&key, CipherMode::Decrypt { iv })
            .unwrap();
        assert_eq!(cipher.finish(&ciphertext).unwrap(), b"open sesame");
    }

    #[test]
    fn replacing_key_breaks_old_ciphertext() {
        let store = SoftwareKeyStore::new();
        store.generate_or_replace(ALIAS).unwrap();
        let (ciphertext, iv) = encrypt(&store, b"old");

        let key = store.generate_or_replace(ALIAS).unwrap();
        let mut cipher = store
            .prepare_cipher(&key, CipherMode::Decrypt { iv })
            .unwrap();
        assert!(matches!(
            cipher.finish(&ciphertext),
            Err(KeyStoreError::Backend(_))
        ));
    }

    #[test]
    fn invalidated_keys_refuse_ciphers() {
        let store = SoftwareKeyStore::new();
        let key = store.generate_or_replace(ALIAS).unwrap();
        store.invalidate_all().unwrap();

        assert!(store.get_key(ALIAS).unwrap().is_some());
        assert_eq!(
            store.prepare_cipher(&key, CipherMode::Encrypt).err(),
            Some(KeyStoreError::KeyPermanentlyInvalidated)
        );

        // A regenerated key is usable again.
        let key = store.generate_or_replace(ALIAS).unwrap();
        assert!(store.prepare_cipher(&key, CipherMode::Encrypt).is_ok());
    }

    #[test]
    fn missing_key_is_reported() {
        let store = SoftwareKeyStore::new();
        let handle = KeyHandle::new(ALIAS);
        assert!(store.get_key(ALIAS).unwrap().is_none());
        assert!(matches!(
            store.prepare_cipher(&handle, CipherMode::Encrypt),
            Err(KeyStoreError::KeyNotFound(_))
        ));
        assert!(matches!(
            store.delete_key(ALIAS),
            Err(KeyStoreError::KeyNotFound(_))
        ));
    }

    #[test]
    fn ciphers_are_single_use() {
        let store = SoftwareKeyStore::new();
        let key = store.generate_or_replace(ALIAS).unwrap();
        let mut cipher = store.prepare_cipher(&key, CipherMode::Encrypt).unwrap();
        cipher.finish(b"once").unwrap();
        assert!(cipher.finish(b"twice").is_err());
    }

    #[test]
    fn short_iv_is_rejected() {
        let store = SoftwareKeyStore::new();
        let key = store.generate_or_replace(ALIAS).unwrap();
        let result = store.prepare_cipher(&key, CipherMode::Decrypt { iv: vec![0; 4] });
        assert!(matches!(result, Err(KeyStoreError::Backend(m)) if m.contains("IV length")));
    }

    #[test]
    fn debug_hides_key_material() {
        let store = SoftwareKeyStore::new();
        store.generate_or_replace(ALIAS).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains(ALIAS));
        assert!(debug.contains("[REDACTED]"));
    }
}
