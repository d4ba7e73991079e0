// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key store that records how it is used.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use heirloom_core::types::{CipherMode, KeyHandle};
use heirloom_core::{BoundCipher, KeyStoreError, SecureKeyStore};
use heirloom_vault::SoftwareKeyStore;

use crate::lock;

/// Per-method call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStoreCalls {
    pub generate: usize,
    pub get: usize,
    pub delete: usize,
    pub prepare: usize,
}

impl KeyStoreCalls {
    pub fn total(&self) -> usize {
        self.generate + self.get + self.delete + self.prepare
    }
}

/// [`SoftwareKeyStore`] with call counting and one-shot failure injection.
#[derive(Debug, Default)]
pub struct MockKeyStore {
    inner: SoftwareKeyStore,
    generate: AtomicUsize,
    get: AtomicUsize,
    delete: AtomicUsize,
    prepare: AtomicUsize,
    next_prepare_error: Mutex<Option<KeyStoreError>>,
}

impl MockKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a biometric enrollment change: every stored key becomes
    /// permanently unusable.
    pub fn invalidate(&self) -> Result<(), KeyStoreError> {
        self.inner.invalidate_all()
    }

    /// The next `prepare_cipher` call fails with `error`.
    pub fn fail_next_prepare(&self, error: KeyStoreError) {
        *lock(&self.next_prepare_error) = Some(error);
    }

    pub fn calls(&self) -> KeyStoreCalls {
        KeyStoreCalls {
            generate: self.generate.load(Ordering::SeqCst),
            get: self.get.load(Ordering::SeqCst),
            delete: self.delete.load(Ordering::SeqCst),
            prepare: self.prepare.load(Ordering::SeqCst),
        }
    }

    pub fn contains(&self, alias: &str) -> bool {
        matches!(self.inner.get_key(alias), Ok(Some(_)))
    }
}

impl SecureKeyStore for MockKeyStore {
    fn generate_or_replace(&self, alias: &str) -> Result<KeyHandle, KeyStoreError> {
        self.generate.fetch_add(1, Ordering::SeqCst);
        self.inner.generate_or_replace(alias)
    }

    fn get_key(&self, alias: &str) -> Result<Option<KeyHandle>, KeyStoreError> {
        self.get.fetch_add(1, Ordering::SeqCst);
        self.inner.get_key(alias)
    }

    fn delete_key(&self, alias: &str) -> Result<(), KeyStoreError> {
        self.delete.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_key(alias)
    }

    fn prepare_cipher(
        &self,
        key: &KeyHandle,
        mode: CipherMode,
    ) -> Result<Box<dyn BoundCipher>, KeyStoreError> {
        self.prepare.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.next_prepare_error).take() {
            return Err(error);
        }
        self.inner.prepare_cipher(key, mode)
    }
}
