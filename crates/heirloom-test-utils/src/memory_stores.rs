// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vault, settings and document stores with failure injection.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use heirloom_core::types::VaultRecord;
use heirloom_core::{DocumentStore, HeirloomError, SettingsStore, VaultStore};

use crate::lock;

/// Vault store that keeps the record and settings in memory and counts every
/// record access.
#[derive(Debug, Default)]
pub struct MemoryVaultStore {
    record: Mutex<Option<VaultRecord>>,
    settings: Mutex<BTreeMap<String, String>>,
    loads: AtomicUsize,
    stores: AtomicUsize,
    clears: AtomicUsize,
    fail_loads: AtomicBool,
    fail_clears: AtomicBool,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Option<VaultRecord> {
        lock(&self.record).clone()
    }

    /// Replace the stored record directly, bypassing the counters.
    pub fn set_record(&self, record: Option<VaultRecord>) {
        *lock(&self.record) = record;
    }

    /// Make every subsequent `load_record` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `clear_record` fail, leaving the record.
    pub fn fail_clears(&self, fail: bool) {
        self.fail_clears.store(fail, Ordering::SeqCst);
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        lock(&self.settings).get(key).cloned()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Whether any method has been called.
    pub fn touched(&self) -> bool {
        self.load_count() + self.store_count() + self.clear_count() > 0
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    async fn load_record(&self) -> Result<Option<VaultRecord>, HeirloomError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(HeirloomError::storage("injected load failure"));
        }
        Ok(self.record())
    }

    async fn store_record(&self, record: &VaultRecord) -> Result<(), HeirloomError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        *lock(&self.record) = Some(record.clone());
        Ok(())
    }

    async fn clear_record(&self) -> Result<(), HeirloomError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(HeirloomError::storage("injected clear failure"));
        }
        lock(&self.record).take();
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryVaultStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, HeirloomError> {
        Ok(self.setting(key))
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), HeirloomError> {
        lock(&self.settings).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> Result<(), HeirloomError> {
        lock(&self.settings).remove(key);
        Ok(())
    }
}

/// Document store backed by a string in memory.
///
/// Writes can be made to fail a fixed number of times, or to take a while so
/// a write can be caught in flight.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    body: Mutex<Option<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
    failures_left: AtomicUsize,
    fail_deletes: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        let store = Self::default();
        *lock(&store.body) = Some(body.into());
        store
    }

    pub fn body(&self) -> Option<String> {
        lock(&self.body).clone()
    }

    /// The next `count` writes fail without changing the stored body.
    pub fn fail_next_writes(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Make every subsequent `delete_document` fail, leaving the body.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Every write sleeps for `delay` before completing.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *lock(&self.write_delay) = delay;
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Attempted writes, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_document(&self) -> Result<Option<String>, HeirloomError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.body())
    }

    async fn write_document(&self, body: &str) -> Result<(), HeirloomError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let delay = *lock(&self.write_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(HeirloomError::storage("injected write failure"));
        }
        *lock(&self.body) = Some(body.to_string());
        Ok(())
    }

    async fn delete_document(&self) -> Result<(), HeirloomError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(HeirloomError::storage("injected delete failure"));
        }
        lock(&self.body).take();
        Ok(())
    }
}
