// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persistence engine: canonical document, dirty tracking and the
//! debounced idle flush.
//!
//! The canonical [`Document`] lives in a `watch` channel. Section edits swap
//! in a new document under a synchronous lock and arm the [`IdleTimer`];
//! every write to the [`DocumentStore`] (save, load, flush, wipe) runs under
//! a single async I/O lock. A flush that finds the lock taken is dropped, not
//! queued. The dirty flag only clears once a write has landed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use heirloom_config::{HasDataPolicy, PersistenceConfig};
use heirloom_core::error::HeirloomError;
use heirloom_core::traits::{DocumentStore, SecretRequiredObserver};
use heirloom_document::{Document, HasData, SectionUpdate, migrate_legacy};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::projection::SectionProjection;
use crate::state::{EngineState, FlushOutcome, PersistenceState};
use crate::timer::IdleTimer;

/// Owns the canonical document and keeps the document store in step with it.
///
/// Cloning is cheap; clones share the same document and timer.
#[derive(Clone)]
pub struct PersistenceEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    store: Arc<dyn DocumentStore>,
    config: PersistenceConfig,
    state: Mutex<EngineState>,
    io_lock: tokio::sync::Mutex<()>,
    document: watch::Sender<Arc<Document>>,
    observer: Option<Arc<dyn SecretRequiredObserver>>,
    timer: IdleTimer,
}

impl std::fmt::Debug for PersistenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceEngine")
            .field("config", &self.inner.config)
            .field("state", &self.state())
            .field("timer", &self.inner.timer)
            .finish()
    }
}

impl PersistenceEngine {
    /// Creates an engine holding an empty document.
    ///
    /// `observer` is told once when the document first gains data (see
    /// [`HasDataPolicy`] for when it can fire again).
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: PersistenceConfig,
        observer: Option<Arc<dyn SecretRequiredObserver>>,
    ) -> Self {
        let (document, _) = watch::channel(Arc::new(Document::default()));
        let timer = IdleTimer::new(config.idle_window());
        Self {
            inner: Arc::new(EngineInner {
                store,
                config,
                state: Mutex::new(EngineState::default()),
                io_lock: tokio::sync::Mutex::new(()),
                document,
                observer,
                timer,
            }),
        }
    }

    /// Writes `doc` to the store and makes it canonical.
    ///
    /// Legacy custom fields are migrated first so they are never dropped on
    /// write. Cancels any pending idle flush. On failure the canonical
    /// document and dirty flag are left as they were and the error is
    /// returned.
    pub async fn save(&self, mut doc: Document) -> Result<(), HeirloomError> {
        let inner = &self.inner;
        inner.timer.cancel();
        let report = migrate_legacy(&mut doc);
        if !report.is_empty() {
            debug!(
                subsections = report.subsections_migrated,
                "migrated legacy custom fields before save"
            );
        }
        let doc = Arc::new(doc);

        let _io = inner.io_lock.lock().await;
        inner.lock_state().saving = true;
        let result = inner.write(&doc).await;

        let mut state = inner.lock_state();
        state.saving = false;
        match result {
            Ok(()) => {
                state.mark_clean(doc.has_data());
                inner.document.send_replace(doc);
                debug!("document saved");
                Ok(())
            }
            Err(e) => {
                let dirty = state.dirty;
                drop(state);
                warn!(error = %e, "document save failed");
                if dirty {
                    inner.schedule_flush();
                }
                Err(e)
            }
        }
    }

    /// Replaces one section of the canonical document and arms the idle flush.
    ///
    /// Must be called from within a tokio runtime for the flush to be
    /// scheduled; otherwise the edit is kept dirty until the next flush.
    pub fn update_section(&self, update: SectionUpdate) {
        let inner = &self.inner;
        let section = update.name();

        let became_sensitive = {
            let mut state = inner.lock_state();
            let current = Arc::clone(&inner.document.borrow());
            let next = Arc::new(current.with_section(update));

            let had_data = state.has_data;
            let has_data = match inner.config.has_data_policy {
                HasDataPolicy::Latch => had_data || next.has_data(),
                HasDataPolicy::Rearm => next.has_data(),
            };
            state.has_data = has_data;
            state.record_edit(Arc::clone(&next));
            inner.document.send_replace(next);
            !had_data && has_data
        };

        debug!(%section, "section updated");
        if became_sensitive {
            if let Some(observer) = &inner.observer {
                info!("document now holds data; secret required");
                observer.on_secret_required();
            }
        }
        inner.schedule_flush();
    }

    /// [`update_section`](Self::update_section) for callers that address
    /// sections by name with a JSON payload.
    pub fn update_section_json(&self, name: &str, value: Value) -> Result<(), HeirloomError> {
        let update = SectionUpdate::from_json(name, value)?;
        self.update_section(update);
        Ok(())
    }

    /// Reads the stored document, migrating legacy shapes, and makes it
    /// canonical. A missing document loads as empty.
    pub async fn load(&self) -> Result<Arc<Document>, HeirloomError> {
        let inner = &self.inner;
        inner.timer.cancel();
        let _io = inner.io_lock.lock().await;

        let mut doc = match inner.store.read_document().await? {
            Some(body) => Document::from_json(&body)?,
            None => {
                debug!("no stored document; starting empty");
                Document::default()
            }
        };

        let report = migrate_legacy(&mut doc);
        if !report.is_empty() {
            info!(
                subsections = report.subsections_migrated,
                fields = report.fields_converted,
                "migrated legacy custom fields on load"
            );
        }
        if inner.config.reconcile_on_load {
            let removed = doc.reconcile_custom_items();
            if removed > 0 {
                info!(removed, "dropped custom item values with unknown field ids");
            }
        }

        let doc = Arc::new(doc);
        inner.lock_state().mark_clean(doc.has_data());
        inner.document.send_replace(Arc::clone(&doc));
        debug!(has_data = doc.has_data(), "document loaded");
        Ok(doc)
    }

    /// Deletes the stored document and resets to an empty, clean document.
    ///
    /// Cancels the idle timer and waits for any in-flight write first. On
    /// failure nothing in memory changes.
    pub async fn wipe(&self) -> Result<(), HeirloomError> {
        let inner = &self.inner;
        inner.timer.cancel();
        let _io = inner.io_lock.lock().await;

        inner.store.delete_document().await?;
        inner.lock_state().mark_clean(false);
        inner.document.send_replace(Arc::new(Document::default()));
        info!("stored document wiped");
        Ok(())
    }

    /// Writes the pending document if dirty. Failures are logged and leave
    /// the engine dirty for the next attempt.
    pub async fn flush(&self) -> FlushOutcome {
        self.inner.flush().await
    }

    /// Cancels the idle timer and flushes immediately.
    pub async fn flush_now(&self) -> FlushOutcome {
        self.inner.timer.cancel();
        self.inner.flush().await
    }

    /// Waits for any in-flight write, then flushes what is left.
    pub async fn shutdown(&self) -> FlushOutcome {
        self.inner.timer.cancel();
        drop(self.inner.io_lock.lock().await);
        let outcome = self.inner.flush().await;
        info!(?outcome, "persistence engine shut down");
        outcome
    }

    pub fn document(&self) -> Arc<Document> {
        Arc::clone(&self.inner.document.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.inner.document.subscribe()
    }

    pub fn state(&self) -> PersistenceState {
        self.inner.lock_state().snapshot()
    }

    pub fn has_data(&self) -> bool {
        self.inner.lock_state().has_data
    }

    /// Builds a projection over one section of the canonical document.
    pub fn project<S, V>(
        &self,
        select: fn(&Document) -> &Arc<S>,
        derive: impl Fn(&S) -> V + Send + Sync + 'static,
    ) -> SectionProjection<S, V> {
        SectionProjection::new(self.subscribe(), select, derive)
    }
}

impl EngineInner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn write(&self, doc: &Document) -> Result<(), HeirloomError> {
        let body = doc.to_json()?;
        self.store.write_document(&body).await
    }

    fn schedule_flush(self: &Arc<Self>) {
        let engine = Arc::downgrade(self);
        let scheduled = self.timer.schedule(move || async move {
            if let Some(inner) = engine.upgrade() {
                inner.flush().await;
            }
        });
        if !scheduled {
            warn!("no tokio runtime; idle flush not scheduled");
        }
    }

    async fn flush(self: &Arc<Self>) -> FlushOutcome {
        let Ok(_io) = self.io_lock.try_lock() else {
            debug!("write in flight; flush dropped");
            return FlushOutcome::InFlight;
        };

        let (doc, edits) = {
            let mut state = self.lock_state();
            if !state.dirty {
                return FlushOutcome::Clean;
            }
            state.saving = true;
            let doc = match &state.pending {
                Some(doc) => Arc::clone(doc),
                None => Arc::clone(&self.document.borrow()),
            };
            (doc, state.edits)
        };

        let result = self.write(&doc).await;

        let (outcome, edited_meanwhile) = {
            let mut state = self.lock_state();
            state.saving = false;
            let edited_meanwhile = state.edits != edits;
            let outcome = match result {
                Ok(()) => {
                    if !edited_meanwhile {
                        state.dirty = false;
                        state.pending = None;
                    }
                    debug!("idle flush written");
                    FlushOutcome::Written
                }
                Err(e) => {
                    warn!(error = %e, "flush failed; document stays dirty");
                    if state.pending.is_none() {
                        state.pending = Some(doc);
                    }
                    FlushOutcome::Failed
                }
            };
            (outcome, edited_meanwhile)
        };

        // Edits made during the write may have had their timer fire into the
        // held lock.
        if edited_meanwhile && !self.timer.is_pending() {
            self.schedule_flush();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use heirloom_document::{BankAccount, FinancialSection};

    use super::*;

    #[derive(Default)]
    struct VecStore {
        body: Mutex<Option<String>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for VecStore {
        async fn read_document(&self) -> Result<Option<String>, HeirloomError> {
            Ok(self.body.lock().unwrap().clone())
        }

        async fn write_document(&self, body: &str) -> Result<(), HeirloomError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.body.lock().unwrap() = Some(body.to_string());
            Ok(())
        }

        async fn delete_document(&self) -> Result<(), HeirloomError> {
            *self.body.lock().unwrap() = None;
            Ok(())
        }
    }

    fn engine(store: &Arc<VecStore>) -> PersistenceEngine {
        PersistenceEngine::new(
            Arc::clone(store) as Arc<dyn DocumentStore>,
            PersistenceConfig::default(),
            None,
        )
    }

    fn financial_with_account() -> SectionUpdate {
        SectionUpdate::Financial(FinancialSection {
            bank_accounts: vec![BankAccount {
                name: "Checking".into(),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn update_marks_dirty_and_keeps_pending() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);

        engine.update_section(financial_with_account());

        let state = engine.state();
        assert!(state.dirty);
        assert!(state.has_data);
        assert!(!state.is_saving);
        assert_eq!(state.pending_document, Some(engine.document()));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_when_clean_does_nothing() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);

        assert_eq!(engine.flush().await, FlushOutcome::Clean);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_now_writes_without_waiting() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);

        engine.update_section(financial_with_account());
        assert_eq!(engine.flush_now().await, FlushOutcome::Written);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert!(!engine.state().dirty);

        // Timer was cancelled; nothing more is written.
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_section_name_leaves_state_untouched() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);
        let before = engine.document();

        let err = engine
            .update_section_json("garage", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, HeirloomError::Validation(_)));
        assert!(Arc::ptr_eq(&before, &engine.document()));
        assert!(!engine.state().dirty);
    }

    #[tokio::test]
    async fn load_of_corrupt_body_is_storage_error() {
        let store = Arc::new(VecStore::default());
        *store.body.lock().unwrap() = Some("{not json".into());
        let engine = engine(&store);
        let before = engine.document();

        let err = engine.load().await.unwrap_err();
        assert!(matches!(err, HeirloomError::Storage { .. }));
        assert!(Arc::ptr_eq(&before, &engine.document()));
    }

    #[test]
    fn update_outside_runtime_stays_dirty() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);

        engine.update_section(financial_with_account());
        assert!(engine.state().dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn wipe_deletes_and_resets_to_empty() {
        let store = Arc::new(VecStore::default());
        let engine = engine(&store);
        engine.update_section(financial_with_account());
        engine.flush_now().await;
        engine.update_section(financial_with_account());

        engine.wipe().await.unwrap();

        assert!(store.body.lock().unwrap().is_none());
        assert_eq!(*engine.document(), Document::default());
        assert_eq!(engine.state(), PersistenceState::default());

        // The cancelled timer never writes the wiped edit back.
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert!(store.body.lock().unwrap().is_none());
    }
}
