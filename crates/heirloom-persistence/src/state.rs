// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine bookkeeping and its public snapshot.

use std::sync::Arc;

use heirloom_document::Document;

/// Snapshot of the persistence engine's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceState {
    /// In-memory document differs from what is on disk.
    pub dirty: bool,
    /// A write to the document store is in flight.
    pub is_saving: bool,
    /// The document the next flush will write, if any.
    pub pending_document: Option<Arc<Document>>,
    /// Cached has-data flag.
    pub has_data: bool,
}

/// Result of a flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing to write.
    Clean,
    /// Another write holds the I/O lock; this flush was dropped.
    InFlight,
    Written,
    /// The write failed and the document is dirty again.
    Failed,
}

impl FlushOutcome {
    pub fn is_written(self) -> bool {
        matches!(self, FlushOutcome::Written)
    }
}

#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub(crate) dirty: bool,
    pub(crate) saving: bool,
    pub(crate) pending: Option<Arc<Document>>,
    pub(crate) has_data: bool,
    /// Bumped on every section edit; a flush compares it across its write.
    pub(crate) edits: u64,
}

impl EngineState {
    pub(crate) fn snapshot(&self) -> PersistenceState {
        PersistenceState {
            dirty: self.dirty,
            is_saving: self.saving,
            pending_document: self.pending.clone(),
            has_data: self.has_data,
        }
    }

    pub(crate) fn record_edit(&mut self, doc: Arc<Document>) {
        self.dirty = true;
        self.pending = Some(doc);
        self.edits = self.edits.wrapping_add(1);
    }

    /// Marks a document as durably stored.
    pub(crate) fn mark_clean(&mut self, has_data: bool) {
        self.dirty = false;
        self.pending = None;
        self.has_data = has_data;
    }
}
