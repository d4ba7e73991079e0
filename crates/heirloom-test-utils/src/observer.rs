// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicUsize, Ordering};

use heirloom_core::SecretRequiredObserver;

/// Counts secret-required notifications.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    count: AtomicUsize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl SecretRequiredObserver for RecordingObserver {
    fn on_secret_required(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
