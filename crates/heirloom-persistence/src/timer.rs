// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellable single-shot idle timer with last-call-wins semantics.
//!
//! Each [`IdleTimer::schedule`] call replaces the previous one. When the
//! window elapses the task is detached from the timer before it runs, so a
//! later `schedule` or `cancel` cannot abort it halfway through.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Slot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

pub struct IdleTimer {
    window: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl std::fmt::Debug for IdleTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleTimer")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl IdleTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Runs `task` once the window elapses without another `schedule` or
    /// `cancel`. Returns `false` if there is no tokio runtime to run it on.
    pub fn schedule<F, Fut>(&self, task: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            return false;
        };

        let mut slot = lock(&self.slot);
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(previous) = slot.handle.take() {
            previous.abort();
        }

        let shared = Arc::downgrade(&self.slot);
        let window = self.window;
        slot.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(window).await;
            {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                let mut slot = lock(&shared);
                if slot.generation != generation {
                    return;
                }
                // Detach before running.
                slot.handle = None;
            }
            task().await;
        }));
        true
    }

    /// Cancels the pending task. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        match slot.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).handle.is_some()
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
