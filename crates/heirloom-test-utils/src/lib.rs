// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Heirloom integration tests.
//!
//! Provides fakes for every collaborator trait and a harness that wires them
//! to a [`BiometricVault`](heirloom_vault::BiometricVault) and a
//! [`PersistenceEngine`](heirloom_persistence::PersistenceEngine), so tests
//! run without a sensor, a platform key store or a real disk.
//!
//! # Components
//!
//! - [`MockChallenger`] - biometric prompt with scripted outcomes
//! - [`MockKeyStore`] - software key store that counts calls
//! - [`MemoryVaultStore`] / [`MemoryDocumentStore`] - in-memory stores with failure injection;
//!   the vault store also holds settings
//! - [`RecordingObserver`] - counts secret-required notifications
//! - [`TestHarness`] - all of the above assembled

pub mod harness;
pub mod memory_stores;
pub mod mock_challenger;
pub mod mock_key_store;
pub mod observer;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_stores::{MemoryDocumentStore, MemoryVaultStore};
pub use mock_challenger::{ChallengeOutcome, MockChallenger};
pub use mock_key_store::{KeyStoreCalls, MockKeyStore};
pub use observer::RecordingObserver;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a std mutex, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
