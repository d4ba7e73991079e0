// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heirloom data lifecycle.
//!
//! [`DataWiper`] removes everything Heirloom keeps on the device: the stored
//! document, the master secret hash, the biometric enrollment and the
//! settings. It runs on demand (gated by the master secret or a typed
//! confirmation phrase) or at exit when the user has asked for that.

pub mod error;
pub mod wipe;

pub use error::WipeError;
pub use wipe::{CLEAR_ALL_CONFIRMATION, DataWiper, ExitOutcome};
