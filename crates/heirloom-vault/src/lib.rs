// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Biometric-gated secret vault for Heirloom.
//!
//! [`BiometricVault`] wraps the user's master secret with a key that only a
//! successful biometric challenge can unlock. [`MasterSecret`] keeps an
//! Argon2id hash of that secret for typed unlock. [`SoftwareKeyStore`] is the
//! in-process key store used where no platform keystore is wired in.

pub mod crypto;
pub mod error;
pub mod master;
pub mod software;
pub mod vault;

pub use error::{AuthError, ClearError, EnrollError, SecretError};
pub use master::{MAX_SECRET_LEN, MIN_SECRET_LEN, MasterSecret, VerifiedSecret};
pub use software::SoftwareKeyStore;
pub use vault::BiometricVault;
