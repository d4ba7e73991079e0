// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types passed across collaborator trait boundaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The wrapped secret: ciphertext plus the IV it was produced with.
///
/// Debug output omits both fields.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub encrypted_secret: Vec<u8>,
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultRecord")
            .field("encrypted_secret", &format_args!("[{} bytes]", self.encrypted_secret.len()))
            .field("iv", &format_args!("[{} bytes]", self.iv.len()))
            .finish()
    }
}

/// Opaque reference to a non-exportable key held by the key store.
///
/// Only the alias is ever visible to the process; key material stays with the
/// platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyHandle {
    alias: String,
}

impl KeyHandle {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Direction a bound cipher operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherMode {
    /// Encrypt; the cipher chooses a fresh IV.
    Encrypt,
    /// Decrypt with the IV stored alongside the ciphertext.
    Decrypt { iv: Vec<u8> },
}

/// Sensor state reported by the biometric collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BiometricStatus {
    /// A strong biometric sensor is present and at least one factor is enrolled.
    Ready,
    /// A sensor is present but the user has not enrolled any factor.
    NoneEnrolled,
    /// No usable sensor (absent, disabled, or hardware error).
    Unavailable,
}

/// Result of an availability check, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricAvailability {
    pub available: bool,
    pub enrolled: bool,
}

impl From<BiometricStatus> for BiometricAvailability {
    fn from(status: BiometricStatus) -> Self {
        match status {
            BiometricStatus::Ready => Self {
                available: true,
                enrolled: true,
            },
            BiometricStatus::NoneEnrolled => Self {
                available: true,
                enrolled: false,
            },
            BiometricStatus::Unavailable => Self {
                available: false,
                enrolled: false,
            },
        }
    }
}

/// Copy shown on the platform biometric prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptInfo {
    pub title: String,
    pub subtitle: String,
    pub negative_button: String,
}

impl PromptInfo {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        negative_button: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            negative_button: negative_button.into(),
        }
    }
}
