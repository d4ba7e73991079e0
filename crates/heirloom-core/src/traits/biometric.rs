// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Biometric prompt collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::traits::key_store::BoundCipher;
use crate::types::{BiometricStatus, PromptInfo};

/// Why a biometric challenge did not hand back an unlocked cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    /// The user dismissed the prompt or pressed the negative button.
    #[error("challenge cancelled: {0}")]
    Cancelled(String),

    /// The sensor rejected the user or reported an error.
    #[error("challenge failed: {0}")]
    Failed(String),

    /// Authentication succeeded but the platform returned no cipher.
    #[error("authentication succeeded but cipher unavailable")]
    CipherUnavailable,
}

/// Presents a biometric prompt that unlocks a bound cipher.
///
/// `challenge` is the only point where vault operations suspend on the user.
/// It is never timed out by the caller.
#[async_trait]
pub trait BiometricChallenger: Send + Sync {
    /// Reports whether a strong biometric sensor is usable.
    async fn status(&self) -> BiometricStatus;

    /// Shows `prompt` and, on success, returns the cipher unlocked for one use.
    async fn challenge(
        &self,
        prompt: &PromptInfo,
        cipher: Box<dyn BoundCipher>,
    ) -> Result<Box<dyn BoundCipher>, ChallengeError>;
}
