// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: enroll, authenticate, and clear a biometric-wrapped secret.
//!
//! The secret is encrypted with a non-exportable key from the
//! [`SecureKeyStore`]. The cipher bound to that key is only usable after the
//! [`BiometricChallenger`] succeeds, so the secret can only be recovered by
//! the enrolled user. When the platform invalidates the key (the enrolled
//! biometric set changed) the stored record is deleted and the user has to
//! enroll again.
//!
//! ```text
//! Unenrolled --enroll ok--> Enrolled --clear--> Unenrolled
//!                           Enrolled --authenticate: key invalidated--> Unenrolled
//! ```

use std::sync::Arc;

use heirloom_config::VaultConfig;
use heirloom_core::{
    BiometricAvailability, BiometricChallenger, BoundCipher, ChallengeError, CipherMode,
    KeyHandle, KeyStoreError, PromptInfo, SecureKeyStore, VaultRecord, VaultStore,
};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::{AuthError, ClearError, EnrollError};
use crate::master::VerifiedSecret;

/// A user secret wrapped behind a biometric-bound key.
///
/// Operations on one vault are serialized, so a `clear` never interleaves
/// with key preparation in `enroll` or `authenticate`.
pub struct BiometricVault {
    key_store: Arc<dyn SecureKeyStore>,
    challenger: Arc<dyn BiometricChallenger>,
    store: Arc<dyn VaultStore>,
    config: VaultConfig,
    op_lock: Mutex<()>,
}

impl std::fmt::Debug for BiometricVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiometricVault")
            .field("key_alias", &self.config.key_alias)
            .finish_non_exhaustive()
    }
}

/// Outcome of a challenge, before it is mapped to an operation-specific error.
enum Challenge {
    Unlocked(Box<dyn BoundCipher>),
    Cancelled,
    NoCipher,
}

impl BiometricVault {
    pub fn new(
        key_store: Arc<dyn SecureKeyStore>,
        challenger: Arc<dyn BiometricChallenger>,
        store: Arc<dyn VaultStore>,
        config: VaultConfig,
    ) -> Self {
        Self {
            key_store,
            challenger,
            store,
            config,
            op_lock: Mutex::new(()),
        }
    }

    pub fn key_alias(&self) -> &str {
        &self.config.key_alias
    }

    /// Reports whether biometric unlock can be offered. Never fails: a
    /// missing sensor is reported as unavailable.
    pub async fn check_availability(&self) -> BiometricAvailability {
        let status = self.challenger.status().await;
        debug!(status = %status, "biometric availability checked");
        status.into()
    }

    /// Whether a wrapped secret is stored.
    pub async fn has_enrollment(&self) -> Result<bool, AuthError> {
        let record = self
            .store
            .load_record()
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(record.is_some())
    }

    /// Wraps `secret` behind a freshly generated key.
    ///
    /// Any previous enrollment is replaced. Nothing is written unless the
    /// biometric challenge succeeds.
    pub async fn enroll(&self, secret: &SecretString) -> Result<(), EnrollError> {
        if secret.expose_secret().is_empty() {
            debug!("enroll rejected: empty secret");
            return Err(EnrollError::EmptySecret);
        }

        let _guard = self.op_lock.lock().await;
        let alias = self.key_alias();

        let key = self
            .key_store
            .generate_or_replace(alias)
            .map_err(enroll_failed)?;
        let cipher = self
            .key_store
            .prepare_cipher(&key, CipherMode::Encrypt)
            .map_err(enroll_failed)?;

        let mut cipher = match self.challenge(&self.config.enroll_prompt(), cipher).await {
            Challenge::Unlocked(cipher) => cipher,
            Challenge::Cancelled => return Err(EnrollError::UserCancelled),
            Challenge::NoCipher => {
                return Err(EnrollError::EnrollmentFailed(
                    ChallengeError::CipherUnavailable.to_string(),
                ));
            }
        };

        let plaintext = Zeroizing::new(secret.expose_secret().as_bytes().to_vec());
        let encrypted_secret = cipher.finish(&plaintext).map_err(enroll_failed)?;
        let record = VaultRecord {
            encrypted_secret,
            iv: cipher.iv(),
        };

        self.store
            .store_record(&record)
            .await
            .map_err(|e| EnrollError::EnrollmentFailed(e.to_string()))?;

        info!(alias = %alias, "biometric enrollment complete");
        Ok(())
    }

    /// [`enroll`](Self::enroll) for a secret already checked against the
    /// stored master secret hash.
    pub async fn enroll_verified(&self, secret: &VerifiedSecret) -> Result<(), EnrollError> {
        self.enroll(secret.secret()).await
    }

    /// Recovers the secret after a successful biometric challenge.
    ///
    /// If the key is gone or permanently invalidated, the stored record is
    /// removed and [`AuthError::KeyInvalidated`] is returned. The next call
    /// then reports [`AuthError::NoEnrollment`].
    pub async fn authenticate(&self) -> Result<SecretString, AuthError> {
        let _guard = self.op_lock.lock().await;

        let record = self
            .store
            .load_record()
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let Some(record) = record else {
            debug!("authenticate: no enrollment");
            return Err(AuthError::NoEnrollment);
        };

        let alias = self.key_alias();
        let key = match self.key_store.get_key(alias) {
            Ok(Some(key)) => key,
            Ok(None) | Err(KeyStoreError::KeyPermanentlyInvalidated) => {
                return Err(self.invalidate("key missing").await);
            }
            Err(e) => return Err(AuthError::DecryptionFailed(e.to_string())),
        };

        let cipher = match self.prepare_decrypt(&key, &record) {
            Ok(cipher) => cipher,
            Err(KeyStoreError::KeyPermanentlyInvalidated) => {
                return Err(self.invalidate("key permanently invalidated").await);
            }
            Err(KeyStoreError::KeyNotFound(_)) => {
                return Err(self.invalidate("key missing").await);
            }
            Err(e) => return Err(AuthError::DecryptionFailed(e.to_string())),
        };

        let mut cipher = match self.challenge(&self.config.unlock_prompt(), cipher).await {
            Challenge::Unlocked(cipher) => cipher,
            Challenge::Cancelled => return Err(AuthError::UserCancelled),
            Challenge::NoCipher => {
                return Err(AuthError::DecryptionFailed(
                    ChallengeError::CipherUnavailable.to_string(),
                ));
            }
        };

        let plaintext = match cipher.finish(&record.encrypted_secret) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(KeyStoreError::KeyPermanentlyInvalidated) => {
                return Err(self.invalidate("key permanently invalidated").await);
            }
            Err(e) => return Err(AuthError::DecryptionFailed(e.to_string())),
        };
        let secret = std::str::from_utf8(&plaintext)
            .map_err(|e| AuthError::DecryptionFailed(format!("secret is not valid UTF-8: {e}")))?;

        info!(alias = %alias, "biometric authentication succeeded");
        Ok(SecretString::from(secret.to_owned()))
    }

    /// Removes the stored record and deletes the key. Safe to call when
    /// nothing is enrolled.
    pub async fn clear(&self) -> Result<(), ClearError> {
        let _guard = self.op_lock.lock().await;

        self.store
            .clear_record()
            .await
            .map_err(|e| ClearError::Storage(e.to_string()))?;
        if let Err(e) = self.key_store.delete_key(self.key_alias()) {
            debug!(alias = %self.key_alias(), error = %e, "key delete skipped");
        }

        info!(alias = %self.key_alias(), "biometric enrollment cleared");
        Ok(())
    }

    fn prepare_decrypt(
        &self,
        key: &KeyHandle,
        record: &VaultRecord,
    ) -> Result<Box<dyn BoundCipher>, KeyStoreError> {
        self.key_store.prepare_cipher(
            key,
            CipherMode::Decrypt {
                iv: record.iv.clone(),
            },
        )
    }

    async fn challenge(&self, prompt: &PromptInfo, cipher: Box<dyn BoundCipher>) -> Challenge {
        match self.challenger.challenge(prompt, cipher).await {
            Ok(cipher) => Challenge::Unlocked(cipher),
            Err(ChallengeError::Cancelled(reason)) | Err(ChallengeError::Failed(reason)) => {
                debug!(reason = %reason, "biometric challenge not completed");
                Challenge::Cancelled
            }
            Err(ChallengeError::CipherUnavailable) => {
                warn!("biometric challenge succeeded without a cipher");
                Challenge::NoCipher
            }
        }
    }

    /// Fails closed: drops the record and the key, then reports invalidation.
    ///
    /// If the record cannot be removed the storage error is reported instead,
    /// since the next call would otherwise find a record with no usable key.
    async fn invalidate(&self, reason: &str) -> AuthError {
        warn!(alias = %self.key_alias(), reason, "biometric key invalidated, clearing vault");
        if let Err(e) = self.key_store.delete_key(self.key_alias()) {
            debug!(error = %e, "key delete skipped");
        }
        if let Err(e) = self.store.clear_record().await {
            warn!(error = %e, "failed to clear vault record after key invalidation");
            return AuthError::Storage(e.to_string());
        }
        AuthError::KeyInvalidated
    }
}

fn enroll_failed(e: KeyStoreError) -> EnrollError {
    EnrollError::EnrollmentFailed(e.to_string())
}
