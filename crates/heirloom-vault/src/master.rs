// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The master secret typed when biometric unlock is unavailable.
//!
//! Only an Argon2id hash in PHC string form is stored, under
//! [`SECRET_HASH_SETTING`] in the settings store. Hashing runs on the
//! blocking pool with the cost parameters from [`VaultConfig`].

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use heirloom_config::VaultConfig;
use heirloom_core::{SECRET_HASH_SETTING, SettingsStore};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::SecretError;

/// Shortest accepted master secret, in bytes.
pub const MIN_SECRET_LEN: usize = 8;

/// Longest accepted master secret, in bytes.
pub const MAX_SECRET_LEN: usize = 256;

const SALT_LEN: usize = 16;

/// A secret that matched the stored hash.
///
/// Only [`MasterSecret::verified`] hands these out, so code that takes one
/// never sees an unchecked secret.
pub struct VerifiedSecret(SecretString);

impl VerifiedSecret {
    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

impl std::fmt::Debug for VerifiedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VerifiedSecret([REDACTED])")
    }
}

/// Sets, checks and changes the master secret hash.
pub struct MasterSecret {
    settings: Arc<dyn SettingsStore>,
    config: VaultConfig,
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecret")
            .field("kdf_memory_cost", &self.config.kdf_memory_cost)
            .field("kdf_iterations", &self.config.kdf_iterations)
            .field("kdf_parallelism", &self.config.kdf_parallelism)
            .finish_non_exhaustive()
    }
}

impl MasterSecret {
    pub fn new(settings: Arc<dyn SettingsStore>, config: VaultConfig) -> Self {
        Self { settings, config }
    }

    /// Whether a master secret hash is stored.
    pub async fn is_set(&self) -> Result<bool, SecretError> {
        Ok(self.load_hash().await?.is_some())
    }

    /// Hashes and stores `secret`, replacing any previous one.
    pub async fn set(&self, secret: &SecretString) -> Result<(), SecretError> {
        check_length(secret)?;
        let hash = self.hash(secret).await?;
        self.store_hash(&hash).await?;
        info!("master secret set");
        Ok(())
    }

    /// Checks `secret` against the stored hash.
    ///
    /// Empty or over-long input is rejected before any hashing, and a missing
    /// hash is [`SecretError::NotSet`] rather than a mismatch.
    pub async fn verify(&self, secret: &SecretString) -> Result<bool, SecretError> {
        let len = secret.expose_secret().len();
        if len == 0 || len > MAX_SECRET_LEN {
            debug!(len, "verify rejected: invalid secret length");
            return Err(SecretError::Invalid);
        }
        let Some(hash) = self.load_hash().await? else {
            return Err(SecretError::NotSet);
        };

        let password = Zeroizing::new(secret.expose_secret().as_bytes().to_vec());
        let matched = tokio::task::spawn_blocking(move || verify_hash(&password, &hash))
            .await
            .map_err(|e| SecretError::Hash(format!("verify task failed: {e}")))??;
        debug!(matched, "master secret verified");
        Ok(matched)
    }

    /// [`verify`](Self::verify), turning a mismatch into
    /// [`SecretError::Incorrect`] and a match into a [`VerifiedSecret`].
    pub async fn verified(&self, secret: &SecretString) -> Result<VerifiedSecret, SecretError> {
        if !self.verify(secret).await? {
            return Err(SecretError::Incorrect);
        }
        Ok(VerifiedSecret(SecretString::from(
            secret.expose_secret().to_owned(),
        )))
    }

    /// Replaces the secret after checking the old one.
    ///
    /// The new secret is validated first, so a bad new secret never costs a
    /// hash of the old one.
    pub async fn change(
        &self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<(), SecretError> {
        check_length(new)?;
        if !self.verify(old).await? {
            return Err(SecretError::Incorrect);
        }
        let hash = self.hash(new).await?;
        self.store_hash(&hash).await?;
        info!("master secret changed");
        Ok(())
    }

    /// Removes the stored hash. Safe to call when none is set.
    pub async fn clear(&self) -> Result<(), SecretError> {
        self.settings
            .delete_setting(SECRET_HASH_SETTING)
            .await
            .map_err(|e| SecretError::Storage(e.to_string()))?;
        info!("master secret cleared");
        Ok(())
    }

    async fn load_hash(&self) -> Result<Option<String>, SecretError> {
        self.settings
            .get_setting(SECRET_HASH_SETTING)
            .await
            .map_err(|e| SecretError::Storage(e.to_string()))
    }

    async fn store_hash(&self, hash: &str) -> Result<(), SecretError> {
        self.settings
            .put_setting(SECRET_HASH_SETTING, hash)
            .await
            .map_err(|e| SecretError::Storage(e.to_string()))
    }

    async fn hash(&self, secret: &SecretString) -> Result<String, SecretError> {
        let params = Params::new(
            self.config.kdf_memory_cost,
            self.config.kdf_iterations,
            self.config.kdf_parallelism,
            None,
        )
        .map_err(|e| SecretError::Hash(format!("invalid Argon2id parameters: {e}")))?;
        let password = Zeroizing::new(secret.expose_secret().as_bytes().to_vec());
        tokio::task::spawn_blocking(move || hash_secret(&password, params))
            .await
            .map_err(|e| SecretError::Hash(format!("hash task failed: {e}")))?
    }
}

fn check_length(secret: &SecretString) -> Result<(), SecretError> {
    let len = secret.expose_secret().len();
    if len < MIN_SECRET_LEN {
        return Err(SecretError::TooShort {
            min: MIN_SECRET_LEN,
        });
    }
    if len > MAX_SECRET_LEN {
        return Err(SecretError::TooLong {
            max: MAX_SECRET_LEN,
        });
    }
    Ok(())
}

/// Argon2id (v0x13) PHC hash of `password` under a fresh random salt.
fn hash_secret(password: &[u8], params: Params) -> Result<String, SecretError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| SecretError::Hash("failed to generate random salt".to_string()))?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| SecretError::Hash(format!("invalid salt: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let hash = argon2
        .hash_password(password, &salt)
        .map_err(|e| SecretError::Hash(format!("Argon2id hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Checks `password` against a PHC string, using the parameters it records.
fn verify_hash(password: &[u8], phc: &str) -> Result<bool, SecretError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| SecretError::Hash(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default().verify_password(password, &parsed).is_ok())
}
