// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Heirloom crate.

use strum::Display;
use thiserror::Error;

/// The primary error type used across collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum HeirloomError {
    /// Caller-supplied input was rejected (empty secret, unknown section name,
    /// malformed payload). Never retried automatically.
    #[error("validation error: {0}")]
    Validation(String),

    /// The user dismissed or failed a biometric prompt.
    #[error("operation cancelled by user")]
    UserCancelled,

    /// The hardware key was permanently invalidated and vault state was cleared.
    #[error("biometric key invalidated -- re-enrollment required")]
    KeyInvalidated,

    /// Durable storage failure (database, serialization, I/O).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Cipher failure not explained by key invalidation.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an error, used by the UI to pick an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    Validation,
    Cancelled,
    KeyInvalidated,
    Storage,
    Crypto,
    Internal,
}

impl HeirloomError {
    /// Wrap any error as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        HeirloomError::Storage {
            source: source.into(),
        }
    }

    /// Returns the taxonomy class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            HeirloomError::Validation(_) => ErrorClass::Validation,
            HeirloomError::UserCancelled => ErrorClass::Cancelled,
            HeirloomError::KeyInvalidated => ErrorClass::KeyInvalidated,
            HeirloomError::Storage { .. } => ErrorClass::Storage,
            HeirloomError::Crypto(_) => ErrorClass::Crypto,
            HeirloomError::Config(_) | HeirloomError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Whether this error is an expected outcome rather than a failure.
    ///
    /// Expected outcomes are logged at debug level and surfaced without noise.
    pub fn is_expected(&self) -> bool {
        matches!(self, HeirloomError::UserCancelled)
    }
}

/// Errors raised by a [`SecureKeyStore`](crate::traits::SecureKeyStore) or a
/// cipher bound to one of its keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStoreError {
    /// The key exists but can never be used again (biometric enrollment changed).
    #[error("key permanently invalidated")]
    KeyPermanentlyInvalidated,

    /// No key is stored under the alias.
    #[error("no key stored under alias `{0}`")]
    KeyNotFound(String),

    /// Any other platform or cipher failure.
    #[error("key store failure: {0}")]
    Backend(String),
}

impl From<KeyStoreError> for HeirloomError {
    fn from(e: KeyStoreError) -> Self {
        match e {
            KeyStoreError::KeyPermanentlyInvalidated => HeirloomError::KeyInvalidated,
            other => HeirloomError::Crypto(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for HeirloomError {
    fn from(e: serde_json::Error) -> Self {
        HeirloomError::Storage {
            source: Box::new(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_taxonomy() {
        assert_eq!(
            HeirloomError::Validation("x".into()).class(),
            ErrorClass::Validation
        );
        assert_eq!(HeirloomError::UserCancelled.class(), ErrorClass::Cancelled);
        assert_eq!(
            HeirloomError::KeyInvalidated.class(),
            ErrorClass::KeyInvalidated
        );
        assert_eq!(
            HeirloomError::storage("disk full").class(),
            ErrorClass::Storage
        );
        assert_eq!(HeirloomError::Crypto("bad tag".into()).class(), ErrorClass::Crypto);
        assert_eq!(HeirloomError::Config("x".into()).class(), ErrorClass::Internal);
    }

    #[test]
    fn only_cancellation_is_expected() {
        assert!(HeirloomError::UserCancelled.is_expected());
        assert!(!HeirloomError::KeyInvalidated.is_expected());
        assert!(!HeirloomError::Validation("empty".into()).is_expected());
    }

    #[test]
    fn invalidated_key_store_error_maps_to_key_invalidated() {
        let err: HeirloomError = KeyStoreError::KeyPermanentlyInvalidated.into();
        assert!(matches!(err, HeirloomError::KeyInvalidated));

        let err: HeirloomError = KeyStoreError::Backend("boom".into()).into();
        assert!(matches!(err, HeirloomError::Crypto(ref m) if m.contains("boom")));
    }

    #[test]
    fn error_class_displays_snake_case() {
        assert_eq!(ErrorClass::KeyInvalidated.to_string(), "key_invalidated");
    }
}
