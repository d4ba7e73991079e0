// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed outcomes of vault operations.

use heirloom_core::HeirloomError;
use thiserror::Error;

/// Why [`BiometricVault::enroll`](crate::BiometricVault::enroll) did not
/// store a secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrollError {
    #[error("secret must not be empty")]
    EmptySecret,

    #[error("biometric enrollment cancelled")]
    UserCancelled,

    #[error("biometric enrollment failed: {0}")]
    EnrollmentFailed(String),
}

impl EnrollError {
    /// Stable code for the UI layer.
    pub fn code(&self) -> &'static str {
        match self {
            EnrollError::EmptySecret => "empty_secret",
            EnrollError::UserCancelled => "user_cancelled",
            EnrollError::EnrollmentFailed(_) => "enrollment_failed",
        }
    }
}

/// Why [`BiometricVault::authenticate`](crate::BiometricVault::authenticate)
/// did not return the secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no biometric enrollment")]
    NoEnrollment,

    /// The key was invalidated and the stored record has been removed.
    #[error("biometric key invalidated -- re-enrollment required")]
    KeyInvalidated,

    #[error("biometric authentication cancelled")]
    UserCancelled,

    #[error("failed to decrypt secret: {0}")]
    DecryptionFailed(String),

    #[error("vault storage error: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NoEnrollment => "no_enrollment",
            AuthError::KeyInvalidated => "key_invalidated",
            AuthError::UserCancelled => "user_cancelled",
            AuthError::DecryptionFailed(_) => "decryption_failed",
            AuthError::Storage(_) => "storage",
        }
    }

    /// Outcomes the UI handles as normal flow rather than failures.
    pub fn is_expected(&self) -> bool {
        matches!(self, AuthError::NoEnrollment | AuthError::UserCancelled)
    }
}

/// Why a [`MasterSecret`](crate::MasterSecret) operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("secret must be at least {min} characters")]
    TooShort { min: usize },

    #[error("secret must be at most {max} characters")]
    TooLong { max: usize },

    /// Empty or over-long input to a verify call.
    #[error("invalid secret")]
    Invalid,

    #[error("no master secret set")]
    NotSet,

    #[error("incorrect secret")]
    Incorrect,

    #[error("secret hashing failed: {0}")]
    Hash(String),

    #[error("vault storage error: {0}")]
    Storage(String),
}

impl SecretError {
    pub fn code(&self) -> &'static str {
        match self {
            SecretError::TooShort { .. } => "too_short",
            SecretError::TooLong { .. } => "too_long",
            SecretError::Invalid => "invalid",
            SecretError::NotSet => "not_set",
            SecretError::Incorrect => "incorrect",
            SecretError::Hash(_) => "hash",
            SecretError::Storage(_) => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClearError {
    #[error("vault storage error: {0}")]
    Storage(String),
}

impl From<EnrollError> for HeirloomError {
    fn from(e: EnrollError) -> Self {
        match e {
            EnrollError::EmptySecret => HeirloomError::Validation(e.to_string()),
            EnrollError::UserCancelled => HeirloomError::UserCancelled,
            EnrollError::EnrollmentFailed(reason) => HeirloomError::Crypto(reason),
        }
    }
}

impl From<AuthError> for HeirloomError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NoEnrollment => HeirloomError::Validation(e.to_string()),
            AuthError::KeyInvalidated => HeirloomError::KeyInvalidated,
            AuthError::UserCancelled => HeirloomError::UserCancelled,
            AuthError::DecryptionFailed(reason) => HeirloomError::Crypto(reason),
            AuthError::Storage(reason) => HeirloomError::storage(reason),
        }
    }
}

impl From<SecretError> for HeirloomError {
    fn from(e: SecretError) -> Self {
        match e {
            SecretError::TooShort { .. }
            | SecretError::TooLong { .. }
            | SecretError::Invalid
            | SecretError::NotSet
            | SecretError::Incorrect => HeirloomError::Validation(e.to_string()),
            SecretError::Hash(reason) => HeirloomError::Crypto(reason),
            SecretError::Storage(reason) => HeirloomError::storage(reason),
        }
    }
}

impl From<ClearError> for HeirloomError {
    fn from(e: ClearError) -> Self {
        match e {
            ClearError::Storage(reason) => HeirloomError::storage(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use heirloom_core::ErrorClass;

    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AuthError::NoEnrollment.code(), "no_enrollment");
        assert_eq!(AuthError::KeyInvalidated.code(), "key_invalidated");
        assert_eq!(AuthError::UserCancelled.code(), "user_cancelled");
        assert_eq!(EnrollError::UserCancelled.code(), "user_cancelled");
    }

    #[test]
    fn conversions_follow_taxonomy() {
        assert_eq!(
            HeirloomError::from(EnrollError::EmptySecret).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            HeirloomError::from(AuthError::KeyInvalidated).class(),
            ErrorClass::KeyInvalidated
        );
        assert_eq!(
            HeirloomError::from(AuthError::DecryptionFailed("tag".into())).class(),
            ErrorClass::Crypto
        );
        assert_eq!(
            HeirloomError::from(ClearError::Storage("locked".into())).class(),
            ErrorClass::Storage
        );
        assert!(HeirloomError::from(AuthError::UserCancelled).is_expected());
        assert_eq!(
            HeirloomError::from(SecretError::Incorrect).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            HeirloomError::from(SecretError::Hash("params".into())).class(),
            ErrorClass::Crypto
        );
    }

    #[test]
    fn secret_errors_name_their_bounds() {
        assert_eq!(
            SecretError::TooShort { min: 8 }.to_string(),
            "secret must be at least 8 characters"
        );
        assert_eq!(SecretError::TooLong { max: 256 }.code(), "too_long");
        assert_eq!(SecretError::NotSet.code(), "not_set");
    }
}
