// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use heirloom_core::HeirloomError;
use heirloom_vault::{ClearError, SecretError};
use thiserror::Error;

/// Why a clear-all did not run or did not finish.
#[derive(Debug, Error)]
pub enum WipeError {
    /// A master secret is set and the one given does not match.
    #[error("incorrect secret")]
    IncorrectSecret,

    #[error("please type {expected} to confirm")]
    ConfirmationMismatch { expected: &'static str },

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Vault(#[from] ClearError),

    #[error(transparent)]
    Storage(#[from] HeirloomError),
}

impl WipeError {
    pub fn code(&self) -> &'static str {
        match self {
            WipeError::IncorrectSecret => "incorrect_secret",
            WipeError::ConfirmationMismatch { .. } => "confirmation_mismatch",
            WipeError::Secret(e) => e.code(),
            WipeError::Vault(_) | WipeError::Storage(_) => "storage",
        }
    }
}

impl From<WipeError> for HeirloomError {
    fn from(e: WipeError) -> Self {
        match e {
            WipeError::IncorrectSecret | WipeError::ConfirmationMismatch { .. } => {
                HeirloomError::Validation(e.to_string())
            }
            WipeError::Secret(e) => e.into(),
            WipeError::Vault(e) => e.into(),
            WipeError::Storage(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use heirloom_core::ErrorClass;

    use super::*;

    #[test]
    fn rejections_are_validation_errors() {
        assert_eq!(
            HeirloomError::from(WipeError::IncorrectSecret).class(),
            ErrorClass::Validation
        );
        let mismatch = WipeError::ConfirmationMismatch {
            expected: "DELETE ALL DATA",
        };
        assert_eq!(mismatch.to_string(), "please type DELETE ALL DATA to confirm");
        assert_eq!(mismatch.code(), "confirmation_mismatch");
    }

    #[test]
    fn storage_failures_keep_their_class() {
        let err = WipeError::from(ClearError::Storage("locked".into()));
        assert_eq!(err.code(), "storage");
        assert_eq!(HeirloomError::from(err).class(), ErrorClass::Storage);
    }
}
