// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clearing every piece of local data, on demand or at exit.
//!
//! A wipe removes, in order: the stored document (resetting the engine to an
//! empty document), the master secret hash, the biometric record and key,
//! and the stored settings. A failure stops the wipe and is returned; running
//! it again finishes the job, since every step succeeds on absent data.

use std::sync::Arc;

use heirloom_config::PersistenceConfig;
use heirloom_core::{CLEAR_ON_EXIT_SETTING, SettingsStore};
use heirloom_persistence::{FlushOutcome, PersistenceEngine};
use heirloom_vault::{BiometricVault, MasterSecret};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::error::WipeError;

/// Phrase a user types to clear everything without the master secret.
/// Compared case-insensitively.
pub const CLEAR_ALL_CONFIRMATION: &str = "DELETE ALL DATA";

/// What [`DataWiper::on_exit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Clear-on-exit is on; everything was removed.
    Cleared,
    /// Clear-on-exit is off; pending edits were flushed.
    Flushed(FlushOutcome),
}

/// Removes all local data through the components that own it.
pub struct DataWiper {
    engine: PersistenceEngine,
    vault: Arc<BiometricVault>,
    master: Arc<MasterSecret>,
    settings: Arc<dyn SettingsStore>,
    clear_on_exit_default: bool,
}

impl std::fmt::Debug for DataWiper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataWiper")
            .field("engine", &self.engine)
            .field("clear_on_exit_default", &self.clear_on_exit_default)
            .finish_non_exhaustive()
    }
}

impl DataWiper {
    pub fn new(
        engine: PersistenceEngine,
        vault: Arc<BiometricVault>,
        master: Arc<MasterSecret>,
        settings: Arc<dyn SettingsStore>,
        config: &PersistenceConfig,
    ) -> Self {
        Self {
            engine,
            vault,
            master,
            settings,
            clear_on_exit_default: config.clear_on_exit,
        }
    }

    /// Whether everything is cleared at exit. Falls back to the configured
    /// default until the user stores a choice.
    pub async fn clear_on_exit(&self) -> Result<bool, WipeError> {
        let stored = self.settings.get_setting(CLEAR_ON_EXIT_SETTING).await?;
        Ok(match stored.as_deref() {
            Some(value) => value == "true",
            None => self.clear_on_exit_default,
        })
    }

    pub async fn set_clear_on_exit(&self, enabled: bool) -> Result<(), WipeError> {
        self.settings
            .put_setting(CLEAR_ON_EXIT_SETTING, if enabled { "true" } else { "false" })
            .await?;
        debug!(enabled, "clear-on-exit stored");
        Ok(())
    }

    /// Clears everything once `secret` matches the master secret. With no
    /// master secret set, `secret` is not checked.
    pub async fn clear_all(&self, secret: &SecretString) -> Result<(), WipeError> {
        if self.master.is_set().await? && !self.master.verify(secret).await? {
            debug!("clear-all rejected: incorrect secret");
            return Err(WipeError::IncorrectSecret);
        }
        self.wipe_everything().await
    }

    /// Clears everything without the master secret, for a user who has
    /// forgotten it. `confirmation` must be [`CLEAR_ALL_CONFIRMATION`] in any
    /// case.
    pub async fn force_clear_all(&self, confirmation: &str) -> Result<(), WipeError> {
        if confirmation.to_uppercase() != CLEAR_ALL_CONFIRMATION {
            debug!("force clear-all rejected: confirmation mismatch");
            return Err(WipeError::ConfirmationMismatch {
                expected: CLEAR_ALL_CONFIRMATION,
            });
        }
        self.wipe_everything().await
    }

    /// Runs at app exit: clears everything if clear-on-exit is on, otherwise
    /// shuts the engine down so pending edits reach the store.
    pub async fn on_exit(&self) -> Result<ExitOutcome, WipeError> {
        if self.clear_on_exit().await? {
            self.wipe_everything().await?;
            return Ok(ExitOutcome::Cleared);
        }
        Ok(ExitOutcome::Flushed(self.engine.shutdown().await))
    }

    async fn wipe_everything(&self) -> Result<(), WipeError> {
        self.engine.wipe().await?;
        self.master.clear().await?;
        self.vault.clear().await?;
        self.settings.delete_setting(CLEAR_ON_EXIT_SETTING).await?;
        info!("all local data cleared");
        Ok(())
    }
}
