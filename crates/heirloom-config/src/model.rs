// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use std::time::Duration;

use heirloom_core::PromptInfo;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Heirloom configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeirloomConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Durable storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("heirloom").join("heirloom.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("heirloom.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Biometric vault settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Alias of the hardware key that wraps the secret.
    #[serde(default = "default_key_alias")]
    pub key_alias: String,

    #[serde(default = "default_prompt_title")]
    pub enroll_prompt_title: String,

    #[serde(default = "default_enroll_subtitle")]
    pub enroll_prompt_subtitle: String,

    #[serde(default = "default_enroll_negative")]
    pub enroll_prompt_negative: String,

    #[serde(default = "default_prompt_title")]
    pub unlock_prompt_title: String,

    #[serde(default = "default_unlock_subtitle")]
    pub unlock_prompt_subtitle: String,

    /// Label of the button that falls back to typing the secret.
    #[serde(default = "default_unlock_negative")]
    pub unlock_prompt_negative: String,

    /// Argon2id memory cost in KiB for the master secret hash.
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes.
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl VaultConfig {
    /// Prompt shown while enrolling a secret.
    pub fn enroll_prompt(&self) -> PromptInfo {
        PromptInfo::new(
            self.enroll_prompt_title.clone(),
            self.enroll_prompt_subtitle.clone(),
            self.enroll_prompt_negative.clone(),
        )
    }

    /// Prompt shown while unlocking.
    pub fn unlock_prompt(&self) -> PromptInfo {
        PromptInfo::new(
            self.unlock_prompt_title.clone(),
            self.unlock_prompt_subtitle.clone(),
            self.unlock_prompt_negative.clone(),
        )
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_alias: default_key_alias(),
            enroll_prompt_title: default_prompt_title(),
            enroll_prompt_subtitle: default_enroll_subtitle(),
            enroll_prompt_negative: default_enroll_negative(),
            unlock_prompt_title: default_prompt_title(),
            unlock_prompt_subtitle: default_unlock_subtitle(),
            unlock_prompt_negative: default_unlock_negative(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_key_alias() -> String {
    "heirloom_biometric_key".to_string()
}

fn default_prompt_title() -> String {
    "Unlock Heirloom".to_string()
}

fn default_enroll_subtitle() -> String {
    "Verify fingerprint to enable biometric unlock".to_string()
}

fn default_enroll_negative() -> String {
    "Cancel".to_string()
}

fn default_unlock_subtitle() -> String {
    "Verify fingerprint to unlock".to_string()
}

fn default_unlock_negative() -> String {
    "Use Password".to_string()
}

fn default_kdf_memory_cost() -> u32 {
    19456 // 19 MiB, OWASP minimum for Argon2id
}

fn default_kdf_iterations() -> u32 {
    2
}

fn default_kdf_parallelism() -> u32 {
    1
}

/// When the "document has data" cache is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HasDataPolicy {
    /// Once the document has data the flag stays set until the next save or
    /// load, so the secret prompt fires at most once per session.
    #[default]
    Latch,
    /// Recompute on every edit. Emptying the document and adding data again
    /// prompts again.
    Rearm,
}

/// Document persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceConfig {
    /// Quiet period after the last edit before the document is flushed.
    #[serde(default = "default_idle_flush_ms")]
    pub idle_flush_ms: u64,

    #[serde(default)]
    pub has_data_policy: HasDataPolicy,

    /// Drop custom item values with unknown field ids when loading.
    #[serde(default)]
    pub reconcile_on_load: bool,

    /// Initial clear-on-exit setting, used until the user stores their own.
    #[serde(default)]
    pub clear_on_exit: bool,
}

impl PersistenceConfig {
    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_flush_ms)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            idle_flush_ms: default_idle_flush_ms(),
            has_data_policy: HasDataPolicy::default(),
            reconcile_on_load: false,
            clear_on_exit: false,
        }
    }
}

fn default_idle_flush_ms() -> u64 {
    300
}

/// Log output settings.
///
/// The library crates only emit `tracing` events; installing a subscriber is
/// the host's job, and it reads the level through [`LoggingConfig::max_level`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error). Case-insensitive.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// The configured level, or `None` if it is not a known level name.
    pub fn max_level(&self) -> Option<tracing::Level> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => Some(tracing::Level::TRACE),
            "debug" => Some(tracing::Level::DEBUG),
            "info" => Some(tracing::Level::INFO),
            "warn" => Some(tracing::Level::WARN),
            "error" => Some(tracing::Level::ERROR),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HeirloomConfig::default();
        assert!(config.storage.database_path.ends_with("heirloom.db"));
        assert!(config.storage.wal_mode);
        assert_eq!(config.vault.key_alias, "heirloom_biometric_key");
        assert_eq!(config.persistence.idle_window(), Duration::from_millis(300));
        assert_eq!(config.persistence.has_data_policy, HasDataPolicy::Latch);
        assert!(!config.persistence.reconcile_on_load);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_level(), Some(tracing::Level::INFO));
        assert!(!config.persistence.clear_on_exit);
        assert_eq!(
            (
                config.vault.kdf_memory_cost,
                config.vault.kdf_iterations,
                config.vault.kdf_parallelism
            ),
            (19456, 2, 1)
        );
    }

    #[test]
    fn max_level_parses_any_case_and_rejects_unknown() {
        let mut logging = LoggingConfig {
            level: "WARN".to_string(),
        };
        assert_eq!(logging.max_level(), Some(tracing::Level::WARN));
        logging.level = "verbose".to_string();
        assert_eq!(logging.max_level(), None);
    }

    #[test]
    fn prompts_are_assembled_from_vault_section() {
        let vault = VaultConfig::default();
        let enroll = vault.enroll_prompt();
        assert_eq!(enroll.title, "Unlock Heirloom");
        assert_eq!(enroll.subtitle, "Verify fingerprint to enable biometric unlock");
        assert_eq!(enroll.negative_button, "Cancel");

        let unlock = vault.unlock_prompt();
        assert_eq!(unlock.subtitle, "Verify fingerprint to unlock");
        assert_eq!(unlock.negative_button, "Use Password");
    }

    #[test]
    fn has_data_policy_parses_lowercase() {
        assert_eq!("rearm".parse::<HasDataPolicy>().unwrap(), HasDataPolicy::Rearm);
        assert_eq!(HasDataPolicy::Latch.to_string(), "latch");
    }
}
