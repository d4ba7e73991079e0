// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::ops::RangeInclusive;

use crate::diagnostic::ConfigError;
use crate::model::HeirloomConfig;

/// Allowed idle flush window in milliseconds.
pub const IDLE_FLUSH_RANGE_MS: RangeInclusive<u64> = 10..=60_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &HeirloomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.vault.key_alias.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.key_alias must not be empty".to_string(),
        });
    }

    let idle = config.persistence.idle_flush_ms;
    if !IDLE_FLUSH_RANGE_MS.contains(&idle) {
        errors.push(ConfigError::Validation {
            message: format!(
                "persistence.idle_flush_ms must be between {} and {}, got {idle}",
                IDLE_FLUSH_RANGE_MS.start(),
                IDLE_FLUSH_RANGE_MS.end()
            ),
        });
    }

    let vault = &config.vault;
    if vault.kdf_iterations == 0 || vault.kdf_parallelism == 0 {
        errors.push(ConfigError::Validation {
            message: "vault.kdf_iterations and vault.kdf_parallelism must be at least 1"
                .to_string(),
        });
    } else if vault.kdf_memory_cost < 8 * vault.kdf_parallelism {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at least 8 KiB per lane ({} KiB), got {}",
                8 * vault.kdf_parallelism,
                vault.kdf_memory_cost
            ),
        });
    }

    if config.logging.max_level().is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
