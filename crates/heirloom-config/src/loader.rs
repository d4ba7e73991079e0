// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./heirloom.toml` > `~/.config/heirloom/heirloom.toml`
//! > `/etc/heirloom/heirloom.toml` with environment variable overrides via the
//! `HEIRLOOM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HeirloomConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/heirloom/heirloom.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "heirloom.toml";

/// Top-level sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &["storage", "vault", "persistence", "logging"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/heirloom/heirloom.toml`
/// 3. `~/.config/heirloom/heirloom.toml`
/// 4. `./heirloom.toml`
/// 5. `HEIRLOOM_*` environment variables
pub fn load_config() -> Result<HeirloomConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HeirloomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeirloomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HeirloomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeirloomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HeirloomConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// `$XDG_CONFIG_HOME/heirloom/heirloom.toml`, if a config dir is known.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("heirloom").join("heirloom.toml"))
}

/// Environment provider with an explicit section-to-dot mapping.
///
/// Splitting on `_` would turn `HEIRLOOM_PERSISTENCE_IDLE_FLUSH_MS` into
/// `persistence.idle.flush.ms`; only the first segment names a section.
fn env_provider() -> Env {
    Env::prefixed("HEIRLOOM_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env key to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            map_env_key("persistence_idle_flush_ms"),
            "persistence.idle_flush_ms"
        );
        assert_eq!(map_env_key("vault_key_alias"), "vault.key_alias");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
