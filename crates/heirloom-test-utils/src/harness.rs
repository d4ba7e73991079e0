// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` wires a [`BiometricVault`], a [`MasterSecret`] and a
//! [`PersistenceEngine`] to mock collaborators. Stores are in memory unless
//! the builder asks for a temp SQLite database.

use std::sync::Arc;

use heirloom_config::{HasDataPolicy, HeirloomConfig, StorageConfig};
use heirloom_core::{
    DocumentStore, HeirloomError, SecretRequiredObserver, SettingsStore, VaultStore,
};
use heirloom_persistence::PersistenceEngine;
use heirloom_storage::{Database, SqliteDocumentStore, SqliteVaultStore};
use heirloom_vault::{BiometricVault, MasterSecret};

use crate::memory_stores::{MemoryDocumentStore, MemoryVaultStore};
use crate::mock_challenger::{ChallengeOutcome, MockChallenger};
use crate::mock_key_store::MockKeyStore;
use crate::observer::RecordingObserver;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    outcomes: Vec<ChallengeOutcome>,
    config: HeirloomConfig,
    document_store: Option<Arc<dyn DocumentStore>>,
    vault_store: Option<Arc<dyn VaultStore>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            config: fast_hash_config(),
            document_store: None,
            vault_store: None,
            settings_store: None,
            sqlite: false,
        }
    }

    /// Script the biometric prompt.
    pub fn with_challenge_outcomes(mut self, outcomes: Vec<ChallengeOutcome>) -> Self {
        self.outcomes = outcomes;
        self
    }

    pub fn with_config(mut self, config: HeirloomConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_has_data_policy(mut self, policy: HasDataPolicy) -> Self {
        self.config.persistence.has_data_policy = policy;
        self
    }

    /// Use this document store instead of a fresh in-memory one.
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    /// Use this vault store instead of a fresh in-memory one.
    pub fn with_vault_store(mut self, store: Arc<dyn VaultStore>) -> Self {
        self.vault_store = Some(store);
        self
    }

    /// Use this settings store instead of the default one.
    pub fn with_settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Back any store not given explicitly with a temp SQLite database.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(mut self) -> Result<TestHarness, HeirloomError> {
        let mut temp_dir = None;
        let mut database = None;
        if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(HeirloomError::storage)?;
            let storage_config = StorageConfig {
                database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
                wal_mode: true,
            };
            database = Some(Database::open_with_config(&storage_config).await?);
            self.config.storage = storage_config;
            temp_dir = Some(dir);
        }

        let document_store: Arc<dyn DocumentStore> = match (self.document_store, &database) {
            (Some(store), _) => store,
            (None, Some(db)) => Arc::new(SqliteDocumentStore::new(db.clone())),
            (None, None) => Arc::new(MemoryDocumentStore::new()),
        };
        let memory_vault = Arc::new(MemoryVaultStore::new());
        let vault_store: Arc<dyn VaultStore> = match (self.vault_store, &database) {
            (Some(store), _) => store,
            (None, Some(db)) => Arc::new(SqliteVaultStore::new(db.clone())),
            (None, None) => memory_vault.clone() as Arc<dyn VaultStore>,
        };
        let settings_store: Arc<dyn SettingsStore> = match (self.settings_store, &database) {
            (Some(store), _) => store,
            (None, Some(db)) => Arc::new(SqliteVaultStore::new(db.clone())),
            (None, None) => memory_vault as Arc<dyn SettingsStore>,
        };

        let challenger = Arc::new(MockChallenger::with_outcomes(self.outcomes));
        let key_store = Arc::new(MockKeyStore::new());
        let observer = Arc::new(RecordingObserver::new());

        let vault = Arc::new(BiometricVault::new(
            key_store.clone(),
            challenger.clone(),
            vault_store.clone(),
            self.config.vault.clone(),
        ));
        let master = Arc::new(MasterSecret::new(
            settings_store.clone(),
            self.config.vault.clone(),
        ));
        let engine = PersistenceEngine::new(
            document_store.clone(),
            self.config.persistence.clone(),
            Some(observer.clone() as Arc<dyn SecretRequiredObserver>),
        );

        Ok(TestHarness {
            vault,
            master,
            engine,
            challenger,
            key_store,
            observer,
            vault_store,
            settings_store,
            document_store,
            database,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// Default config with a cheap Argon2id cost so master secret tests run fast.
fn fast_hash_config() -> HeirloomConfig {
    let mut config = HeirloomConfig::default();
    config.vault.kdf_memory_cost = 1024;
    config.vault.kdf_iterations = 1;
    config
}

/// A complete test environment with mock collaborators.
pub struct TestHarness {
    pub vault: Arc<BiometricVault>,
    pub master: Arc<MasterSecret>,
    pub engine: PersistenceEngine,
    pub challenger: Arc<MockChallenger>,
    pub key_store: Arc<MockKeyStore>,
    /// Notified when the engine's document first holds data.
    pub observer: Arc<RecordingObserver>,
    pub vault_store: Arc<dyn VaultStore>,
    /// Shares the vault store's backing unless one was given explicitly.
    pub settings_store: Arc<dyn SettingsStore>,
    pub document_store: Arc<dyn DocumentStore>,
    /// Present when built with [`TestHarnessBuilder::with_sqlite`].
    pub database: Option<Database>,
    pub config: HeirloomConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh engine over the same document store, as after an app restart.
    pub fn reopen_engine(&self) -> PersistenceEngine {
        PersistenceEngine::new(
            self.document_store.clone(),
            self.config.persistence.clone(),
            None,
        )
    }
}
