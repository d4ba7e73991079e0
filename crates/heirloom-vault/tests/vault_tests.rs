// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault behavior against the mock collaborators and SQLite.

use std::sync::Arc;

use heirloom_core::types::BiometricStatus;
use heirloom_core::{HeirloomError, KeyStoreError};
use heirloom_test_utils::{ChallengeOutcome, MemoryVaultStore, TestHarness};
use heirloom_vault::{AuthError, EnrollError};
use proptest::prelude::*;
use secrecy::{ExposeSecret, SecretString};

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[tokio::test]
async fn empty_secret_touches_neither_store() {
    let records = Arc::new(MemoryVaultStore::new());
    let harness = TestHarness::builder()
        .with_vault_store(records.clone())
        .build()
        .await
        .unwrap();

    let err = harness.vault.enroll(&secret("")).await.unwrap_err();

    assert_eq!(err, EnrollError::EmptySecret);
    assert_eq!(harness.key_store.calls().total(), 0);
    assert!(!records.touched());
    assert_eq!(harness.challenger.challenge_count(), 0);
}

#[tokio::test]
async fn enroll_uses_configured_prompt_copy() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.vault.enroll(&secret("pw")).await.unwrap();
    harness.vault.authenticate().await.unwrap();

    let prompts = harness.challenger.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], harness.config.vault.enroll_prompt());
    assert_eq!(prompts[1], harness.config.vault.unlock_prompt());
    assert_eq!(prompts[1].negative_button, "Use Password");
}

#[tokio::test]
async fn failed_fingerprint_is_reported_as_cancellation() {
    let harness = TestHarness::builder()
        .with_challenge_outcomes(vec![ChallengeOutcome::Fail])
        .build()
        .await
        .unwrap();

    let err = harness.vault.enroll(&secret("pw")).await.unwrap_err();
    assert_eq!(err, EnrollError::UserCancelled);
    assert!(!harness.vault.has_enrollment().await.unwrap());
}

#[tokio::test]
async fn cancelled_unlock_keeps_enrollment() {
    let harness = TestHarness::builder()
        .with_challenge_outcomes(vec![ChallengeOutcome::Approve, ChallengeOutcome::Cancel])
        .build()
        .await
        .unwrap();

    harness.vault.enroll(&secret("pw")).await.unwrap();
    let err = harness.vault.authenticate().await.unwrap_err();

    assert_eq!(err, AuthError::UserCancelled);
    assert!(err.is_expected());
    assert!(harness.vault.has_enrollment().await.unwrap());
    assert_eq!(
        harness.vault.authenticate().await.unwrap().expose_secret(),
        "pw"
    );
}

#[tokio::test]
async fn invalidation_clears_record_then_reports_no_enrollment() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.vault.enroll(&secret("pw")).await.unwrap();

    harness.key_store.invalidate().unwrap();
    let err = harness.vault.authenticate().await.unwrap_err();
    assert_eq!(err, AuthError::KeyInvalidated);
    assert!(!harness.vault.has_enrollment().await.unwrap());
    assert!(!harness.key_store.contains(harness.vault.key_alias()));

    let err = harness.vault.authenticate().await.unwrap_err();
    assert_eq!(err, AuthError::NoEnrollment);
    // The prompt is never shown for an invalidated key.
    assert_eq!(harness.challenger.challenge_count(), 1);
}

#[tokio::test]
async fn invalidation_that_cannot_clear_reports_storage_error() {
    let records = Arc::new(MemoryVaultStore::new());
    let harness = TestHarness::builder()
        .with_vault_store(records.clone())
        .build()
        .await
        .unwrap();
    harness.vault.enroll(&secret("pw")).await.unwrap();

    harness.key_store.invalidate().unwrap();
    records.fail_clears(true);
    let err = harness.vault.authenticate().await.unwrap_err();
    assert!(matches!(err, AuthError::Storage(ref m) if m.contains("injected clear failure")));
    assert!(records.record().is_some());

    // Once storage recovers the leftover record is dropped.
    records.fail_clears(false);
    assert_eq!(
        harness.vault.authenticate().await.unwrap_err(),
        AuthError::KeyInvalidated
    );
    assert!(records.record().is_none());
}

#[tokio::test]
async fn backend_error_during_prepare_is_not_invalidation() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.vault.enroll(&secret("pw")).await.unwrap();

    harness
        .key_store
        .fail_next_prepare(KeyStoreError::Backend("keystore busy".into()));
    let err = harness.vault.authenticate().await.unwrap_err();

    assert!(matches!(err, AuthError::DecryptionFailed(ref m) if m.contains("keystore busy")));
    assert!(harness.vault.has_enrollment().await.unwrap());
}

#[tokio::test]
async fn storage_read_failure_surfaces_immediately() {
    let records = Arc::new(MemoryVaultStore::new());
    let harness = TestHarness::builder()
        .with_vault_store(records.clone())
        .build()
        .await
        .unwrap();
    records.fail_loads(true);

    let err = harness.vault.authenticate().await.unwrap_err();
    assert!(matches!(err, AuthError::Storage(_)));
    assert_eq!(harness.challenger.challenge_count(), 0);

    let err: HeirloomError = err.into();
    assert_eq!(err.class(), heirloom_core::ErrorClass::Storage);
}

#[tokio::test]
async fn clear_twice_never_fails() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.vault.enroll(&secret("pw")).await.unwrap();

    harness.vault.clear().await.unwrap();
    harness.vault.clear().await.unwrap();

    assert!(!harness.vault.has_enrollment().await.unwrap());
    assert_eq!(
        harness.vault.authenticate().await.unwrap_err(),
        AuthError::NoEnrollment
    );
}

#[tokio::test]
async fn re_enroll_replaces_previous_secret() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.vault.enroll(&secret("first")).await.unwrap();
    harness.vault.enroll(&secret("second")).await.unwrap();

    assert_eq!(
        harness.vault.authenticate().await.unwrap().expose_secret(),
        "second"
    );
    assert_eq!(harness.key_store.calls().generate, 2);
}

#[tokio::test]
async fn availability_follows_sensor_status() {
    let harness = TestHarness::builder().build().await.unwrap();

    let ready = harness.vault.check_availability().await;
    assert!(ready.available && ready.enrolled);

    harness.challenger.set_status(BiometricStatus::NoneEnrolled);
    let none = harness.vault.check_availability().await;
    assert!(none.available && !none.enrolled);

    harness.challenger.set_status(BiometricStatus::Unavailable);
    let absent = harness.vault.check_availability().await;
    assert!(!absent.available && !absent.enrolled);
}

#[tokio::test]
async fn enrollment_survives_reopen_of_sqlite_store() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    harness.vault.enroll(&secret("päss wörd 🔑")).await.unwrap();

    let db = harness.database.as_ref().unwrap();
    let reopened = heirloom_storage::Database::open(db.path()).await.unwrap();
    let store = heirloom_storage::SqliteVaultStore::new(reopened);
    let record = heirloom_core::VaultStore::load_record(&store)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.iv.len(), heirloom_vault::crypto::IV_LEN);
    assert!(!record.encrypted_secret.is_empty());

    assert_eq!(
        harness.vault.authenticate().await.unwrap().expose_secret(),
        "päss wörd 🔑"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_non_empty_secret_round_trips(input in "\\PC{1,64}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let recovered = runtime.block_on(async {
            let harness = TestHarness::builder().build().await.unwrap();
            harness.vault.enroll(&secret(&input)).await.unwrap();
            harness.vault.authenticate().await.unwrap()
        });
        prop_assert_eq!(recovered.expose_secret(), input.as_str());
    }
}
