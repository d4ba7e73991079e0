// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted biometric challenger.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use heirloom_core::types::{BiometricStatus, PromptInfo};
use heirloom_core::{BiometricChallenger, BoundCipher, ChallengeError};
use tokio::sync::Mutex;

use crate::lock;

/// What the next challenge should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// The user authenticates; the cipher is handed back.
    Approve,
    /// The user dismisses the prompt.
    Cancel,
    /// The sensor rejects the user.
    Fail,
    /// Authentication succeeds but the platform returns no cipher.
    DropCipher,
}

/// A challenger that plays back pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty every
/// challenge is approved.
pub struct MockChallenger {
    outcomes: Arc<Mutex<VecDeque<ChallengeOutcome>>>,
    status: StdMutex<BiometricStatus>,
    prompts: StdMutex<Vec<PromptInfo>>,
    challenges: AtomicUsize,
}

impl MockChallenger {
    /// Create a challenger with a ready sensor and an empty queue.
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Create a challenger pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<ChallengeOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            status: StdMutex::new(BiometricStatus::Ready),
            prompts: StdMutex::new(Vec::new()),
            challenges: AtomicUsize::new(0),
        }
    }

    /// Add an outcome to the end of the queue.
    pub async fn push_outcome(&self, outcome: ChallengeOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    pub fn set_status(&self, status: BiometricStatus) {
        *lock(&self.status) = status;
    }

    /// Number of prompts shown so far.
    pub fn challenge_count(&self) -> usize {
        self.challenges.load(Ordering::SeqCst)
    }

    /// Every prompt shown, oldest first.
    pub fn prompts(&self) -> Vec<PromptInfo> {
        lock(&self.prompts).clone()
    }

    async fn next_outcome(&self) -> ChallengeOutcome {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(ChallengeOutcome::Approve)
    }
}

impl Default for MockChallenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BiometricChallenger for MockChallenger {
    async fn status(&self) -> BiometricStatus {
        *lock(&self.status)
    }

    async fn challenge(
        &self,
        prompt: &PromptInfo,
        cipher: Box<dyn BoundCipher>,
    ) -> Result<Box<dyn BoundCipher>, ChallengeError> {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(prompt.clone());
        match self.next_outcome().await {
            ChallengeOutcome::Approve => Ok(cipher),
            ChallengeOutcome::Cancel => Err(ChallengeError::Cancelled("user pressed cancel".into())),
            ChallengeOutcome::Fail => Err(ChallengeError::Failed("fingerprint not recognized".into())),
            ChallengeOutcome::DropCipher => Err(ChallengeError::CipherUnavailable),
        }
    }
}
