// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Notified when the document first gains user data and the user should be
/// asked to protect it with a secret.
pub trait SecretRequiredObserver: Send + Sync {
    fn on_secret_required(&self);
}

impl<F> SecretRequiredObserver for F
where
    F: Fn() + Send + Sync,
{
    fn on_secret_required(&self) {
        self()
    }
}
