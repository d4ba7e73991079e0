// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced, dirty-tracked persistence for the Heirloom document.
//!
//! [`PersistenceEngine`] owns the canonical document. Section edits are
//! applied in memory at once and written to the [`DocumentStore`] after an
//! idle window; [`SectionProjection`] gives cheap derived views over single
//! sections.
//!
//! [`DocumentStore`]: heirloom_core::traits::DocumentStore

pub mod engine;
pub mod projection;
pub mod state;
pub mod timer;

pub use engine::PersistenceEngine;
pub use projection::SectionProjection;
pub use state::{FlushOutcome, PersistenceState};
pub use timer::IdleTimer;
