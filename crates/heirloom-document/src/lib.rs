// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Heirloom document model.
//!
//! A [`Document`] is a fixed set of named sections plus user-defined custom
//! sections. Mutation happens one whole section at a time through
//! [`SectionUpdate`], and [`HasData`] decides whether the document holds
//! anything worth protecting.

pub mod custom;
pub mod has_data;
pub mod migration;
pub mod model;
pub mod section;
pub mod validation;
pub mod welcome;

pub use custom::{CustomItem, CustomSection, CustomSubsection, FieldDefinition, FieldType, FormElement};
pub use has_data::HasData;
pub use migration::{MigrationReport, migrate_legacy, migrate_sections};
pub use model::*;
pub use section::{SectionName, SectionUpdate};
pub use validation::DocumentIssue;
pub use welcome::{MessageSlide, SlideTransition, SlideType, WelcomeScreen};
