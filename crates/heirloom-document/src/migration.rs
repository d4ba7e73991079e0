// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upgrades documents written in older shapes.
//!
//! Custom subsections used to describe their form as a flat
//! `field_definitions` list. The current shape is an ordered `form_elements`
//! list that can also hold dividers and headings. Migration only fills
//! `form_elements` when it is empty; current-shape data always wins.

use std::sync::Arc;

use tracing::debug;

use crate::custom::{CustomSection, FormElement};
use crate::model::Document;

/// What a [`migrate_legacy`] pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub subsections_migrated: usize,
    pub fields_converted: usize,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.subsections_migrated == 0
    }
}

/// Converts legacy flat field lists into form elements, in order.
///
/// Sections that need no migration keep their `Arc` pointer.
pub fn migrate_legacy(doc: &mut Document) -> MigrationReport {
    let pending = doc
        .custom_sections
        .iter()
        .any(|s| s.subsections.iter().any(|sub| sub.needs_migration()));
    if !pending {
        return MigrationReport::default();
    }
    migrate_sections(Arc::<Vec<CustomSection>>::make_mut(&mut doc.custom_sections))
}

/// [`migrate_legacy`] over a bare list of custom sections, as handed in by a
/// whole-section replacement.
pub fn migrate_sections(sections: &mut [CustomSection]) -> MigrationReport {
    let mut report = MigrationReport::default();
    for section in sections {
        for sub in &mut section.subsections {
            if !sub.needs_migration() {
                continue;
            }
            let legacy = std::mem::take(&mut sub.field_definitions);
            report.fields_converted += legacy.len();
            report.subsections_migrated += 1;
            sub.form_elements = legacy.into_iter().map(FormElement::from).collect();
            debug!(
                section_id = %section.id,
                subsection_id = %sub.id,
                fields = sub.form_elements.len(),
                "migrated legacy field definitions"
            );
        }
    }
    report
}
