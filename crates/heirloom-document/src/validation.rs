// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural checks on custom sections.
//!
//! Writes are never rejected for these issues. Callers decide whether to
//! report them or to repair the document with
//! [`Document::reconcile_custom_items`].

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::model::Document;

/// A structural problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIssue {
    #[error("custom section id `{section_id}` is used more than once")]
    DuplicateSectionId { section_id: String },

    #[error("subsection id `{subsection_id}` is used more than once in section `{section_id}`")]
    DuplicateSubsectionId {
        section_id: String,
        subsection_id: String,
    },

    #[error(
        "item `{item_id}` in `{section_id}/{subsection_id}` has a value for unknown field `{field_id}`"
    )]
    UnknownFieldKey {
        section_id: String,
        subsection_id: String,
        item_id: String,
        field_id: String,
    },
}

impl Document {
    /// Collects every structural issue in the custom sections.
    pub fn validate(&self) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();
        let mut section_ids = HashSet::new();

        for section in self.custom_sections.iter() {
            if !section_ids.insert(section.id.as_str()) {
                issues.push(DocumentIssue::DuplicateSectionId {
                    section_id: section.id.clone(),
                });
            }

            let mut subsection_ids = HashSet::new();
            for sub in &section.subsections {
                if !subsection_ids.insert(sub.id.as_str()) {
                    issues.push(DocumentIssue::DuplicateSubsectionId {
                        section_id: section.id.clone(),
                        subsection_id: sub.id.clone(),
                    });
                }

                let fields = sub.field_ids();
                for item in &sub.items {
                    for key in item.values.keys() {
                        if !fields.contains(key.as_str()) {
                            issues.push(DocumentIssue::UnknownFieldKey {
                                section_id: section.id.clone(),
                                subsection_id: sub.id.clone(),
                                item_id: item.id.clone(),
                                field_id: key.clone(),
                            });
                        }
                    }
                }
            }
        }

        issues
    }

    /// Drops item values keyed by ids that are not fields of their
    /// subsection. Returns how many values were removed.
    pub fn reconcile_custom_items(&mut self) -> usize {
        let stale = self.validate().iter().any(|issue| {
            matches!(issue, DocumentIssue::UnknownFieldKey { .. })
        });
        if !stale {
            return 0;
        }

        let mut removed = 0;
        for section in Arc::make_mut(&mut self.custom_sections) {
            for sub in &mut section.subsections {
                let fields: HashSet<String> =
                    sub.field_ids().into_iter().map(str::to_owned).collect();
                for item in &mut sub.items {
                    let before = item.values.len();
                    item.values.retain(|key, _| fields.contains(key));
                    removed += before - item.values.len();
                }
            }
        }

        debug!(removed, "reconciled custom item values");
        removed
    }
}
