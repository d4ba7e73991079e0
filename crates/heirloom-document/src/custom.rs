// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-defined sections with their own form layout.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub id: String,
    pub name: String,
    /// Name of the fixed section this one is nested under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub subsections: Vec<CustomSubsection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSubsection {
    pub id: String,
    pub name: String,
    pub form_elements: Vec<FormElement>,
    pub items: Vec<CustomItem>,
    /// Flat field list written by older releases. Read for migration only.
    #[serde(skip_serializing)]
    pub field_definitions: Vec<FieldDefinition>,
}

impl CustomSubsection {
    /// Ids of the fields items may carry values for.
    ///
    /// Falls back to the legacy field list while `form_elements` is empty.
    pub fn field_ids(&self) -> HashSet<&str> {
        if self.form_elements.is_empty() {
            return self
                .field_definitions
                .iter()
                .map(|f| f.id.as_str())
                .collect();
        }
        self.form_elements
            .iter()
            .filter_map(|e| match e {
                FormElement::Field { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when only the legacy field list describes this subsection.
    pub fn needs_migration(&self) -> bool {
        self.form_elements.is_empty() && !self.field_definitions.is_empty()
    }
}

/// One entry in a subsection's ordered form layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormElement {
    Field {
        id: String,
        name: String,
        #[serde(default)]
        field_type: FieldType,
    },
    Divider {
        id: String,
    },
    Heading {
        id: String,
        text: String,
    },
}

impl FormElement {
    pub fn id(&self) -> &str {
        match self {
            FormElement::Field { id, .. }
            | FormElement::Divider { id }
            | FormElement::Heading { id, .. } => id,
        }
    }
}

impl From<FieldDefinition> for FormElement {
    fn from(def: FieldDefinition) -> Self {
        FormElement::Field {
            id: def.id,
            name: def.name,
            field_type: def.field_type,
        }
    }
}

/// Legacy flat field description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomItem {
    pub id: String,
    /// Field id to value.
    pub values: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_elements_are_tagged_by_type() {
        let elements: Vec<FormElement> = serde_json::from_str(
            r#"[
                {"type":"heading","id":"h1","text":"Accounts"},
                {"type":"field","id":"f1","name":"Site","field_type":"text"},
                {"type":"divider","id":"d1"},
                {"type":"field","id":"f2","name":"Opened","field_type":"date"}
            ]"#,
        )
        .unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].id(), "h1");
        assert!(matches!(
            elements[3],
            FormElement::Field {
                field_type: FieldType::Date,
                ..
            }
        ));
    }

    #[test]
    fn field_ids_skip_layout_elements() {
        let sub = CustomSubsection {
            form_elements: vec![
                FormElement::Heading {
                    id: "h".into(),
                    text: "x".into(),
                },
                FormElement::Field {
                    id: "f".into(),
                    name: "F".into(),
                    field_type: FieldType::Text,
                },
                FormElement::Divider { id: "d".into() },
            ],
            ..Default::default()
        };
        let ids = sub.field_ids();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("f"));
    }

    #[test]
    fn legacy_fields_are_read_but_not_written() {
        let sub: CustomSubsection = serde_json::from_str(
            r#"{"id":"s","name":"S","field_definitions":[{"id":"a","name":"A","field_type":"number"}],"items":[]}"#,
        )
        .unwrap();
        assert!(sub.needs_migration());
        assert!(sub.field_ids().contains("a"));

        let body = serde_json::to_string(&sub).unwrap();
        assert!(!body.contains("field_definitions"));
    }
}
