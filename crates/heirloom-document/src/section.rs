// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Section names and whole-section replacement payloads.

use std::sync::Arc;

use heirloom_core::HeirloomError;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::custom::CustomSection;
use crate::migration::migrate_sections;
use crate::model::{
    BillsSection, ContactsSection, DigitalSection, Document, DocumentMeta, FinancialSection,
    HouseholdSection, InsuranceSection, LegalSection, MedicalSection, PersonalSection, PetsSection,
    PropertySection,
};
use crate::welcome::WelcomeScreen;

/// Name of a top-level document section, as it appears in the JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SectionName {
    Meta,
    Financial,
    Insurance,
    Bills,
    Property,
    Legal,
    Digital,
    Household,
    Personal,
    Contacts,
    Medical,
    Pets,
    WelcomeScreen,
    CustomSections,
}

/// A replacement value for one whole section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionUpdate {
    Meta(DocumentMeta),
    Financial(FinancialSection),
    Insurance(InsuranceSection),
    Bills(BillsSection),
    Property(PropertySection),
    Legal(LegalSection),
    Digital(DigitalSection),
    Household(HouseholdSection),
    Personal(PersonalSection),
    Contacts(ContactsSection),
    Medical(MedicalSection),
    Pets(PetsSection),
    WelcomeScreen(Option<WelcomeScreen>),
    CustomSections(Vec<CustomSection>),
}

impl SectionUpdate {
    pub fn name(&self) -> SectionName {
        match self {
            SectionUpdate::Meta(_) => SectionName::Meta,
            SectionUpdate::Financial(_) => SectionName::Financial,
            SectionUpdate::Insurance(_) => SectionName::Insurance,
            SectionUpdate::Bills(_) => SectionName::Bills,
            SectionUpdate::Property(_) => SectionName::Property,
            SectionUpdate::Legal(_) => SectionName::Legal,
            SectionUpdate::Digital(_) => SectionName::Digital,
            SectionUpdate::Household(_) => SectionName::Household,
            SectionUpdate::Personal(_) => SectionName::Personal,
            SectionUpdate::Contacts(_) => SectionName::Contacts,
            SectionUpdate::Medical(_) => SectionName::Medical,
            SectionUpdate::Pets(_) => SectionName::Pets,
            SectionUpdate::WelcomeScreen(_) => SectionName::WelcomeScreen,
            SectionUpdate::CustomSections(_) => SectionName::CustomSections,
        }
    }

    /// Builds an update from a section name and its JSON payload.
    ///
    /// Unknown names and payloads that do not fit the section are
    /// [`HeirloomError::Validation`] errors.
    pub fn from_json(name: &str, value: Value) -> Result<Self, HeirloomError> {
        let section: SectionName = name
            .parse()
            .map_err(|_| HeirloomError::Validation(format!("unknown section `{name}`")))?;
        Self::from_value(section, value)
    }

    fn from_value(section: SectionName, value: Value) -> Result<Self, HeirloomError> {
        fn parse<T: serde::de::DeserializeOwned>(
            section: SectionName,
            value: Value,
        ) -> Result<T, HeirloomError> {
            serde_json::from_value(value).map_err(|e| {
                HeirloomError::Validation(format!("invalid payload for section `{section}`: {e}"))
            })
        }

        Ok(match section {
            SectionName::Meta => SectionUpdate::Meta(parse(section, value)?),
            SectionName::Financial => SectionUpdate::Financial(parse(section, value)?),
            SectionName::Insurance => SectionUpdate::Insurance(parse(section, value)?),
            SectionName::Bills => SectionUpdate::Bills(parse(section, value)?),
            SectionName::Property => SectionUpdate::Property(parse(section, value)?),
            SectionName::Legal => SectionUpdate::Legal(parse(section, value)?),
            SectionName::Digital => SectionUpdate::Digital(parse(section, value)?),
            SectionName::Household => SectionUpdate::Household(parse(section, value)?),
            SectionName::Personal => SectionUpdate::Personal(parse(section, value)?),
            SectionName::Contacts => SectionUpdate::Contacts(parse(section, value)?),
            SectionName::Medical => SectionUpdate::Medical(parse(section, value)?),
            SectionName::Pets => SectionUpdate::Pets(parse(section, value)?),
            SectionName::WelcomeScreen => SectionUpdate::WelcomeScreen(parse(section, value)?),
            SectionName::CustomSections => SectionUpdate::CustomSections(parse(section, value)?),
        })
    }
}

impl Document {
    /// Replaces one section. Every other section keeps its pointer.
    pub fn apply(&mut self, update: SectionUpdate) {
        match update {
            SectionUpdate::Meta(v) => self.meta = Arc::new(v),
            SectionUpdate::Financial(v) => self.financial = Arc::new(v),
            SectionUpdate::Insurance(v) => self.insurance = Arc::new(v),
            SectionUpdate::Bills(v) => self.bills = Arc::new(v),
            SectionUpdate::Property(v) => self.property = Arc::new(v),
            SectionUpdate::Legal(v) => self.legal = Arc::new(v),
            SectionUpdate::Digital(v) => self.digital = Arc::new(v),
            SectionUpdate::Household(v) => self.household = Arc::new(v),
            SectionUpdate::Personal(v) => self.personal = Arc::new(v),
            SectionUpdate::Contacts(v) => self.contacts = Arc::new(v),
            SectionUpdate::Medical(v) => self.medical = Arc::new(v),
            SectionUpdate::Pets(v) => self.pets = Arc::new(v),
            SectionUpdate::WelcomeScreen(v) => self.welcome_screen = Arc::new(v),
            SectionUpdate::CustomSections(mut v) => {
                migrate_sections(&mut v);
                self.custom_sections = Arc::new(v);
            }
        }
    }

    /// Returns a copy of this document with one section replaced.
    pub fn with_section(&self, update: SectionUpdate) -> Document {
        let mut next = self.clone();
        next.apply(update);
        next
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::model::Pet;

    #[test]
    fn section_names_match_json_keys() {
        let body = serde_json::to_value(Document::default()).unwrap();
        let keys = body.as_object().unwrap();
        for name in SectionName::iter() {
            assert!(keys.contains_key(&name.to_string()), "missing key {name}");
        }
        assert_eq!(keys.len(), SectionName::iter().count());
        assert_eq!(SectionName::from_str("custom_sections").unwrap(), SectionName::CustomSections);
    }

    #[test]
    fn apply_replaces_only_the_named_section() {
        let doc = Document::default();
        let next = doc.with_section(SectionUpdate::Pets(PetsSection {
            pets: vec![Pet {
                name: "Rex".into(),
                ..Default::default()
            }],
            notes: String::new(),
        }));

        assert!(!Arc::ptr_eq(&doc.pets, &next.pets));
        assert!(Arc::ptr_eq(&doc.financial, &next.financial));
        assert!(Arc::ptr_eq(&doc.custom_sections, &next.custom_sections));
        assert_eq!(next.pets.pets[0].name, "Rex");
    }

    #[test]
    fn from_json_parses_named_payload() {
        let update = SectionUpdate::from_json(
            "financial",
            json!({"bank_accounts": [{"name": "Checking", "institution": "Credit Union"}]}),
        )
        .unwrap();
        assert_eq!(update.name(), SectionName::Financial);
        match update {
            SectionUpdate::Financial(f) => assert_eq!(f.bank_accounts[0].institution, "Credit Union"),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn welcome_screen_accepts_null() {
        let update = SectionUpdate::from_json("welcome_screen", Value::Null).unwrap();
        assert_eq!(update, SectionUpdate::WelcomeScreen(None));
    }

    #[test]
    fn unknown_section_is_validation_error() {
        let err = SectionUpdate::from_json("garden", json!({})).unwrap_err();
        assert!(matches!(err, HeirloomError::Validation(ref m) if m.contains("garden")));
    }

    #[test]
    fn malformed_payload_is_validation_error() {
        let err = SectionUpdate::from_json("pets", json!({"pets": "not a list"})).unwrap_err();
        assert!(matches!(err, HeirloomError::Validation(ref m) if m.contains("pets")));
    }

    #[test]
    fn legacy_custom_sections_survive_serialization() {
        let update = SectionUpdate::from_json(
            "custom_sections",
            json!([{
                "id": "vault",
                "name": "Vault",
                "subsections": [{
                    "id": "logins",
                    "name": "Logins",
                    "field_definitions": [{"id": "site", "name": "Site", "field_type": "text"}],
                    "items": [{"id": "i1", "values": {"site": "example.org"}}]
                }]
            }]),
        )
        .unwrap();
        let next = Document::default().with_section(update);

        let body = next.to_json().unwrap();
        let reread = Document::from_json(&body).unwrap();
        let sub = &reread.custom_sections[0].subsections[0];
        assert_eq!(sub.form_elements.len(), 1);
        assert_eq!(sub.form_elements[0].id(), "site");
        assert!(reread.validate().is_empty());
    }
}
