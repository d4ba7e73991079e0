// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The "does this document hold user data" predicate.
//!
//! Only entries count. Free-text `notes`, the meta block and the welcome
//! screen never make a document non-empty, so a user can poke around the
//! empty form without being asked for a secret.

use crate::custom::CustomSection;
use crate::model::{
    BillsSection, ContactsSection, DigitalSection, Document, FinancialSection, HouseholdSection,
    InsuranceSection, LegalSection, MedicalSection, PersonalSection, PetsSection, PropertySection,
};

/// Sections that can hold user data.
pub trait HasData {
    fn has_data(&self) -> bool;
}

impl HasData for FinancialSection {
    fn has_data(&self) -> bool {
        !self.bank_accounts.is_empty()
            || !self.credit_cards.is_empty()
            || !self.investments.is_empty()
            || !self.debts.is_empty()
    }
}

impl HasData for InsuranceSection {
    fn has_data(&self) -> bool {
        !self.policies.is_empty()
    }
}

impl HasData for BillsSection {
    fn has_data(&self) -> bool {
        !self.bills.is_empty()
    }
}

impl HasData for PropertySection {
    fn has_data(&self) -> bool {
        !self.properties.is_empty() || !self.vehicles.is_empty() || !self.valuables.is_empty()
    }
}

impl HasData for LegalSection {
    fn has_data(&self) -> bool {
        !self.trusts.is_empty() || !self.will_location.is_empty() || !self.power_of_attorney.is_empty()
    }
}

impl HasData for DigitalSection {
    fn has_data(&self) -> bool {
        !self.email_accounts.is_empty() || !self.social_media.is_empty()
    }
}

impl HasData for HouseholdSection {
    fn has_data(&self) -> bool {
        !self.maintenance_items.is_empty()
            || !self.contractors.is_empty()
            || !self.how_things_work.is_empty()
    }
}

impl HasData for PersonalSection {
    fn has_data(&self) -> bool {
        !self.messages.is_empty()
            || !self.funeral_preferences.is_empty()
            || !self.obituary_notes.is_empty()
    }
}

impl HasData for ContactsSection {
    fn has_data(&self) -> bool {
        !self.emergency_contacts.is_empty() || !self.family.is_empty() || !self.professionals.is_empty()
    }
}

impl HasData for MedicalSection {
    fn has_data(&self) -> bool {
        !self.family_members.is_empty()
    }
}

impl HasData for PetsSection {
    fn has_data(&self) -> bool {
        !self.pets.is_empty()
    }
}

impl HasData for Vec<CustomSection> {
    fn has_data(&self) -> bool {
        self.iter()
            .any(|section| section.subsections.iter().any(|sub| !sub.items.is_empty()))
    }
}

impl HasData for Document {
    fn has_data(&self) -> bool {
        self.financial.has_data()
            || self.insurance.has_data()
            || self.bills.has_data()
            || self.property.has_data()
            || self.legal.has_data()
            || self.digital.has_data()
            || self.household.has_data()
            || self.personal.has_data()
            || self.contacts.has_data()
            || self.medical.has_data()
            || self.pets.has_data()
            || self.custom_sections.has_data()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::custom::{CustomItem, CustomSubsection};
    use crate::model::{BankAccount, DocumentMeta, Pet};
    use crate::welcome::WelcomeScreen;

    #[test]
    fn default_document_is_empty() {
        assert!(!Document::default().has_data());
    }

    #[test]
    fn notes_meta_and_welcome_never_count() {
        let mut doc = Document::default();
        doc.financial = Arc::new(FinancialSection {
            notes: "remember the safe".into(),
            ..Default::default()
        });
        doc.meta = Arc::new(DocumentMeta {
            creator_name: "Sam".into(),
            ..Default::default()
        });
        doc.welcome_screen = Arc::new(Some(WelcomeScreen {
            enabled: true,
            ..Default::default()
        }));
        assert!(!doc.has_data());
    }

    #[test]
    fn list_entries_count() {
        let mut doc = Document::default();
        doc.financial = Arc::new(FinancialSection {
            bank_accounts: vec![BankAccount::default()],
            ..Default::default()
        });
        assert!(doc.has_data());

        let mut doc = Document::default();
        doc.pets = Arc::new(PetsSection {
            pets: vec![Pet::default()],
            ..Default::default()
        });
        assert!(doc.has_data());
    }

    #[test]
    fn scalar_legal_and_personal_fields_count() {
        let legal = LegalSection {
            will_location: "top drawer".into(),
            ..Default::default()
        };
        assert!(legal.has_data());

        let personal = PersonalSection {
            obituary_notes: "short".into(),
            ..Default::default()
        };
        assert!(personal.has_data());
    }

    #[test]
    fn custom_sections_count_only_with_items() {
        let mut sections = vec![CustomSection {
            id: "c1".into(),
            subsections: vec![CustomSubsection::default()],
            ..Default::default()
        }];
        assert!(!sections.has_data());

        sections[0].subsections[0].items.push(CustomItem::default());
        assert!(sections.has_data());
    }
}
