// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The typed document and its fixed sections.
//!
//! Every section sits behind its own [`Arc`]. Replacing one section leaves the
//! other sections' pointers untouched, which lets observers detect changes
//! with [`Arc::ptr_eq`] instead of deep comparison.
//!
//! All structs accept missing fields and fill them with defaults, so documents
//! written by older releases keep loading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::custom::CustomSection;
use crate::welcome::WelcomeScreen;

/// The single document a user records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub meta: Arc<DocumentMeta>,
    pub financial: Arc<FinancialSection>,
    pub insurance: Arc<InsuranceSection>,
    pub bills: Arc<BillsSection>,
    pub property: Arc<PropertySection>,
    pub legal: Arc<LegalSection>,
    pub digital: Arc<DigitalSection>,
    pub household: Arc<HouseholdSection>,
    pub personal: Arc<PersonalSection>,
    pub contacts: Arc<ContactsSection>,
    pub medical: Arc<MedicalSection>,
    pub pets: Arc<PetsSection>,
    pub welcome_screen: Arc<Option<WelcomeScreen>>,
    pub custom_sections: Arc<Vec<CustomSection>>,
}

impl Document {
    /// Parses a persisted JSON body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Serializes the document for durable storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub creator_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Shared shape for people and businesses referenced from several sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

// --- financial ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSection {
    pub bank_accounts: Vec<BankAccount>,
    pub credit_cards: Vec<CreditCard>,
    pub investments: Vec<Investment>,
    pub debts: Vec<Debt>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    pub name: String,
    pub institution: String,
    pub account_type: String,
    pub last_four: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCard {
    pub name: String,
    pub issuer: String,
    pub last_four: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Investment {
    pub name: String,
    pub institution: String,
    pub account_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Debt {
    pub name: String,
    pub lender: String,
    pub notes: String,
}

// --- insurance ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceSection {
    pub policies: Vec<InsurancePolicy>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsurancePolicy {
    /// Free-form kind: life, health, home, auto.
    pub policy_type: String,
    pub provider: String,
    pub policy_number: String,
    pub contact: String,
    pub notes: String,
}

// --- bills ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillsSection {
    pub bills: Vec<Bill>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bill {
    pub name: String,
    pub provider: String,
    pub amount: String,
    pub due_day: String,
    pub autopay: bool,
    pub notes: String,
}

// --- property ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySection {
    pub properties: Vec<Property>,
    pub vehicles: Vec<Vehicle>,
    pub valuables: Vec<Valuable>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    pub name: String,
    pub address: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    pub name: String,
    pub details: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Valuable {
    pub name: String,
    pub location: String,
    pub notes: String,
}

// --- legal ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalSection {
    pub will_location: String,
    pub attorney: Contact,
    pub power_of_attorney: String,
    pub trusts: Vec<Trust>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trust {
    pub name: String,
    pub trustee: String,
    pub notes: String,
}

// --- digital ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitalSection {
    pub email_accounts: Vec<DigitalAccount>,
    pub social_media: Vec<DigitalAccount>,
    pub password_manager: PasswordManagerInfo,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitalAccount {
    pub name: String,
    pub username: String,
    pub recovery_hint: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordManagerInfo {
    pub name: String,
    pub master_password_hint: String,
    pub recovery_method: String,
    pub notes: String,
}

// --- household ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdSection {
    pub maintenance_items: Vec<MaintenanceItem>,
    pub contractors: Vec<Contact>,
    pub how_things_work: Vec<HowTo>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceItem {
    pub name: String,
    pub frequency: String,
    pub last_done: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HowTo {
    pub name: String,
    pub instructions: String,
}

// --- personal ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalSection {
    pub funeral_preferences: String,
    pub obituary_notes: String,
    pub messages: Vec<PersonalMessage>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalMessage {
    pub recipient: String,
    pub message: String,
}

// --- contacts ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsSection {
    pub emergency_contacts: Vec<Contact>,
    pub family: Vec<Contact>,
    pub professionals: Vec<Contact>,
    pub notes: String,
}

// --- medical ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalSection {
    pub family_members: Vec<FamilyMedical>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyMedical {
    pub name: String,
    pub doctors: Vec<Contact>,
    pub medications: Vec<Medication>,
    pub conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub pharmacy: Contact,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescriber: String,
    pub notes: String,
}

// --- pets ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetsSection {
    pub pets: Vec<Pet>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub vet: Contact,
    pub medications: Vec<Medication>,
    pub feeding: String,
    pub care_notes: String,
}
