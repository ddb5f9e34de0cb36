//! Tagged unions over the registration and stock forms.
//!
//! A single [`FormInput`] value carries whichever form is open, discriminated
//! by its `kind` field, so one modal can host every kind without untyped
//! payloads.

use serde::{Deserialize, Serialize};

use crate::records::{ClientRecord, CompanyRecord, ProductRecord, UserRecord};
use crate::validation::{
    ClientDraft, ClientInput, CompanyDraft, CompanyInput, FieldErrors, ProductDraft, ProductInput,
    UserDraft, UserInput, Validate,
};

/// The list-backed entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Client,
    Company,
    Product,
}

impl RecordKind {
    /// Human-readable singular noun.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Client => "client",
            Self::Company => "company",
            Self::Product => "product",
        }
    }

    /// Modal title for creating or editing a record of this kind.
    #[must_use]
    pub fn form_title(self, editing: bool) -> String {
        let verb = if editing { "Edit" } else { "Create" };
        format!("{verb} {}", self.noun())
    }

    /// Whether records of this kind can be deleted from the admin panel.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        matches!(self, Self::User | Self::Product)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// Raw input of whichever form is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormInput {
    User(UserInput),
    Client(ClientInput),
    Company(CompanyInput),
    Product(ProductInput),
}

/// Validated payload of whichever form was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    User(UserDraft),
    Client(ClientDraft),
    Company(CompanyDraft),
    Product(ProductDraft),
}

impl FormInput {
    /// Empty form of the given kind.
    #[must_use]
    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::User => Self::User(UserInput::default()),
            RecordKind::Client => Self::Client(ClientInput::default()),
            RecordKind::Company => Self::Company(CompanyInput::default()),
            RecordKind::Product => Self::Product(ProductInput::default()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::User(_) => RecordKind::User,
            Self::Client(_) => RecordKind::Client,
            Self::Company(_) => RecordKind::Company,
            Self::Product(_) => RecordKind::Product,
        }
    }

    /// Run the schema of the form's kind.
    ///
    /// # Errors
    ///
    /// Returns the field errors of the failing schema.
    pub fn validate(&self) -> Result<FormPayload, FieldErrors> {
        match self {
            Self::User(input) => input.validate().map(FormPayload::User),
            Self::Client(input) => input.validate().map(FormPayload::Client),
            Self::Company(input) => input.validate().map(FormPayload::Company),
            Self::Product(input) => input.validate().map(FormPayload::Product),
        }
    }

    /// Set one field by its path. Returns `false` when the form has no such
    /// field.
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> bool {
        let slot = match self {
            Self::User(input) => match path {
                "name" => &mut input.name,
                "email" => &mut input.email,
                "role" => &mut input.role,
                "password" => &mut input.password,
                "notes" => &mut input.notes,
                _ => return false,
            },
            Self::Client(input) => match path {
                "name" => &mut input.name,
                "document" => &mut input.document,
                _ => return false,
            },
            Self::Company(input) => match path {
                "legalName" => &mut input.legal_name,
                "taxId" => &mut input.tax_id,
                _ => return false,
            },
            Self::Product(input) => match path {
                "identifier" => &mut input.identifier,
                "name" => &mut input.name,
                "category" => &mut input.category,
                "initialStock" => &mut input.initial_stock,
                "alertThreshold" => &mut input.alert_threshold,
                _ => return false,
            },
        };
        *slot = value.into();
        true
    }
}

impl FormPayload {
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::User(_) => RecordKind::User,
            Self::Client(_) => RecordKind::Client,
            Self::Company(_) => RecordKind::Company,
            Self::Product(_) => RecordKind::Product,
        }
    }
}

// Edit defaults. The password is write-only, so an edited user starts blank.

impl From<&UserRecord> for FormInput {
    fn from(record: &UserRecord) -> Self {
        Self::User(UserInput {
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role.form_name().to_owned(),
            password: String::new(),
            notes: record.notes.clone().unwrap_or_default(),
        })
    }
}

impl From<&ClientRecord> for FormInput {
    fn from(record: &ClientRecord) -> Self {
        Self::Client(ClientInput {
            name: record.name.clone(),
            document: record.document.clone(),
        })
    }
}

impl From<&CompanyRecord> for FormInput {
    fn from(record: &CompanyRecord) -> Self {
        Self::Company(CompanyInput {
            legal_name: record.legal_name.clone(),
            tax_id: record.tax_id.clone(),
        })
    }
}

impl From<&ProductRecord> for FormInput {
    fn from(record: &ProductRecord) -> Self {
        let initial_stock = record
            .initial_stock
            .map_or_else(|| record.quantity.to_string(), |n| n.to_string());
        Self::Product(ProductInput {
            identifier: record.id.to_string(),
            name: record.name.clone(),
            category: record.category.clone().unwrap_or_default(),
            initial_stock,
            alert_threshold: record.alert_threshold.unwrap_or(0).to_string(),
        })
    }
}
