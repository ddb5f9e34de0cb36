//! Registration schemas: users, clients, and companies.

use serde::{Deserialize, Serialize};

use super::{
    FieldErrors, Validate, fields, optional_max_len, required, required_min_len,
};
use crate::types::{Email, UserRole};

/// Minimum password length for user accounts.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum length of the free-text notes on a user.
pub const MAX_NOTES_LENGTH: usize = 500;
/// Minimum length of a client's tax/identity document.
pub const MIN_DOCUMENT_LENGTH: usize = 5;
/// Minimum length of a company's tax id (14 digits, unformatted).
pub const MIN_TAX_ID_LENGTH: usize = 14;

// =============================================================================
// User
// =============================================================================

/// User form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub email: String,
    /// Form role name (`administrator`, `salesperson`, `veterinarian`).
    pub role: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub notes: String,
}

/// Validated user ready to be sent.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub password: String,
    pub notes: Option<String>,
}

impl std::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .field("notes", &self.notes)
            .finish()
    }
}

impl Validate for UserInput {
    type Output = UserDraft;

    fn validate(&self) -> Result<UserDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, fields::NAME, &self.name, "Enter the name");
        let email = validate_email(&mut errors, &self.email, "Enter the email");
        let role = validate_role(&mut errors, &self.role);
        let password = (self.password.chars().count() >= MIN_PASSWORD_LENGTH)
            .then(|| self.password.clone());
        if password.is_none() {
            errors.add(fields::PASSWORD, "Minimum of 6 characters");
        }
        let notes = optional_max_len(&mut errors, fields::NOTES, &self.notes, MAX_NOTES_LENGTH);

        match (name, email, role, password, notes) {
            (Some(name), Some(email), Some(role), Some(password), Some(notes))
                if errors.is_empty() =>
            {
                Ok(UserDraft {
                    name,
                    email,
                    role,
                    password,
                    notes,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Required, email-shaped field. Shared with the account schemas.
pub(super) fn validate_email(
    errors: &mut FieldErrors,
    value: &str,
    missing_message: &str,
) -> Option<Email> {
    let trimmed = required(errors, fields::EMAIL, value, missing_message)?;
    if let Ok(email) = Email::parse(&trimmed) {
        Some(email)
    } else {
        errors.add(fields::EMAIL, "Invalid email");
        None
    }
}

fn validate_role(errors: &mut FieldErrors, value: &str) -> Option<UserRole> {
    let trimmed = required(errors, fields::ROLE, value, "Select a role")?;
    if let Ok(role) = trimmed.parse::<UserRole>() {
        Some(role)
    } else {
        errors.add(
            fields::ROLE,
            "Role must be administrator, salesperson, or veterinarian",
        );
        None
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientInput {
    pub name: String,
    pub document: String,
}

/// Validated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub document: String,
}

impl Validate for ClientInput {
    type Output = ClientDraft;

    fn validate(&self) -> Result<ClientDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, fields::NAME, &self.name, "Enter the name");
        let document = required_min_len(
            &mut errors,
            fields::DOCUMENT,
            &self.document,
            MIN_DOCUMENT_LENGTH,
            "Enter the document",
        );

        match (name, document) {
            (Some(name), Some(document)) if errors.is_empty() => {
                Ok(ClientDraft { name, document })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Company
// =============================================================================

/// Company form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInput {
    pub legal_name: String,
    pub tax_id: String,
}

/// Validated company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub legal_name: String,
    pub tax_id: String,
}

impl Validate for CompanyInput {
    type Output = CompanyDraft;

    fn validate(&self) -> Result<CompanyDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let legal_name = required(
            &mut errors,
            fields::LEGAL_NAME,
            &self.legal_name,
            "Enter the legal name",
        );
        let tax_id = required_min_len(
            &mut errors,
            fields::TAX_ID,
            &self.tax_id,
            MIN_TAX_ID_LENGTH,
            "Enter the tax ID",
        );

        match (legal_name, tax_id) {
            (Some(legal_name), Some(tax_id)) if errors.is_empty() => {
                Ok(CompanyDraft { legal_name, tax_id })
            }
            _ => Err(errors),
        }
    }
}
