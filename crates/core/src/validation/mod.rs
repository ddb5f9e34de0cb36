//! Client-side validation schemas.
//!
//! Every form kind has a string-typed input struct (what the operator typed)
//! and a validated draft (what may be sent to the API). [`Validate::validate`]
//! turns one into the other, or returns a non-empty [`FieldErrors`] map from
//! field path to a human-readable message.
//!
//! Rules are pure: validating the same input twice yields the same result, so
//! forms re-run them on every blur.
//!
//! # Conventions
//!
//! - Text is trimmed before it is checked and stored (passwords excepted).
//! - Numeric fields arrive as text. Text that does not parse is a coercion
//!   error ("Enter a number", "Enter a whole number"), distinct from a range error on a parsed value.
//! - Each field reports only its first failing rule.
//! - Cross-field rules attach their message to the field the operator has to
//!   change, never to a form-level slot.

mod account;
mod product;
mod registration;

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

pub use account::{
    ForgotPasswordDraft, ForgotPasswordInput, LoginDraft, LoginInput, ResetPasswordDraft,
    ResetPasswordInput,
};
pub use product::{CatalogProductDraft, CatalogProductInput, ProductDraft, ProductInput};
pub use registration::{
    ClientDraft, ClientInput, CompanyDraft, CompanyInput, UserDraft, UserInput,
};

/// Field paths, spelled as the API spells the fields.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const PASSWORD: &str = "password";
    pub const PASSWORD_CONFIRMATION: &str = "passwordConfirmation";
    pub const NOTES: &str = "notes";
    pub const DOCUMENT: &str = "document";
    pub const LEGAL_NAME: &str = "legalName";
    pub const TAX_ID: &str = "taxId";
    pub const IDENTIFIER: &str = "identifier";
    pub const CATEGORY: &str = "category";
    pub const INITIAL_STOCK: &str = "initialStock";
    pub const ALERT_THRESHOLD: &str = "alertThreshold";
    pub const PRICE: &str = "price";
    pub const STOCK: &str = "stock";
    pub const TAX_CLASSIFICATION_CODE: &str = "taxClassificationCode";
    pub const NOTE: &str = "note";
}

/// A schema that turns raw form input into a validated value.
pub trait Validate {
    /// The accepted, coerced value.
    type Output;

    /// Check every rule of the schema.
    ///
    /// # Errors
    ///
    /// Returns a non-empty [`FieldErrors`] when any rule fails.
    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

/// Field path → message map produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `path` unless the field already has one.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .iter()
            .map(|(path, message)| format!("{path}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Rule helpers
// =============================================================================

/// Trimmed value of a required text field.
fn required(errors: &mut FieldErrors, path: &str, value: &str, message: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(path, message);
        return None;
    }
    Some(trimmed.to_owned())
}

/// Trimmed value of a required text field with a minimum length in characters.
fn required_min_len(
    errors: &mut FieldErrors,
    path: &str,
    value: &str,
    min: usize,
    message: &str,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        errors.add(path, message);
        return None;
    }
    Some(trimmed.to_owned())
}

/// Optional text: empty becomes `None`; longer than `max` characters fails.
fn optional_max_len(
    errors: &mut FieldErrors,
    path: &str,
    value: &str,
    max: usize,
) -> Option<Option<String>> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        errors.add(path, format!("At most {max} characters"));
        return None;
    }
    Some((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}

/// Non-negative whole number typed as text.
fn non_negative_count(errors: &mut FieldErrors, path: &str, value: &str) -> Option<u32> {
    let Ok(parsed) = value.trim().parse::<i64>() else {
        errors.add(path, "Enter a whole number");
        return None;
    };
    if parsed < 0 {
        errors.add(path, "Cannot be negative");
        return None;
    }
    if let Ok(count) = u32::try_from(parsed) {
        Some(count)
    } else {
        errors.add(path, "Number is too large");
        None
    }
}

/// Strictly positive decimal typed as text. A lone comma is read as the
/// decimal separator ("12,50").
fn positive_decimal(errors: &mut FieldErrors, path: &str, value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    let normalized = if trimmed.contains('.') {
        trimmed.to_owned()
    } else {
        trimmed.replacen(',', ".", 1)
    };
    let Ok(parsed) = Decimal::from_str(&normalized) else {
        errors.add(path, "Enter a number");
        return None;
    };
    if parsed <= Decimal::ZERO {
        errors.add(path, "Must be greater than zero");
        return None;
    }
    Some(parsed)
}
