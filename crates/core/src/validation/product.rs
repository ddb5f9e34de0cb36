//! Product schemas.
//!
//! [`ProductInput`] is the stock form (identifier, category, initial stock,
//! alert threshold) and is what the product endpoints accept.
//! [`CatalogProductInput`] is the priced catalog form.

use serde::{Deserialize, Serialize};

use super::{
    FieldErrors, Validate, fields, non_negative_count, optional_max_len, positive_decimal,
    required,
};
use crate::types::Price;

/// Maximum length of the free-text note on a catalog product.
pub const MAX_NOTE_LENGTH: usize = 500;

// =============================================================================
// Stock product
// =============================================================================

/// Stock product form as typed. Numbers arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductInput {
    pub identifier: String,
    pub name: String,
    pub category: String,
    pub initial_stock: String,
    pub alert_threshold: String,
}

/// Validated stock product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub identifier: String,
    pub name: String,
    pub category: String,
    pub initial_stock: u32,
    /// Never greater than `initial_stock`.
    pub alert_threshold: u32,
}

impl Validate for ProductInput {
    type Output = ProductDraft;

    fn validate(&self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let identifier = required(
            &mut errors,
            fields::IDENTIFIER,
            &self.identifier,
            "Enter the identifier",
        );
        let name = required(&mut errors, fields::NAME, &self.name, "Enter the name");
        let category = required(
            &mut errors,
            fields::CATEGORY,
            &self.category,
            "Select a category",
        );
        let initial_stock = non_negative_count(&mut errors, fields::INITIAL_STOCK, &self.initial_stock);
        let alert_threshold =
            non_negative_count(&mut errors, fields::ALERT_THRESHOLD, &self.alert_threshold);

        // Only comparable once both numbers passed their own rules.
        if let (Some(stock), Some(threshold)) = (initial_stock, alert_threshold)
            && threshold > stock
        {
            errors.add(
                fields::ALERT_THRESHOLD,
                "Alert threshold must be less than or equal to the initial stock",
            );
        }

        match (identifier, name, category, initial_stock, alert_threshold) {
            (Some(identifier), Some(name), Some(category), Some(initial_stock), Some(alert_threshold))
                if errors.is_empty() =>
            {
                Ok(ProductDraft {
                    identifier,
                    name,
                    category,
                    initial_stock,
                    alert_threshold,
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Catalog product
// =============================================================================

/// Catalog product form as typed. Numbers arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogProductInput {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub tax_classification_code: String,
    pub note: String,
}

/// Validated catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProductDraft {
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub tax_classification_code: String,
    pub note: Option<String>,
}

impl Validate for CatalogProductInput {
    type Output = CatalogProductDraft;

    fn validate(&self) -> Result<CatalogProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, fields::NAME, &self.name, "Enter the name");
        let price = positive_decimal(&mut errors, fields::PRICE, &self.price).and_then(Price::new);
        let stock = non_negative_count(&mut errors, fields::STOCK, &self.stock);
        let tax_classification_code = required(
            &mut errors,
            fields::TAX_CLASSIFICATION_CODE,
            &self.tax_classification_code,
            "Enter the tax classification code",
        );
        let note = optional_max_len(&mut errors, fields::NOTE, &self.note, MAX_NOTE_LENGTH);

        match (name, price, stock, tax_classification_code, note) {
            (Some(name), Some(price), Some(stock), Some(tax_classification_code), Some(note))
                if errors.is_empty() =>
            {
                Ok(CatalogProductDraft {
                    name,
                    price,
                    stock,
                    tax_classification_code,
                    note,
                })
            }
            _ => Err(errors),
        }
    }
}
