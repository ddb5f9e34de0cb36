//! Entity records as read from the remote API.
//!
//! The remote API is the system of record; these are the local copies held by
//! a list view. Passwords are write-only and never appear on a record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Price, RecordId, UserRole};

/// A system user (operator of the admin panel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A customer of the business (farm, clinic, pharmacy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: RecordId,
    pub name: String,
    /// Tax or identity document, stored as typed (no checksum validation).
    pub document: String,
}

/// A registered company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: RecordId,
    pub legal_name: String,
    pub tax_id: String,
}

/// A stocked product.
///
/// The product identifier (e.g. `PROD-001`) doubles as the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: RecordId,
    pub name: String,
    pub category: Option<String>,
    /// Units currently in stock; what the stock list sorts by.
    pub quantity: i64,
    pub initial_stock: Option<u32>,
    pub alert_threshold: Option<u32>,
    /// Creation time; what the stock list sorts by for newest/oldest.
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Whether the current quantity is at or below the alert threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.alert_threshold
            .is_some_and(|threshold| self.quantity <= i64::from(threshold))
    }
}

/// A priced catalog product.
///
/// An alternative product shape with price and tax classification. It is
/// validated and typed, but the stock endpoints speak [`ProductRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: RecordId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub tax_classification_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Product categories offered by the stock form.
pub const PRODUCT_CATEGORIES: [(&str, &str); 3] = [
    ("homeopathy", "Homeopathy"),
    ("phytotherapy", "Phytotherapy"),
    ("dermocosmetic", "Dermocosmetic"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, alert_threshold: Option<u32>) -> ProductRecord {
        ProductRecord {
            id: RecordId::new("PROD-001"),
            name: "Arnica 30CH".to_owned(),
            category: Some("homeopathy".to_owned()),
            quantity,
            initial_stock: Some(50),
            alert_threshold,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock() {
        assert!(product(5, Some(5)).is_low_stock());
        assert!(!product(6, Some(5)).is_low_stock());
        assert!(!product(0, None).is_low_stock());
    }

    #[test]
    fn test_serializes_camel_case() {
        let company = CompanyRecord {
            id: RecordId::new("E-201"),
            legal_name: "HomeoWare LTDA".to_owned(),
            tax_id: "11.222.333/0001-44".to_owned(),
        };
        let json = serde_json::to_value(&company).unwrap_or_default();
        assert_eq!(json["legalName"], "HomeoWare LTDA");
        assert_eq!(json["taxId"], "11.222.333/0001-44");
    }
}
