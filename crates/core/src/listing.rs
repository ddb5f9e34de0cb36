//! Filtered, ordered views over in-memory record lists.
//!
//! Views borrow from the source collection and never reorder or mutate it.
//! Recompute a view whenever the collection, the query, or the sort key
//! changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{ClientRecord, CompanyRecord, ProductRecord, UserRecord};

/// Records that can be matched against a free-text query.
pub trait Searchable {
    /// Fields compared against the query, case-insensitively.
    fn search_fields(&self) -> Vec<&str>;

    /// Whether any search field contains `needle` (already lowercased).
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Records that can be ordered by quantity and creation time.
pub trait Sortable {
    fn quantity(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Sort selection of the stock list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Smallest quantity first.
    #[default]
    QuantityAsc,
    /// Largest quantity first.
    QuantityDesc,
    /// Oldest first.
    CreatedAsc,
    /// Newest first.
    CreatedDesc,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantity-asc" => Ok(Self::QuantityAsc),
            "quantity-desc" => Ok(Self::QuantityDesc),
            "created-asc" => Ok(Self::CreatedAsc),
            "created-desc" => Ok(Self::CreatedDesc),
            _ => Err(format!(
                "invalid sort key: {s} (expected quantity-asc, quantity-desc, created-asc, created-desc)"
            )),
        }
    }
}

/// Records whose search fields contain `query`, in source order.
///
/// The query is trimmed and compared case-insensitively. An empty query
/// returns every record.
#[must_use]
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

/// Stable sort of borrowed records; equal keys keep their relative order in
/// both directions.
pub fn sort<T: Sortable>(items: &mut [&T], key: SortKey) {
    match key {
        SortKey::QuantityAsc => items.sort_by_key(|item| item.quantity()),
        SortKey::QuantityDesc => items.sort_by(|a, b| b.quantity().cmp(&a.quantity())),
        SortKey::CreatedAsc => items.sort_by_key(|item| item.created_at()),
        SortKey::CreatedDesc => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
    }
}

/// Filter then sort.
#[must_use]
pub fn view<'a, T: Searchable + Sortable>(items: &'a [T], query: &str, key: SortKey) -> Vec<&'a T> {
    let mut visible = filter(items, query);
    sort(&mut visible, key);
    visible
}

impl Searchable for UserRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.id.as_str()]
    }
}

impl Searchable for ClientRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.document.as_str(), self.id.as_str()]
    }
}

impl Searchable for CompanyRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.legal_name.as_str(), self.tax_id.as_str(), self.id.as_str()]
    }
}

impl Searchable for ProductRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.id.as_str()];
        if let Some(category) = &self.category {
            fields.push(category.as_str());
        }
        fields
    }
}

impl Sortable for ProductRecord {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::RecordId;

    fn product(id: &str, name: &str, quantity: i64, day: u32) -> ProductRecord {
        ProductRecord {
            id: RecordId::new(id),
            name: name.to_owned(),
            category: Some("homeopathy".to_owned()),
            quantity,
            initial_stock: None,
            alert_threshold: None,
            created_at: Utc
                .with_ymd_and_hms(2025, 1, day, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    fn stock() -> Vec<ProductRecord> {
        vec![
            product("SKU-00123", "Tintura Arnica 30CH", 42, 12),
            product("SKU-00456", "Pomada Calêndula 10%", 12, 3),
            product("SKU-00789", "Solução Sinus 20ml", 5, 28),
            product("SKU-01012", "Solução Sinus 25ml", 5, 10),
            product("SKU-01315", "Solução Sinus 30ml", 5, 8),
        ]
    }

    fn ids<'a>(items: &[&'a ProductRecord]) -> Vec<&'a str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let items = stock();
        for query in ["", "   "] {
            let visible = filter(&items, query);
            assert_eq!(visible.len(), items.len());
            assert!(visible.iter().zip(&items).all(|(a, b)| std::ptr::eq(*a, b)));
        }
    }

    #[test]
    fn test_filter_case_insensitive_on_name_and_id() {
        let items = stock();
        assert_eq!(ids(&filter(&items, "SINUS")).len(), 3);
        assert_eq!(ids(&filter(&items, "sku-00456")), vec!["SKU-00456"]);
        assert_eq!(ids(&filter(&items, "calêndula")), vec!["SKU-00456"]);
        assert!(filter(&items, "ivermectin").is_empty());
    }

    #[test]
    fn test_sort_quantity_is_stable_in_both_directions() {
        let items = stock();

        let asc = view(&items, "", SortKey::QuantityAsc);
        assert_eq!(
            ids(&asc),
            vec!["SKU-00789", "SKU-01012", "SKU-01315", "SKU-00456", "SKU-00123"]
        );

        let desc = view(&items, "", SortKey::QuantityDesc);
        assert_eq!(
            ids(&desc),
            vec!["SKU-00123", "SKU-00456", "SKU-00789", "SKU-01012", "SKU-01315"]
        );
    }

    #[test]
    fn test_distinct_keys_reverse_exactly() {
        let items: Vec<_> = stock().into_iter().take(3).collect();
        let asc = ids(&view(&items, "", SortKey::QuantityAsc));
        let mut desc = ids(&view(&items, "", SortKey::QuantityDesc));
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_by_creation() {
        let items = stock();
        let newest = view(&items, "", SortKey::CreatedDesc);
        assert_eq!(newest.first().map(|p| p.id.as_str()), Some("SKU-00789"));
        let oldest = view(&items, "", SortKey::CreatedAsc);
        assert_eq!(oldest.first().map(|p| p.id.as_str()), Some("SKU-00456"));
    }

    #[test]
    fn test_view_leaves_source_untouched() {
        let items = stock();
        let before = items.clone();
        let _ = view(&items, "sinus", SortKey::QuantityDesc);
        assert_eq!(items, before);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("created-desc".parse(), Ok(SortKey::CreatedDesc));
        assert!("newest".parse::<SortKey>().is_err());
    }
}
