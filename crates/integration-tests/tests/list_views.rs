//! Loading lists from the API and deriving filtered, sorted views.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use homeoware_admin::ApiError;
use homeoware_core::SortKey;
use homeoware_core::listing::{filter, view};
use homeoware_integration_tests::TestContext;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn stock(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"identifier": "VERM-01", "name": "Vermífugo Natural", "category": "homeopathy",
             "quantity": 4, "alertThreshold": 5, "createdAt": 1_700_000_300_000_i64},
            {"identifier": "MAST-01", "name": "Mastite Control", "category": "phytotherapy",
             "quantity": 10, "createdAt": 1_700_000_100_000_i64},
            {"identifier": "CARR-01", "name": "Carrapaticida", "category": "homeopathy",
             "quantity": 4, "createdAt": 1_700_000_200_000_i64},
            {"identifier": "DERM-01", "name": "Pomada Cicatrizante", "category": "dermocosmetic",
             "initialStock": 7, "createdAt": 1_700_000_000_000_i64}
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;
}

fn ids<'a>(records: &[&'a homeoware_core::ProductRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_load_and_filter() {
    let ctx = TestContext::signed_in().await;
    stock(&ctx).await;

    assert_eq!(ctx.lists.products.load(&ctx.api).await.unwrap(), 4);
    let products = ctx.lists.products.snapshot().await;

    // Empty query is the identity, in source order
    let all = filter(&products, "   ");
    assert_eq!(ids(&all), ["VERM-01", "MAST-01", "CARR-01", "DERM-01"]);

    assert_eq!(ids(&filter(&products, "HOMEOPATHY")), ["VERM-01", "CARR-01"]);
    assert_eq!(ids(&filter(&products, "mast")), ["MAST-01"]);
    assert!(filter(&products, "ração").is_empty());

    // Quantity falls back to the initial stock
    assert_eq!(products[3].quantity, 7);
    assert!(products[0].is_low_stock());
}

#[tokio::test]
async fn test_sort_is_stable_both_ways() {
    let ctx = TestContext::signed_in().await;
    stock(&ctx).await;
    ctx.lists.products.load(&ctx.api).await.unwrap();
    let products = ctx.lists.products.snapshot().await;

    let asc = view(&products, "", SortKey::QuantityAsc);
    assert_eq!(ids(&asc), ["VERM-01", "CARR-01", "DERM-01", "MAST-01"]);

    let desc = view(&products, "", SortKey::QuantityDesc);
    assert_eq!(ids(&desc), ["MAST-01", "DERM-01", "VERM-01", "CARR-01"]);

    let newest = view(&products, "homeopathy", SortKey::CreatedDesc);
    assert_eq!(ids(&newest), ["VERM-01", "CARR-01"]);

    let oldest = view(&products, "", SortKey::CreatedAsc);
    assert_eq!(ids(&oldest), ["DERM-01", "MAST-01", "CARR-01", "VERM-01"]);

    // The source list is never reordered
    let again = ctx.lists.products.snapshot().await;
    assert_eq!(again, products);
}

#[tokio::test]
async fn test_wrapped_collections_and_bad_bodies() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 1, "name": "Ana", "email": "ana@x.com", "role": "admin"}]
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .mount(&ctx.server)
        .await;

    assert_eq!(ctx.lists.users.load(&ctx.api).await.unwrap(), 1);

    let err = ctx.lists.companies.load(&ctx.api).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(ctx.lists.companies.is_empty().await);
}
