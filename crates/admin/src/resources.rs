//! Per-kind endpoint paths and wire mapping.
//!
//! Wire field names are camelCase. The API is loose about envelopes: a
//! collection may come bare or wrapped, a single record may come wrapped
//! under `data`. Decoding accepts all of those.

use chrono::{DateTime, Utc};
use homeoware_core::validation::{ClientDraft, CompanyDraft, ProductDraft, UserDraft};
use homeoware_core::{
    ClientRecord, CompanyRecord, ProductRecord, RecordId, RecordKind, UserRecord, UserRole,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;

/// A record kind the admin client can list, create, read, and update.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Validated form value this kind is created and updated from.
    type Draft: Send + Sync + 'static;

    const KIND: RecordKind;

    /// `GET` path of the whole collection.
    fn collection_path() -> &'static str;

    /// `POST` path for a new record.
    fn create_path() -> &'static str {
        Self::collection_path()
    }

    /// `GET` path of one record.
    fn item_path(id: &RecordId) -> String {
        format!("{}/{}", Self::collection_path(), encode_segment(id))
    }

    /// `PUT` path of one record.
    fn update_path(id: &RecordId) -> String {
        Self::item_path(id)
    }

    fn id(&self) -> &RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Request body for create and update.
    fn to_wire(draft: &Self::Draft) -> Value;

    /// Decode one record from an (already unwrapped) JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` when required fields are missing.
    fn from_wire(value: &Value) -> Result<Self, ApiError>;
}

/// Kinds that can be deleted from the admin panel.
pub trait Deletable: Resource {
    /// `DELETE` path of one record.
    fn delete_path(id: &RecordId) -> String {
        Self::item_path(id)
    }
}

/// Percent-encode one path segment.
fn encode_segment(id: &RecordId) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}

// =============================================================================
// Envelopes
// =============================================================================

/// The record inside a single-record response.
#[must_use]
pub fn unwrap_record(data: &Value) -> &Value {
    match data.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => data,
    }
}

/// The items of a collection response.
///
/// # Errors
///
/// Returns `ApiError::Decode` when no array is found.
pub fn unwrap_collection(data: &Value) -> Result<&[Value], ApiError> {
    if let Value::Array(items) = data {
        return Ok(items);
    }
    ["data", "users", "items"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::Decode("expected a list of records".to_string()))
}

/// Overlay the server's fields onto the body that was sent.
///
/// The server wins on every key it returns; keys it omits keep the submitted
/// value.
#[must_use]
pub fn merge(sent: Value, returned: &Value) -> Value {
    let mut merged = match sent {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(fields) = returned {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

fn decode<T: DeserializeOwned>(kind: RecordKind, value: &Value) -> Result<T, ApiError> {
    T::deserialize(value).map_err(|e| ApiError::Decode(format!("invalid {kind} record: {e}")))
}

// =============================================================================
// Fetching
// =============================================================================

/// Fetch the whole collection of a kind.
///
/// # Errors
///
/// Propagates the API failure, or `ApiError::Decode` for an unreadable body.
#[instrument(skip(api), fields(kind = %R::KIND))]
pub async fn fetch_all<R: Resource>(api: &ApiClient) -> Result<Vec<R>, ApiError> {
    let response = api.get(R::collection_path()).await?;
    unwrap_collection(&response.data)?
        .iter()
        .map(R::from_wire)
        .collect()
}

/// Fetch one record by id.
///
/// # Errors
///
/// Propagates the API failure, `ApiError::NotFound` included.
#[instrument(skip(api), fields(kind = %R::KIND, id = %id))]
pub async fn fetch_one<R: Resource>(api: &ApiClient, id: &RecordId) -> Result<R, ApiError> {
    let response = api.get(&R::item_path(id)).await?;
    R::from_wire(unwrap_record(&response.data))
}

// =============================================================================
// Users
// =============================================================================

#[derive(Deserialize)]
struct UserWire {
    id: RecordId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    role: Option<String>,
    notes: Option<String>,
}

impl Resource for UserRecord {
    type Draft = UserDraft;

    const KIND: RecordKind = RecordKind::User;

    fn collection_path() -> &'static str {
        "/v1/users"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn to_wire(draft: &UserDraft) -> Value {
        let mut body = json!({
            "name": draft.name,
            "email": draft.email.as_str(),
            "role": draft.role.wire_name(),
            "password": draft.password,
        });
        if let (Some(notes), Value::Object(map)) = (&draft.notes, &mut body) {
            map.insert("notes".to_string(), Value::String(notes.clone()));
        }
        body
    }

    fn from_wire(value: &Value) -> Result<Self, ApiError> {
        let wire: UserWire = decode(Self::KIND, value)?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            role: UserRole::from_wire(wire.role.as_deref()),
            notes: wire.notes.filter(|n| !n.is_empty()),
        })
    }
}

impl Deletable for UserRecord {}

// =============================================================================
// Clients and companies
// =============================================================================

#[derive(Deserialize)]
struct ClientWire {
    id: RecordId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    document: String,
}

impl Resource for ClientRecord {
    type Draft = ClientDraft;

    const KIND: RecordKind = RecordKind::Client;

    fn collection_path() -> &'static str {
        "/v1/clients"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn to_wire(draft: &ClientDraft) -> Value {
        json!({ "name": draft.name, "document": draft.document })
    }

    fn from_wire(value: &Value) -> Result<Self, ApiError> {
        let wire: ClientWire = decode(Self::KIND, value)?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            document: wire.document,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyWire {
    id: RecordId,
    #[serde(default)]
    legal_name: String,
    #[serde(default)]
    tax_id: String,
}

impl Resource for CompanyRecord {
    type Draft = CompanyDraft;

    const KIND: RecordKind = RecordKind::Company;

    fn collection_path() -> &'static str {
        "/v1/companies"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn to_wire(draft: &CompanyDraft) -> Value {
        json!({ "legalName": draft.legal_name, "taxId": draft.tax_id })
    }

    fn from_wire(value: &Value) -> Result<Self, ApiError> {
        let wire: CompanyWire = decode(Self::KIND, value)?;
        Ok(Self {
            id: wire.id,
            legal_name: wire.legal_name,
            tax_id: wire.tax_id,
        })
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    identifier: Option<RecordId>,
    id: Option<RecordId>,
    #[serde(default)]
    name: String,
    category: Option<String>,
    quantity: Option<i64>,
    initial_stock: Option<u32>,
    alert_threshold: Option<u32>,
    /// Epoch milliseconds.
    created_at: Option<i64>,
}

impl Resource for ProductRecord {
    type Draft = ProductDraft;

    const KIND: RecordKind = RecordKind::Product;

    fn collection_path() -> &'static str {
        "/products"
    }

    fn create_path() -> &'static str {
        "/products/create"
    }

    fn update_path(id: &RecordId) -> String {
        format!("/products/edit/{}", encode_segment(id))
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn to_wire(draft: &ProductDraft) -> Value {
        json!({
            "identifier": draft.identifier,
            "name": draft.name,
            "category": draft.category,
            "initialStock": draft.initial_stock,
            "alertThreshold": draft.alert_threshold,
        })
    }

    fn from_wire(value: &Value) -> Result<Self, ApiError> {
        let wire: ProductWire = decode(Self::KIND, value)?;
        let id = wire
            .identifier
            .filter(|id| !id.is_empty())
            .or(wire.id)
            .ok_or_else(|| ApiError::Decode("product without identifier".to_string()))?;
        let quantity = wire
            .quantity
            .or_else(|| wire.initial_stock.map(i64::from))
            .unwrap_or(0);
        let created_at = wire
            .created_at
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);

        Ok(Self {
            id,
            name: wire.name,
            category: wire.category.filter(|c| !c.is_empty()),
            quantity,
            initial_stock: wire.initial_stock,
            alert_threshold: wire.alert_threshold,
            created_at,
        })
    }
}

impl Deletable for ProductRecord {}
