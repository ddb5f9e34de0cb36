//! Submit orchestrator: one validated form value, one network call, one list
//! mutation.
//!
//! - create: `POST`, the merged record is prepended
//! - update: `PUT` under the editing id, the entry is replaced under that same
//!   id whatever the server echoes
//! - delete: confirmation, then an existence check, then `DELETE`
//!
//! Failures leave the list untouched and carry one operator-facing message.

use homeoware_core::{
    ClientRecord, CompanyRecord, FormPayload, ProductRecord, RecordId, RecordKind, UserRecord,
};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::list_state::ListState;
use crate::resources::{self, Deletable, Resource};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<R> {
    Created(R),
    /// The create succeeded but the response did not describe the record.
    /// The list was reloaded instead of prepended to.
    Accepted,
    Updated(R),
}

impl<R> SubmitOutcome<R> {
    #[must_use]
    pub const fn record(&self) -> Option<&R> {
        match self {
            Self::Created(r) | Self::Updated(r) => Some(r),
            Self::Accepted => None,
        }
    }

    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Created(_) | Self::Accepted)
    }

    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> SubmitOutcome<T> {
        match self {
            Self::Created(r) => SubmitOutcome::Created(f(r)),
            Self::Accepted => SubmitOutcome::Accepted,
            Self::Updated(r) => SubmitOutcome::Updated(f(r)),
        }
    }
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The existence check answered 404; nothing was sent.
    AlreadyGone,
    /// The operator declined the confirmation.
    Cancelled,
}

/// A failed submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("{0} records cannot be deleted")]
    NotDeletable(RecordKind),

    #[error("submission was cancelled")]
    Aborted,
}

impl SubmitError {
    /// The single message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Asks the operator to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

// =============================================================================
// Typed orchestration
// =============================================================================

/// Create (`editing` is `None`) or update one record.
///
/// A create the server accepted is never reported as a failure: when its
/// response cannot be read as a record, the list is reloaded and the outcome
/// is [`SubmitOutcome::Accepted`].
///
/// # Errors
///
/// Returns `SubmitError::Api` when the call fails, or when an update response
/// cannot be read. The list is not touched in that case.
#[instrument(skip(api, list, draft), fields(kind = %R::KIND, editing = ?editing.map(RecordId::as_str)))]
pub async fn submit<R: Resource>(
    api: &ApiClient,
    list: &ListState<R>,
    draft: &R::Draft,
    editing: Option<&RecordId>,
) -> Result<SubmitOutcome<R>, SubmitError> {
    let body = R::to_wire(draft);

    let Some(id) = editing else {
        let response = api
            .post(R::create_path(), &body)
            .await
            .inspect_err(|e| warn!(error = %e, "Create failed"))?;
        let merged = resources::merge(body, resources::unwrap_record(&response.data));
        return match R::from_wire(&merged) {
            Ok(record) => {
                list.prepend(record.clone()).await;
                info!(id = %record.id(), "Record created");
                Ok(SubmitOutcome::Created(record))
            }
            Err(e) => {
                info!(reason = %e, "Record created without a readable response, reloading");
                if let Err(e) = list.load(api).await {
                    warn!(error = %e, "Reload after create failed");
                }
                Ok(SubmitOutcome::Accepted)
            }
        };
    };

    let response = api
        .put(&R::update_path(id), &body)
        .await
        .inspect_err(|e| warn!(error = %e, "Update failed"))?;
    let mut merged = resources::merge(body, resources::unwrap_record(&response.data));
    if let Value::Object(fields) = &mut merged {
        fields
            .entry("id")
            .or_insert_with(|| Value::String(id.to_string()));
    }
    let mut record = R::from_wire(&merged)?;
    record.set_id(id.clone());
    list.replace(id, record.clone()).await;
    info!(id = %id, "Record updated");
    Ok(SubmitOutcome::Updated(record))
}

/// Delete one record after confirmation and an existence check.
///
/// A 404 from the existence check counts as done: no delete call is made and
/// any stale list entry is dropped.
///
/// # Errors
///
/// Returns `SubmitError::Api` when the check (other than 404) or the delete
/// fails. The list is not touched in that case.
#[instrument(skip(api, list, confirm), fields(kind = %R::KIND, id = %id))]
pub async fn delete<R: Deletable>(
    api: &ApiClient,
    list: &ListState<R>,
    id: &RecordId,
    confirm: &dyn Confirm,
) -> Result<DeleteOutcome, SubmitError> {
    if !confirm.confirm(&format!("Delete {} {id}?", R::KIND)) {
        return Ok(DeleteOutcome::Cancelled);
    }

    match api.get(&R::item_path(id)).await {
        Ok(_) => {}
        Err(ApiError::NotFound { .. }) => {
            list.remove(id).await;
            info!("Record already gone");
            return Ok(DeleteOutcome::AlreadyGone);
        }
        Err(e) => {
            warn!(error = %e, "Existence check failed");
            return Err(e.into());
        }
    }

    api.delete(&R::delete_path(id))
        .await
        .inspect_err(|e| warn!(error = %e, "Delete failed"))?;
    list.remove(id).await;
    info!("Record deleted");
    Ok(DeleteOutcome::Deleted)
}

// =============================================================================
// Background tasks
// =============================================================================

/// A submission running on the runtime.
///
/// Dropping the task detaches it; the call still completes and its list
/// mutation still applies unless the list was detached.
pub struct SubmitTask<T> {
    handle: JoinHandle<Result<T, SubmitError>>,
}

impl<T> SubmitTask<T> {
    /// Stop waiting for the result. A request already on the wire is not
    /// recalled.
    pub fn abort(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    ///
    /// # Errors
    ///
    /// The submission's own error, or `SubmitError::Aborted` when the task
    /// was aborted or panicked.
    pub async fn join(self) -> Result<T, SubmitError> {
        self.handle.await.unwrap_or(Err(SubmitError::Aborted))
    }
}

/// [`submit`] on a background task.
#[must_use]
pub fn spawn_submit<R: Resource>(
    api: ApiClient,
    list: ListState<R>,
    draft: R::Draft,
    editing: Option<RecordId>,
) -> SubmitTask<SubmitOutcome<R>> {
    SubmitTask {
        handle: tokio::spawn(async move { submit(&api, &list, &draft, editing.as_ref()).await }),
    }
}

/// [`delete`] on a background task.
#[must_use]
pub fn spawn_delete<R, C>(
    api: ApiClient,
    list: ListState<R>,
    id: RecordId,
    confirm: C,
) -> SubmitTask<DeleteOutcome>
where
    R: Deletable,
    C: Confirm + 'static,
{
    SubmitTask {
        handle: tokio::spawn(async move { delete(&api, &list, &id, &confirm).await }),
    }
}

// =============================================================================
// Kind dispatch
// =============================================================================

/// One list per record kind.
#[derive(Clone, Default)]
pub struct Lists {
    pub users: ListState<UserRecord>,
    pub clients: ListState<ClientRecord>,
    pub companies: ListState<CompanyRecord>,
    pub products: ListState<ProductRecord>,
}

impl Lists {
    /// Detach every list.
    pub fn detach(&self) {
        self.users.detach();
        self.clients.detach();
        self.companies.detach();
        self.products.detach();
    }
}

/// Submit whichever form payload was validated, returning the record id.
///
/// # Errors
///
/// See [`submit`].
pub async fn submit_form(
    api: &ApiClient,
    lists: &Lists,
    payload: &FormPayload,
    editing: Option<&RecordId>,
) -> Result<SubmitOutcome<RecordId>, SubmitError> {
    let outcome = match payload {
        FormPayload::User(draft) => submit(api, &lists.users, draft, editing)
            .await?
            .map(|r| r.id),
        FormPayload::Client(draft) => submit(api, &lists.clients, draft, editing)
            .await?
            .map(|r| r.id),
        FormPayload::Company(draft) => submit(api, &lists.companies, draft, editing)
            .await?
            .map(|r| r.id),
        FormPayload::Product(draft) => submit(api, &lists.products, draft, editing)
            .await?
            .map(|r| r.id),
    };
    Ok(outcome)
}

/// Delete a record of any deletable kind.
///
/// # Errors
///
/// `SubmitError::NotDeletable` for clients and companies, else see [`delete`].
pub async fn delete_kind(
    api: &ApiClient,
    lists: &Lists,
    kind: RecordKind,
    id: &RecordId,
    confirm: &dyn Confirm,
) -> Result<DeleteOutcome, SubmitError> {
    match kind {
        RecordKind::User => delete(api, &lists.users, id, confirm).await,
        RecordKind::Product => delete(api, &lists.products, id, confirm).await,
        RecordKind::Client | RecordKind::Company => Err(SubmitError::NotDeletable(kind)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homeoware_core::validation::ClientDraft;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AdminConfig;
    use crate::session::Session;

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(&AdminConfig::new(&server.uri()).unwrap(), Session::new())
    }

    fn farm() -> ClientDraft {
        ClientDraft {
            name: "Fazenda Boa Vista".to_string(),
            document: "12.345.678/0001-90".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_prepends_server_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/clients"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"data": {"id": 12}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let list = ListState::new();
        let outcome = submit::<ClientRecord>(&api(&server), &list, &farm(), None)
            .await
            .unwrap();
        let SubmitOutcome::Created(record) = outcome else {
            panic!("expected create");
        };
        assert_eq!(record.id.as_str(), "12");
        assert_eq!(record.name, "Fazenda Boa Vista");
        assert_eq!(list.snapshot().await, vec![record]);
    }

    #[tokio::test]
    async fn test_create_without_record_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/clients"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/clients"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let list = ListState::new();
        let outcome = submit::<ClientRecord>(&api(&server), &list, &farm(), None)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Accepted);
        assert!(outcome.is_create());
        assert!(list.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_list() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/clients/4"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"message": "Not allowed"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let existing = ClientRecord {
            id: RecordId::new("4"),
            name: "Old".to_string(),
            document: "00000".to_string(),
        };
        let list = ListState::from_records(vec![existing.clone()]);
        let err = submit::<ClientRecord>(&api(&server), &list, &farm(), Some(&RecordId::new("4")))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Not allowed");
        assert_eq!(list.snapshot().await, vec![existing]);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let list: ListState<UserRecord> = ListState::new();
        let outcome = delete(&api(&server), &list, &RecordId::new("1"), &|_: &str| false)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_delete_checks_then_deletes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/PROD-001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"identifier": "PROD-001"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/products/PROD-001"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let list: ListState<ProductRecord> = ListState::new();
        let outcome = delete(&api(&server), &list, &RecordId::new("PROD-001"), &AssumeYes)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    #[tokio::test]
    async fn test_clients_not_deletable() {
        let server = MockServer::start().await;
        let err = delete_kind(
            &api(&server),
            &Lists::default(),
            RecordKind::Client,
            &RecordId::new("1"),
            &AssumeYes,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SubmitError::NotDeletable(RecordKind::Client)));
    }

    #[tokio::test]
    async fn test_aborted_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_delay(std::time::Duration::from_secs(5)))
            .mount(&server)
            .await;

        let task = spawn_submit::<ClientRecord>(api(&server), ListState::new(), farm(), None);
        task.abort();
        assert!(matches!(task.join().await, Err(SubmitError::Aborted)));
    }
}
