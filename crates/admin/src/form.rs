//! Create/edit modal state.
//!
//! [`FormState`] carries one modal through open, edit, validate, submit, and
//! close. Field errors block submission before anything reaches the network.
//! Operator feedback that a UI would show as a toast is left in a [`Notice`].

use homeoware_core::{FieldErrors, FormInput, RecordId, RecordKind};
use thiserror::Error;

use crate::api::ApiClient;
use crate::submit::{self, Confirm, DeleteOutcome, Lists, SubmitError, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Why a form action did not complete.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("the form is not open")]
    Closed,

    #[error("invalid fields: {0}")]
    Invalid(FieldErrors),

    #[error("only an existing record can be deleted")]
    NotEditing,

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// One modal's lifecycle.
#[derive(Debug, Clone)]
pub struct FormState {
    open: bool,
    editing: Option<RecordId>,
    input: FormInput,
    errors: FieldErrors,
    notice: Option<Notice>,
}

impl FormState {
    /// A closed form of the given kind.
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            open: false,
            editing: None,
            input: FormInput::empty(kind),
            errors: FieldErrors::new(),
            notice: None,
        }
    }

    /// Open an empty form.
    pub fn open_create(&mut self, kind: RecordKind) {
        self.open_with(None, FormInput::empty(kind));
    }

    /// Open a form prefilled from an existing record.
    pub fn open_edit(&mut self, id: RecordId, defaults: FormInput) {
        self.open_with(Some(id), defaults);
    }

    fn open_with(&mut self, editing: Option<RecordId>, input: FormInput) {
        self.open = true;
        self.editing = editing;
        self.input = input;
        self.errors = FieldErrors::new();
        self.notice = None;
    }

    /// Close and reset. The last notice survives.
    pub fn close(&mut self) {
        let kind = self.kind();
        self.open = false;
        self.editing = None;
        self.input = FormInput::empty(kind);
        self.errors = FieldErrors::new();
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.input.kind()
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    #[must_use]
    pub const fn input(&self) -> &FormInput {
        &self.input
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.kind().form_title(self.editing.is_some())
    }

    /// Set one field. Returns `false` for a path this form does not have.
    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> bool {
        self.input.set(path, value)
    }

    /// Re-run validation and keep the errors for display.
    pub fn blur(&mut self) -> &FieldErrors {
        self.errors = self.input.validate().err().unwrap_or_default();
        &self.errors
    }

    /// Validate, send, and on success close the form and call `on_success`.
    ///
    /// On failure the form stays open with its input intact.
    ///
    /// # Errors
    ///
    /// `FormError::Invalid` when validation fails (nothing is sent),
    /// `FormError::Submit` when the API call fails.
    pub async fn submit<F>(
        &mut self,
        api: &ApiClient,
        lists: &Lists,
        on_success: F,
    ) -> Result<SubmitOutcome<RecordId>, FormError>
    where
        F: FnOnce(),
    {
        if !self.open {
            return Err(FormError::Closed);
        }
        let payload = match self.input.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(FormError::Invalid(errors));
            }
        };
        self.errors = FieldErrors::new();

        match submit::submit_form(api, lists, &payload, self.editing.as_ref()).await {
            Ok(outcome) => {
                let noun = capitalize(self.kind().noun());
                self.notice = Some(Notice::success(match outcome {
                    SubmitOutcome::Created(_) | SubmitOutcome::Accepted => {
                        format!("{noun} created.")
                    }
                    SubmitOutcome::Updated(_) => format!("{noun} updated."),
                }));
                self.close();
                on_success();
                Ok(outcome)
            }
            Err(err) => {
                self.notice = Some(Notice::error(err.user_message()));
                Err(err.into())
            }
        }
    }

    /// Delete the record being edited.
    ///
    /// Declining the confirmation leaves the form as it was. A record that no
    /// longer exists closes the form with an informational notice.
    ///
    /// # Errors
    ///
    /// `FormError::NotEditing` for a create form, `FormError::Submit` when
    /// the kind cannot be deleted or a call fails.
    pub async fn delete(
        &mut self,
        api: &ApiClient,
        lists: &Lists,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        let id = self.editing.clone().ok_or(FormError::NotEditing)?;
        let noun = self.kind().noun();

        match submit::delete_kind(api, lists, self.kind(), &id, confirm).await {
            Ok(DeleteOutcome::Cancelled) => Ok(DeleteOutcome::Cancelled),
            Ok(outcome) => {
                self.notice = Some(if outcome == DeleteOutcome::Deleted {
                    Notice::success(format!("{} deleted.", capitalize(noun)))
                } else {
                    Notice::info(format!("This {noun} no longer exists."))
                });
                self.close();
                Ok(outcome)
            }
            Err(err) => {
                self.notice = Some(Notice::error(err.user_message()));
                Err(err.into())
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homeoware_core::ProductRecord;
    use serde_json::json;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AdminConfig;
    use crate::list_state::ListState;
    use crate::session::Session;
    use crate::submit::AssumeYes;

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(&AdminConfig::new(&server.uri()).unwrap(), Session::new())
    }

    fn fill_product(form: &mut FormState, stock: &str, threshold: &str) {
        form.set_field("identifier", "PROD-001");
        form.set_field("name", "Arnica 30CH");
        form.set_field("category", "homeopathy");
        form.set_field("initialStock", stock);
        form.set_field("alertThreshold", threshold);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut form = FormState::new(RecordKind::Product);
        form.open_create(RecordKind::Product);
        fill_product(&mut form, "3", "4");

        let mut called = false;
        let err = form
            .submit(&api(&server), &Lists::default(), || called = true)
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert!(form.errors().contains("alertThreshold"));
        assert!(form.is_open());
        assert!(!called);
    }

    #[tokio::test]
    async fn test_success_closes_and_notifies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products/create"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"quantity": 10})))
            .expect(1)
            .mount(&server)
            .await;

        let lists = Lists::default();
        let mut form = FormState::new(RecordKind::Product);
        form.open_create(RecordKind::Product);
        fill_product(&mut form, "10", "2");

        let mut refreshed = 0;
        form.submit(&api(&server), &lists, || refreshed += 1)
            .await
            .unwrap();
        assert_eq!(refreshed, 1);
        assert!(!form.is_open());
        assert_eq!(form.notice(), Some(&Notice::success("Product created.")));
        assert_eq!(lists.products.len().await, 1);
    }

    #[tokio::test]
    async fn test_server_failure_keeps_input() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = FormState::new(RecordKind::Product);
        let record = ProductRecord {
            id: RecordId::new("PROD-001"),
            name: "Arnica 30CH".to_string(),
            category: Some("homeopathy".to_string()),
            quantity: 10,
            initial_stock: Some(10),
            alert_threshold: Some(2),
            created_at: chrono::Utc::now(),
        };
        let lists = Lists {
            products: ListState::from_records(vec![record.clone()]),
            ..Lists::default()
        };
        form.open_edit(record.id.clone(), FormInput::from(&record));
        assert_eq!(form.title(), "Edit product");

        let before = form.input().clone();
        assert!(form.submit(&api(&server), &lists, || {}).await.is_err());
        assert!(form.is_open());
        assert_eq!(form.input(), &before);
        assert_eq!(form.notice().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_delete_requires_editing() {
        let server = MockServer::start().await;
        let mut form = FormState::new(RecordKind::User);
        form.open_create(RecordKind::User);
        let err = form
            .delete(&api(&server), &Lists::default(), &AssumeYes)
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::NotEditing));
    }

    #[test]
    fn test_blur_clears_fixed_errors() {
        let mut form = FormState::new(RecordKind::Client);
        form.open_create(RecordKind::Client);
        assert!(form.blur().contains("name"));
        form.set_field("name", "Agropecuária Sul");
        form.set_field("document", "123.456.789-00");
        assert!(form.blur().is_empty());
    }
}
