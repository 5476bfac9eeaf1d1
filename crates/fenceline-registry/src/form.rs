//! Registry connector form.
//!
//! A form is bound to one registry type. It exposes the fixed field set for
//! that type, packages entered values into a [`FormSubmission`] with the
//! registry type as a hidden field, and tracks whether a submission is in
//! flight. The in-flight state is published on a watch channel so a button
//! renderer holding a [`FormStateHandle`] can follow it while `submit` runs.

use std::collections::BTreeMap;
use std::fmt;

use fenceline_core::{FieldKind, FieldSet, FlatFieldMap, RegistryType, SubmissionResult};
use tokio::sync::watch;

use crate::action::{registry_connector_action, REGISTRY_TYPE_FIELD};
use crate::api::RegistriesApi;
use crate::error::RegistryError;
use crate::notify::Notifier;

/// Route that handles connector form submissions.
pub const ADD_CONNECTOR_ACTION: &str = "/data-component/registries/add-connector";

/// Encoding used for connector submissions; GCR uploads a key file.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// In-flight state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// The request has been sent and no response has arrived.
    Submitting,
    /// A response arrived and is being applied.
    Loading,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::Loading => write!(f, "loading"),
        }
    }
}

/// A packaged form post.
#[derive(Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Route the form posts to.
    pub action: &'static str,
    /// HTTP method.
    pub method: &'static str,
    /// Body encoding.
    pub enc_type: &'static str,
    /// Text fields, including the hidden registry type.
    pub fields: FlatFieldMap,
    /// Uploaded files by field name.
    pub files: BTreeMap<String, Vec<u8>>,
}

impl Default for FormSubmission {
    fn default() -> Self {
        Self {
            action: ADD_CONNECTOR_ACTION,
            method: "POST",
            enc_type: MULTIPART_FORM_DATA,
            fields: FlatFieldMap::new(),
            files: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for FormSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files: BTreeMap<&str, usize> =
            self.files.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("FormSubmission")
            .field("action", &self.action)
            .field("method", &self.method)
            .field("enc_type", &self.enc_type)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("file_sizes", &files)
            .finish()
    }
}

/// Connector form for one registry type.
///
/// # Examples
///
/// ```
/// use fenceline_core::RegistryType;
/// use fenceline_registry::{FormState, RegistryConnectorForm};
///
/// let form = RegistryConnectorForm::new(RegistryType::Harbor, || {});
/// assert_eq!(form.state(), FormState::Idle);
/// assert!(form.field_set().field("non_secret.harbor_project_name").is_some());
/// let label = form.render_button(|state| format!("Save ({state})"));
/// assert_eq!(label, "Save (idle)");
/// ```
pub struct RegistryConnectorForm {
    field_set: FieldSet,
    state: watch::Sender<FormState>,
    last_result: Option<SubmissionResult>,
    on_success: Box<dyn FnMut() + Send>,
}

impl fmt::Debug for RegistryConnectorForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConnectorForm")
            .field("registry_type", &self.registry_type())
            .field("state", &self.state())
            .field("last_result", &self.last_result)
            .finish_non_exhaustive()
    }
}

impl RegistryConnectorForm {
    /// Creates a form; `on_success` runs once after each successful submission.
    pub fn new(registry_type: RegistryType, on_success: impl FnMut() + Send + 'static) -> Self {
        let (state, _) = watch::channel(FormState::Idle);
        Self {
            field_set: FieldSet::for_registry(registry_type),
            state,
            last_result: None,
            on_success: Box::new(on_success),
        }
    }

    /// Registry type the form is bound to.
    #[must_use]
    pub const fn registry_type(&self) -> RegistryType {
        self.field_set.registry_type()
    }

    /// Inputs shown by this form.
    #[must_use]
    pub const fn field_set(&self) -> &FieldSet {
        &self.field_set
    }

    /// Current in-flight state.
    #[must_use]
    pub fn state(&self) -> FormState {
        *self.state.borrow()
    }

    /// A handle that keeps observing the in-flight state, including while
    /// [`submit`](Self::submit) holds the form.
    #[must_use]
    pub fn state_handle(&self) -> FormStateHandle {
        FormStateHandle {
            rx: self.state.subscribe(),
        }
    }

    /// Outcome of the most recent completed submission.
    #[must_use]
    pub const fn last_result(&self) -> Option<&SubmissionResult> {
        self.last_result.as_ref()
    }

    /// Message of the last rejected submission, for inline display.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.last_result
            .as_ref()
            .filter(|r| !r.success)
            .and_then(|r| r.message.as_deref())
    }

    /// Hands the current state to a caller-supplied button renderer.
    pub fn render_button<R>(&self, render: impl FnOnce(FormState) -> R) -> R {
        render(self.state())
    }

    /// Checks entered values and packages them for posting.
    ///
    /// The registry type is always injected as the hidden `registryType`
    /// field, replacing any value of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if required inputs are missing.
    pub fn prepare(
        &self,
        mut fields: FlatFieldMap,
        files: BTreeMap<String, Vec<u8>>,
    ) -> Result<FormSubmission, RegistryError> {
        let file_keys = self
            .field_set
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::File && files.contains_key(f.key))
            .map(|f| f.key);
        self.field_set.validate(&fields, file_keys)?;

        fields.insert(
            REGISTRY_TYPE_FIELD.to_string(),
            self.registry_type().as_str().to_string(),
        );

        Ok(FormSubmission {
            fields,
            files,
            ..FormSubmission::default()
        })
    }

    /// Validates, posts and records one submission.
    ///
    /// # Errors
    ///
    /// Returns validation errors without sending anything, and otherwise
    /// whatever [`registry_connector_action`] returns.
    pub async fn submit(
        &mut self,
        api: &dyn RegistriesApi,
        notifier: &dyn Notifier,
        fields: FlatFieldMap,
        files: BTreeMap<String, Vec<u8>>,
    ) -> Result<SubmissionResult, RegistryError> {
        let submission = self.prepare(fields, files)?;
        tracing::debug!(?submission, "Posting connector form");

        self.state.send_replace(FormState::Submitting);
        let outcome = registry_connector_action(api, notifier, &submission).await;
        self.state.send_replace(FormState::Loading);

        match &outcome {
            Ok(result) => {
                self.last_result = Some(result.clone());
                if result.success {
                    (self.on_success)();
                }
            }
            Err(_) => self.last_result = None,
        }

        self.state.send_replace(FormState::Idle);
        outcome
    }
}

/// Read side of a form's in-flight state.
///
/// # Examples
///
/// ```
/// use fenceline_core::RegistryType;
/// use fenceline_registry::{FormState, RegistryConnectorForm};
///
/// let form = RegistryConnectorForm::new(RegistryType::Gitlab, || {});
/// let handle = form.state_handle();
/// assert!(handle.render_button(|state| state == FormState::Idle));
/// ```
#[derive(Debug, Clone)]
pub struct FormStateHandle {
    rx: watch::Receiver<FormState>,
}

impl FormStateHandle {
    /// The state right now.
    #[must_use]
    pub fn current(&self) -> FormState {
        *self.rx.borrow()
    }

    /// Hands the current state to a caller-supplied button renderer.
    pub fn render_button<R>(&self, render: impl FnOnce(FormState) -> R) -> R {
        render(self.current())
    }

    /// Waits until the form reaches `state`.
    ///
    /// Returns false if the form was dropped first.
    pub async fn wait_for(&mut self, state: FormState) -> bool {
        self.rx.wait_for(|s| *s == state).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::api::ApiFailure;
    use crate::testing::{GatedApi, RecordingApi, RecordingNotifier};

    fn values(pairs: &[(&str, &str)]) -> FlatFieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn quay_values() -> FlatFieldMap {
        values(&[
            ("name", "quay"),
            ("non_secret.quay_registry_url", "https://quay.io"),
            ("non_secret.quay_namespace", "acme"),
        ])
    }

    fn counting_form(registry_type: RegistryType) -> (RegistryConnectorForm, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let form = RegistryConnectorForm::new(registry_type, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (form, count)
    }

    #[test]
    fn test_form_picks_field_set_by_type() {
        for registry_type in RegistryType::ALL {
            let form = RegistryConnectorForm::new(registry_type, || {});
            assert_eq!(form.field_set(), &FieldSet::for_registry(registry_type));
        }
    }

    #[test]
    fn test_prepare_injects_hidden_type() {
        let form = RegistryConnectorForm::new(RegistryType::Quay, || {});
        let mut input = quay_values();
        input.insert(REGISTRY_TYPE_FIELD.to_string(), "docker_hub".to_string());

        let submission = form.prepare(input, BTreeMap::new()).unwrap();

        assert_eq!(submission.fields[REGISTRY_TYPE_FIELD], "quay");
        assert_eq!(submission.action, ADD_CONNECTOR_ACTION);
        assert_eq!(submission.method, "POST");
        assert_eq!(submission.enc_type, MULTIPART_FORM_DATA);
    }

    #[test]
    fn test_prepare_rejects_missing_required() {
        let form = RegistryConnectorForm::new(RegistryType::Quay, || {});
        let err = form.prepare(values(&[("name", "q")]), BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(errors) if errors.len() == 2));
    }

    #[test]
    fn test_prepare_gcr_counts_uploaded_file() {
        let form = RegistryConnectorForm::new(RegistryType::GoogleContainerRegistry, || {});
        let input = values(&[("name", "gcr"), ("registry_url", "https://gcr.io")]);

        assert!(form.prepare(input.clone(), BTreeMap::new()).is_err());

        let files = BTreeMap::from([("service_account_json".to_string(), b"{}".to_vec())]);
        let submission = form.prepare(input, files).unwrap();
        assert_eq!(submission.files["service_account_json"], b"{}");
    }

    #[tokio::test]
    async fn test_success_fires_callback_once() {
        let (mut form, count) = counting_form(RegistryType::Quay);
        let api = RecordingApi::ok();
        let notifier = RecordingNotifier::default();

        let result = form
            .submit(&api, &notifier, quay_values(), BTreeMap::new())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.error_message(), None);

        form.submit(&api, &notifier, quay_values(), BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(api.generic_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_rejection_sets_error_message() {
        let (mut form, count) = counting_form(RegistryType::DockerHub);
        let api = RecordingApi::failing(ApiFailure::Status {
            status: 400,
            body: Some(r#"{"message":"namespace not found"}"#.to_string()),
        });
        let notifier = RecordingNotifier::default();
        let input = values(&[
            ("name", "hub"),
            ("non_secret.docker_hub_namespace", "ghost"),
            ("non_secret.docker_hub_username", "bot"),
            ("secret.docker_hub_password", "pw"),
        ]);

        let result = form.submit(&api, &notifier, input, BTreeMap::new()).await.unwrap();

        assert!(!result.success);
        assert_eq!(form.error_message(), Some("namespace not found"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let (mut form, count) = counting_form(RegistryType::Harbor);
        let api = RecordingApi::ok();
        let notifier = RecordingNotifier::default();

        let err = form
            .submit(&api, &notifier, values(&[("name", "h")]), BTreeMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(api.total_calls(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn test_server_error_clears_result() {
        let (mut form, count) = counting_form(RegistryType::Quay);
        let notifier = RecordingNotifier::default();

        form.submit(&RecordingApi::ok(), &notifier, quay_values(), BTreeMap::new())
            .await
            .unwrap();
        assert!(form.last_result().is_some());

        let failing = RecordingApi::failing(ApiFailure::Status {
            status: 502,
            body: None,
        });
        assert!(form
            .submit(&failing, &notifier, quay_values(), BTreeMap::new())
            .await
            .is_err());
        assert!(form.last_result().is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_renderer_follows_submission_in_flight() {
        let (mut form, count) = counting_form(RegistryType::Quay);
        let api = GatedApi::default();
        let notifier = RecordingNotifier::default();
        let mut handle = form.state_handle();
        let before = handle.render_button(|state| state);

        let (result, during) = tokio::join!(
            form.submit(&api, &notifier, quay_values(), BTreeMap::new()),
            async {
                assert!(handle.wait_for(FormState::Submitting).await);
                let during = handle.render_button(|state| state);
                assert_eq!(count.load(Ordering::SeqCst), 0);
                api.release();
                assert!(handle.wait_for(FormState::Idle).await);
                during
            }
        );

        assert!(result.unwrap().success);
        assert_eq!(before, FormState::Idle);
        assert_eq!(during, FormState::Submitting);
        assert_eq!(handle.current(), FormState::Idle);
        assert_eq!(form.render_button(|state| state), FormState::Idle);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handle_reports_dropped_form() {
        let form = RegistryConnectorForm::new(RegistryType::Harbor, || {});
        let mut handle = form.state_handle();
        drop(form);
        assert!(!handle.wait_for(FormState::Submitting).await);
    }

    #[test]
    fn test_render_button_sees_state() {
        let form = RegistryConnectorForm::new(RegistryType::Ecr, || {});
        assert!(form.render_button(|s| s == FormState::Idle));
    }
}
