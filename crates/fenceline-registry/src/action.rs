//! Connector submission handler.
//!
//! Reads the registry type from a submitted form, shapes the request for the
//! matching backend operation and turns the outcome into a
//! [`SubmissionResult`].

use fenceline_core::{GcrAddRequest, RegistryAddRequest, RegistryType, SubmissionResult};

use crate::api::{ApiFailure, RegistriesApi};
use crate::error::RegistryError;
use crate::form::FormSubmission;
use crate::notify::Notifier;

/// Hidden form field carrying the registry type tag.
pub const REGISTRY_TYPE_FIELD: &str = "registryType";

/// Confirmation shown after a registry is added.
pub const SUCCESS_MESSAGE: &str = "Registry added successfully";

/// Submits a registry connector form to the console.
///
/// Google Container Registry goes to the multipart operation with the
/// service account key forwarded untouched; every other type goes to the
/// generic operation with its dotted fields nested.
///
/// A `400` response is reported as an unsuccessful [`SubmissionResult`]
/// carrying the server's message. On success the notifier receives a
/// confirmation.
///
/// # Errors
///
/// - [`RegistryError::MissingRegistryType`] or [`RegistryError::Core`] if the
///   registry type is absent or unknown. No request is sent in that case.
/// - [`RegistryError::MissingField`] if a GCR submission lacks `name`,
///   `registry_url` or the key file.
/// - [`RegistryError::Api`] or [`RegistryError::Transport`] for any failure
///   other than `400`.
pub async fn registry_connector_action(
    api: &dyn RegistriesApi,
    notifier: &dyn Notifier,
    submission: &FormSubmission,
) -> Result<SubmissionResult, RegistryError> {
    let tag = submission
        .fields
        .get(REGISTRY_TYPE_FIELD)
        .filter(|t| !t.is_empty())
        .ok_or(RegistryError::MissingRegistryType)?;
    let registry_type: RegistryType = tag.parse()?;

    tracing::info!(%registry_type, "Submitting registry connector");

    let outcome = if registry_type.uses_credential_blob() {
        let request = gcr_request(submission)?;
        api.add_registry_gcr(&request).await
    } else {
        let request = RegistryAddRequest::from_fields(registry_type, &submission.fields);
        api.add_registry(&request).await
    };

    match outcome {
        Ok(()) => {
            tracing::info!(%registry_type, "Registry added");
            notifier.notify(SUCCESS_MESSAGE);
            Ok(SubmissionResult::ok())
        }
        Err(failure) => rejected(registry_type, failure),
    }
}

fn rejected(
    registry_type: RegistryType,
    failure: ApiFailure,
) -> Result<SubmissionResult, RegistryError> {
    if let Some(message) = failure.bad_request_message() {
        tracing::warn!(%registry_type, %message, "Console rejected registry connector");
        return Ok(SubmissionResult::failed(message));
    }

    tracing::warn!(%registry_type, status = ?failure.status(), "Registry connector request failed");
    Err(failure.into())
}

fn gcr_request(submission: &FormSubmission) -> Result<GcrAddRequest, RegistryError> {
    let field = |key: &str| {
        submission
            .fields
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::MissingField {
                field: key.to_string(),
            })
    };

    let service_account_json = submission
        .files
        .get("service_account_json")
        .cloned()
        .ok_or_else(|| RegistryError::MissingField {
            field: "service_account_json".to_string(),
        })?;

    Ok(GcrAddRequest {
        name: field("name")?,
        registry_url: field("registry_url")?,
        service_account_json,
    })
}
