//! The backend operations a connector submission can call.

use async_trait::async_trait;
use fenceline_core::{BadRequestResponse, GcrAddRequest, RegistryAddRequest};

use crate::error::RegistryError;

/// Registry account operations of the console API.
///
/// [`ConsoleClient`](crate::ConsoleClient) implements this over HTTP; tests
/// substitute an in-memory implementation.
#[async_trait]
pub trait RegistriesApi: Send + Sync {
    /// Adds a Google Container Registry using an uploaded service account key.
    async fn add_registry_gcr(&self, request: &GcrAddRequest) -> Result<(), ApiFailure>;

    /// Adds any other registry from a JSON body.
    async fn add_registry(&self, request: &RegistryAddRequest) -> Result<(), ApiFailure>;
}

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The console answered with a non-success status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, if one could be read.
        body: Option<String>,
    },
    /// No response arrived.
    Transport(String),
}

impl ApiFailure {
    /// Status code of the response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Returns true for `400 Bad Request`.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Status { status: 400, .. })
    }

    /// Extracts the user-facing message from a `400` body.
    ///
    /// Returns `None` for any other failure. A 400 without a readable
    /// `message` yields an empty string.
    #[must_use]
    pub fn bad_request_message(&self) -> Option<String> {
        let Self::Status { status: 400, body } = self else {
            return None;
        };

        let message = body
            .as_deref()
            .and_then(|b| serde_json::from_str::<BadRequestResponse>(b).ok())
            .and_then(|r| r.message)
            .unwrap_or_default();
        Some(message)
    }
}

impl From<ApiFailure> for RegistryError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Status { status, body } => Self::Api {
                status,
                message: body.unwrap_or_default(),
            },
            ApiFailure::Transport(message) => Self::Transport { message },
        }
    }
}
