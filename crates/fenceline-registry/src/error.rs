//! Error types for connector submissions.

use std::path::PathBuf;

use fenceline_core::ValidationErrors;
use thiserror::Error;

/// Errors that can occur while submitting a registry connector.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The submission did not say which registry it is for.
    #[error("Registry Type is required")]
    MissingRegistryType,

    /// A field the backend call needs was not submitted.
    #[error("Missing field: {field}")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// Required form inputs are missing or blank, or console settings are malformed.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Core type error, such as an unknown registry type tag.
    #[error(transparent)]
    Core(#[from] fenceline_core::Error),

    /// The console answered with a status the submission flow does not handle.
    #[error("HTTP error from console: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Failed to connect to the console.
    #[error("Failed to connect to console at {url}: {source}")]
    ConnectionFailed {
        /// Console URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The request failed before a response arrived.
    #[error("Request to console failed: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Console URL could not be parsed.
    #[error("Invalid console URL {url}: {source}")]
    InvalidUrl {
        /// URL string.
        url: String,
        /// Underlying error.
        #[source]
        source: url::ParseError,
    },

    /// File I/O error.
    #[error("File I/O error at {path}: {source}")]
    IoError {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Console settings cannot be turned into a working client.
    #[error("Invalid console configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },
}
