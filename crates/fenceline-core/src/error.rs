//! Error types for Fenceline core operations.
//!
//! This module defines the error types used throughout the `fenceline-core` crate.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Fenceline core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Registry type tag is not one of the supported registries.
    #[error("Invalid registry type: {tag}")]
    InvalidRegistryType {
        /// The tag that failed to parse.
        tag: String,
    },

    /// AWS region is not one of the regions offered by the deployment guide.
    #[error("Invalid AWS region: {region}")]
    InvalidRegion {
        /// The region name that failed to parse.
        region: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_registry_type() {
        let err = Error::InvalidRegistryType {
            tag: "dockerhub".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid registry type: dockerhub");
    }

    #[test]
    fn test_error_display_invalid_region() {
        let err = Error::InvalidRegion {
            region: "mars-north-1".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid AWS region: mars-north-1");
    }
}
