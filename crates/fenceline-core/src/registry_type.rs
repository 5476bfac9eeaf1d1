//! Supported container registry types.
//!
//! The registry type tag decides two things: which field set the connector
//! form asks for, and which backend operation receives the submission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A container registry the console can connect to.
///
/// Serialized with the snake_case tags the backend API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryType {
    /// Docker Hub.
    DockerHub,
    /// Amazon Elastic Container Registry.
    Ecr,
    /// Azure Container Registry.
    AzureContainerRegistry,
    /// Google Container Registry, authenticated with a service account JSON key.
    GoogleContainerRegistry,
    /// Self-hosted Docker registry.
    DockerPrivateRegistry,
    /// Harbor.
    Harbor,
    /// GitLab container registry.
    Gitlab,
    /// JFrog Artifactory container registry.
    JfrogContainerRegistry,
    /// Quay.
    Quay,
}

impl RegistryType {
    /// Every supported registry type, in display order.
    pub const ALL: [Self; 9] = [
        Self::DockerHub,
        Self::Ecr,
        Self::AzureContainerRegistry,
        Self::GoogleContainerRegistry,
        Self::DockerPrivateRegistry,
        Self::Harbor,
        Self::Gitlab,
        Self::JfrogContainerRegistry,
        Self::Quay,
    ];

    /// Returns the wire tag for this registry type.
    ///
    /// # Examples
    ///
    /// ```
    /// use fenceline_core::RegistryType;
    ///
    /// assert_eq!(RegistryType::Ecr.as_str(), "ecr");
    /// assert_eq!(RegistryType::GoogleContainerRegistry.as_str(), "google_container_registry");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DockerHub => "docker_hub",
            Self::Ecr => "ecr",
            Self::AzureContainerRegistry => "azure_container_registry",
            Self::GoogleContainerRegistry => "google_container_registry",
            Self::DockerPrivateRegistry => "docker_private_registry",
            Self::Harbor => "harbor",
            Self::Gitlab => "gitlab",
            Self::JfrogContainerRegistry => "jfrog_container_registry",
            Self::Quay => "quay",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DockerHub => "Docker Hub",
            Self::Ecr => "Amazon ECR",
            Self::AzureContainerRegistry => "Azure Container Registry",
            Self::GoogleContainerRegistry => "Google Container Registry",
            Self::DockerPrivateRegistry => "Docker Private Registry",
            Self::Harbor => "Harbor",
            Self::Gitlab => "GitLab",
            Self::JfrogContainerRegistry => "JFrog Container Registry",
            Self::Quay => "Quay",
        }
    }

    /// Returns true if the registry authenticates with an uploaded credential
    /// file instead of plain form fields.
    ///
    /// Submissions for these registries go through the multipart endpoint.
    #[must_use]
    pub const fn uses_credential_blob(self) -> bool {
        match self {
            Self::GoogleContainerRegistry => true,
            Self::DockerHub
            | Self::Ecr
            | Self::AzureContainerRegistry
            | Self::DockerPrivateRegistry
            | Self::Harbor
            | Self::Gitlab
            | Self::JfrogContainerRegistry
            | Self::Quay => false,
        }
    }
}

impl fmt::Display for RegistryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidRegistryType { tag: s.to_string() })
    }
}
