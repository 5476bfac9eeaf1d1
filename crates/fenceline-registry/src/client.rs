//! HTTP client for the console's registry account API.

use async_trait::async_trait;
use fenceline_core::{GcrAddRequest, RegistryAddRequest, Validate};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use url::Url;

use crate::api::{ApiFailure, RegistriesApi};
use crate::config::ConsoleConfig;
use crate::error::RegistryError;

/// Path of the generic add-registry operation.
pub const ADD_REGISTRY_PATH: &str = "/deepfence/registryaccount";

/// Path of the multipart add-GCR operation.
pub const ADD_REGISTRY_GCR_PATH: &str = "/deepfence/registryaccount/gcr";

const PEM_CERT_MARKER: &[u8] = b"-----BEGIN CERTIFICATE-----";

/// Client for the console's registry account endpoints.
#[derive(Debug)]
pub struct ConsoleClient {
    config: ConsoleConfig,
    http: reqwest::Client,
    add_registry_url: Url,
    add_registry_gcr_url: Url,
}

impl ConsoleClient {
    /// Creates a new console client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fenceline_registry::{ConsoleClient, ConsoleConfig};
    ///
    /// let config = ConsoleConfig::new("https://console.example.com").with_token("api-token");
    /// let client = ConsoleClient::new(config)?;
    /// # Ok::<(), fenceline_registry::RegistryError>(())
    /// ```
    pub fn new(config: ConsoleConfig) -> Result<Self, RegistryError> {
        config.validate()?;

        let resolve = |path: &str| {
            config
                .endpoint(path)
                .map_err(|source| RegistryError::InvalidUrl {
                    url: config.url.clone(),
                    source,
                })
        };
        let add_registry_url = resolve(ADD_REGISTRY_PATH)?;
        let add_registry_gcr_url = resolve(ADD_REGISTRY_GCR_PATH)?;

        let http = Self::build_http_client(&config)?;

        Ok(Self {
            config,
            http,
            add_registry_url,
            add_registry_gcr_url,
        })
    }

    /// Returns the console configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Builds the HTTP client with proper configuration.
    fn build_http_client(config: &ConsoleConfig) -> Result<reqwest::Client, RegistryError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(Self::auth_headers(config)?);

        if let Some(ref tls) = config.tls {
            if tls.insecure_skip_verify {
                builder = builder.danger_accept_invalid_certs(true);
            }

            if let Some(ref ca_cert) = tls.ca_cert {
                let cert_pem = std::fs::read(ca_cert).map_err(|e| RegistryError::IoError {
                    path: ca_cert.clone(),
                    source: e,
                })?;
                if !cert_pem
                    .windows(PEM_CERT_MARKER.len())
                    .any(|w| w == PEM_CERT_MARKER)
                {
                    return Err(RegistryError::InvalidConfig {
                        message: format!(
                            "CA certificate {} contains no PEM certificate",
                            ca_cert.display()
                        ),
                    });
                }
                let cert = reqwest::Certificate::from_pem(&cert_pem).map_err(|e| {
                    RegistryError::InvalidConfig {
                        message: format!(
                            "CA certificate {} is not valid PEM: {e}",
                            ca_cert.display()
                        ),
                    }
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        builder.build().map_err(|e| RegistryError::ConnectionFailed {
            url: config.url.clone(),
            source: e,
        })
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(config: &ConsoleConfig) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                RegistryError::InvalidConfig {
                    message: "API token is not a valid header value".to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send(request: RequestBuilder) -> Result<(), ApiFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<(), ApiFailure> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.ok().filter(|b| !b.is_empty());
        tracing::debug!(status = status.as_u16(), "Console rejected request");
        Err(ApiFailure::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RegistriesApi for ConsoleClient {
    async fn add_registry_gcr(&self, request: &GcrAddRequest) -> Result<(), ApiFailure> {
        let key = Part::bytes(request.service_account_json.clone())
            .file_name("service_account.json")
            .mime_str("application/json")
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;

        let form = Form::new()
            .text("name", request.name.clone())
            .text("registry_url", request.registry_url.clone())
            .part("service_account_json", key);

        tracing::debug!(url = %self.add_registry_gcr_url, name = %request.name, "Adding GCR registry");
        Self::send(self.http.post(self.add_registry_gcr_url.clone()).multipart(form)).await
    }

    async fn add_registry(&self, request: &RegistryAddRequest) -> Result<(), ApiFailure> {
        tracing::debug!(
            url = %self.add_registry_url,
            registry_type = %request.registry_type,
            "Adding registry"
        );
        Self::send(self.http.post(self.add_registry_url.clone()).json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::TlsConfig;

    #[test]
    fn test_client_creation() {
        let config = ConsoleConfig::new("https://console.example.com");
        let client = ConsoleClient::new(config).unwrap();
        assert_eq!(
            client.add_registry_url.as_str(),
            "https://console.example.com/deepfence/registryaccount"
        );
        assert_eq!(
            client.add_registry_gcr_url.as_str(),
            "https://console.example.com/deepfence/registryaccount/gcr"
        );
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let err = ConsoleClient::new(ConsoleConfig::new("console.example.com")).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
    }

    #[test]
    fn test_auth_headers_none() {
        let config = ConsoleConfig::new("https://example.com");
        let headers = ConsoleClient::auth_headers(&config).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_auth_headers_bearer() {
        let config = ConsoleConfig::new("https://example.com").with_token("my-token");
        let headers = ConsoleClient::auth_headers(&config).unwrap();

        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer my-token");
    }

    #[test]
    fn test_auth_headers_invalid_token() {
        let config = ConsoleConfig::new("https://example.com").with_token("bad\ntoken");
        assert!(matches!(
            ConsoleClient::auth_headers(&config),
            Err(RegistryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_client_rejects_malformed_ca_cert() {
        let mut pem = tempfile::NamedTempFile::new().unwrap();
        pem.write_all(b"not a certificate").unwrap();

        let config = ConsoleConfig::new("https://console.example.com")
            .with_tls(TlsConfig::new().with_ca_cert(pem.path()));
        let err = ConsoleClient::new(config).unwrap_err();

        assert!(matches!(err, RegistryError::InvalidConfig { .. }), "{err}");
    }

    #[test]
    fn test_client_reports_missing_ca_cert() {
        let config = ConsoleConfig::new("https://console.example.com")
            .with_tls(TlsConfig::new().with_ca_cert("/nonexistent/fenceline-ca.pem"));
        assert!(matches!(
            ConsoleClient::new(config),
            Err(RegistryError::IoError { .. })
        ));
    }
}
