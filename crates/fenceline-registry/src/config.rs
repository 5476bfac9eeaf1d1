//! Configuration types for the console client.

use std::path::PathBuf;
use std::time::Duration;

use fenceline_core::validation::check_http_url;
use fenceline_core::{Validate, ValidationErrors};
use url::Url;

/// Configuration for the console API client.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Console URL (e.g., "<https://console.example.com>").
    pub url: String,

    /// API access token sent as a bearer token.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// TLS configuration for self-signed consoles.
    pub tls: Option<TlsConfig>,

    /// User agent string.
    pub user_agent: String,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ConsoleConfig {
    /// Creates a new console configuration with the given URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use fenceline_registry::ConsoleConfig;
    ///
    /// let config = ConsoleConfig::new("https://console.example.com");
    /// assert_eq!(config.url, "https://console.example.com");
    /// assert!(config.token.is_none());
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: Duration::from_secs(30),
            tls: None,
            user_agent: format!("fenceline-registry/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Resolves an API path against the console URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use fenceline_registry::ConsoleConfig;
    ///
    /// let config = ConsoleConfig::new("https://console.example.com/");
    /// assert_eq!(
    ///     config.endpoint("/deepfence/registryaccount").unwrap().as_str(),
    ///     "https://console.example.com/deepfence/registryaccount"
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the console URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = format!("{}/", self.url.trim_end_matches('/'));
        Url::parse(&base)?.join(path.trim_start_matches('/'))
    }
}

impl Validate for ConsoleConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_http_url(&mut errors, "url", &self.url);

        errors.into_result()
    }
}

/// TLS configuration for console connections.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Path to a CA certificate that signs the console certificate.
    pub ca_cert: Option<PathBuf>,

    /// Whether to skip certificate verification (NOT recommended for production).
    pub insecure_skip_verify: bool,
}

impl TlsConfig {
    /// Creates a new TLS configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ca_cert: None,
            insecure_skip_verify: false,
        }
    }

    /// Sets the CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Enables insecure mode (skips certificate verification).
    ///
    /// # Warning
    ///
    /// This should only be used for testing. Never use in production.
    #[must_use]
    pub const fn insecure(mut self) -> Self {
        self.insecure_skip_verify = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = ConsoleConfig::new("https://example.com");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("fenceline-registry/"));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ConsoleConfig::new("https://example.com/");
        let url = config.endpoint("/deepfence/registryaccount/gcr").unwrap();
        assert_eq!(url.as_str(), "https://example.com/deepfence/registryaccount/gcr");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let config = ConsoleConfig::new("https://example.com/console");
        let url = config.endpoint("deepfence/registryaccount").unwrap();
        assert_eq!(url.as_str(), "https://example.com/console/deepfence/registryaccount");
    }

    #[test]
    fn test_validate_rejects_non_http() {
        assert!(ConsoleConfig::new("https://example.com").is_valid());
        assert!(!ConsoleConfig::new("example.com").is_valid());
        assert!(!ConsoleConfig::new("").is_valid());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ConsoleConfig::new("https://example.com").with_token("s3cr3t");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_tls_config() {
        let tls = TlsConfig::new().with_ca_cert("/path/to/ca.crt");
        assert_eq!(tls.ca_cert, Some(PathBuf::from("/path/to/ca.crt")));
        assert!(!tls.insecure_skip_verify);
        assert!(TlsConfig::new().insecure().insecure_skip_verify);
    }
}
