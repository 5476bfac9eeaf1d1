//! Per-registry connector field sets.
//!
//! Each [`RegistryType`] has exactly one fixed set of inputs. The connector
//! form renders the set for the selected type, and the same set drives the
//! required-field check that runs before a submission is sent.

use std::fmt;

use crate::fields::FlatFieldMap;
use crate::registry_type::RegistryType;
use crate::validation::{ValidationError, ValidationErrors};

/// How a field is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Secret text, never echoed.
    Password,
    /// A URL.
    Url,
    /// Boolean switch submitted as `"true"` or `"false"`.
    Toggle,
    /// File upload, submitted as raw bytes.
    File,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Url => "url",
            Self::Toggle => "toggle",
            Self::File => "file",
        };
        f.write_str(kind)
    }
}

/// A single input in a connector form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Submitted field name; dotted names are nested into groups.
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether the form refuses to submit without a value.
    pub required: bool,
    /// Example value shown in an empty input.
    pub placeholder: Option<&'static str>,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            placeholder: None,
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

const NAME: FieldSpec = FieldSpec::new("name", "Registry Name", FieldKind::Text);

/// The fixed set of inputs for one registry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    registry_type: RegistryType,
    fields: Vec<FieldSpec>,
}

impl FieldSet {
    /// Returns the field set for a registry type.
    ///
    /// # Examples
    ///
    /// ```
    /// use fenceline_core::{FieldSet, RegistryType};
    ///
    /// let set = FieldSet::for_registry(RegistryType::Quay);
    /// assert_eq!(set.fields()[0].key, "name");
    /// assert!(set.field("secret.quay_access_token").is_some());
    /// ```
    #[must_use]
    pub fn for_registry(registry_type: RegistryType) -> Self {
        use FieldKind::{File, Password, Text, Toggle, Url};

        let specific = match registry_type {
            RegistryType::DockerHub => vec![
                FieldSpec::new("non_secret.docker_hub_namespace", "Namespace", Text),
                FieldSpec::new("non_secret.docker_hub_username", "Username", Text),
                FieldSpec::new("secret.docker_hub_password", "Password", Password),
            ],
            RegistryType::Ecr => vec![
                FieldSpec::new("non_secret.is_public", "Public Registry", Toggle).optional(),
                FieldSpec::new("non_secret.use_iam_role", "Use AWS IAM Role", Toggle).optional(),
                FieldSpec::new("non_secret.aws_account_id", "AWS Account ID", Text).optional(),
                FieldSpec::new(
                    "non_secret.target_account_role_arn",
                    "Target Account Role ARN",
                    Text,
                )
                .optional(),
                FieldSpec::new("non_secret.aws_access_key_id", "AWS Access Key", Text),
                FieldSpec::new("secret.aws_secret_access_key", "AWS Secret Key", Password),
                FieldSpec::new("non_secret.aws_region_name", "AWS Region", Text)
                    .placeholder("us-east-1"),
            ],
            RegistryType::AzureContainerRegistry => vec![
                FieldSpec::new("non_secret.azure_registry_url", "Registry URL", Url)
                    .placeholder("https://myregistry.azurecr.io"),
                FieldSpec::new("non_secret.azure_registry_username", "Username", Text),
                FieldSpec::new("secret.azure_registry_password", "Password", Password),
            ],
            RegistryType::GoogleContainerRegistry => vec![
                FieldSpec::new("registry_url", "Registry URL", Url)
                    .placeholder("https://us-docker.pkg.dev"),
                FieldSpec::new("service_account_json", "Service Account JSON", File),
            ],
            RegistryType::DockerPrivateRegistry => vec![
                FieldSpec::new("non_secret.docker_registry_url", "Registry URL", Url)
                    .placeholder("https://registry.example.com"),
                FieldSpec::new("non_secret.docker_username", "Username", Text),
                FieldSpec::new("secret.docker_password", "Password", Password),
            ],
            RegistryType::Harbor => vec![
                FieldSpec::new("non_secret.harbor_registry_url", "Registry URL", Url),
                FieldSpec::new("non_secret.harbor_project_name", "Project Name", Text),
                FieldSpec::new("non_secret.harbor_username", "Username", Text),
                FieldSpec::new("secret.harbor_password", "Password", Password),
            ],
            RegistryType::Gitlab => vec![
                FieldSpec::new("non_secret.gitlab_server_url", "Server URL", Url)
                    .placeholder("https://gitlab.com"),
                FieldSpec::new("non_secret.gitlab_registry_url", "Registry URL", Url)
                    .placeholder("https://registry.gitlab.com"),
                FieldSpec::new("secret.gitlab_access_token", "Access Token", Password),
            ],
            RegistryType::JfrogContainerRegistry => vec![
                FieldSpec::new("non_secret.jfrog_registry_url", "Registry URL", Url),
                FieldSpec::new("non_secret.jfrog_repository", "Repository", Text),
                FieldSpec::new("non_secret.jfrog_username", "Username", Text),
                FieldSpec::new("secret.jfrog_password", "Password", Password),
            ],
            RegistryType::Quay => vec![
                FieldSpec::new("non_secret.quay_registry_url", "Registry URL", Url)
                    .placeholder("https://quay.io"),
                FieldSpec::new("non_secret.quay_namespace", "Namespace", Text),
                FieldSpec::new("secret.quay_access_token", "Access Token", Password).optional(),
            ],
        };

        let mut fields = Vec::with_capacity(specific.len() + 1);
        fields.push(NAME);
        fields.extend(specific);

        Self {
            registry_type,
            fields,
        }
    }

    /// Registry type this set belongs to.
    #[must_use]
    pub const fn registry_type(&self) -> RegistryType {
        self.registry_type
    }

    /// Inputs in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up an input by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Checks that every required input has a value.
    ///
    /// Text inputs are looked up in `values`; file inputs are present when
    /// their key is in `file_keys`. ECR access keys are only required when
    /// the IAM role switch is off.
    ///
    /// # Errors
    ///
    /// Returns every missing or empty required field.
    pub fn validate<'a>(
        &self,
        values: &FlatFieldMap,
        file_keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ValidationErrors> {
        let files: Vec<&str> = file_keys.into_iter().collect();
        let uses_iam_role = values
            .get("non_secret.use_iam_role")
            .is_some_and(|v| v == "true");

        let mut errors = ValidationErrors::new();
        for spec in self.fields.iter().filter(|f| f.required) {
            if uses_iam_role && is_ecr_access_key(spec.key) {
                continue;
            }

            match spec.kind {
                FieldKind::File => {
                    if !files.contains(&spec.key) {
                        errors.add(ValidationError::required(spec.key));
                    }
                }
                _ => match values.get(spec.key) {
                    None => errors.add(ValidationError::required(spec.key)),
                    Some(value) if value.trim().is_empty() => {
                        errors.add(ValidationError::empty(spec.key));
                    }
                    Some(_) => {}
                },
            }
        }

        errors.into_result()
    }
}

fn is_ecr_access_key(key: &str) -> bool {
    matches!(
        key,
        "non_secret.aws_access_key_id" | "secret.aws_secret_access_key"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn values(pairs: &[(&str, &str)]) -> FlatFieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_every_type_starts_with_name() {
        for registry_type in RegistryType::ALL {
            let set = FieldSet::for_registry(registry_type);
            assert_eq!(set.registry_type(), registry_type);
            assert_eq!(set.fields()[0].key, "name");
            assert!(set.fields()[0].required);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        for registry_type in RegistryType::ALL {
            let set = FieldSet::for_registry(registry_type);
            let mut keys: Vec<_> = set.fields().iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), set.fields().len(), "{registry_type}");
        }
    }

    #[test]
    fn test_only_gcr_has_file_input() {
        for registry_type in RegistryType::ALL {
            let has_file = FieldSet::for_registry(registry_type)
                .fields()
                .iter()
                .any(|f| f.kind == FieldKind::File);
            assert_eq!(has_file, registry_type.uses_credential_blob());
        }
    }

    #[test]
    fn test_gcr_fields_are_flat() {
        let set = FieldSet::for_registry(RegistryType::GoogleContainerRegistry);
        assert!(set.fields().iter().all(|f| !f.key.contains('.')));
    }

    #[test]
    fn test_validate_docker_hub_complete() {
        let set = FieldSet::for_registry(RegistryType::DockerHub);
        let input = values(&[
            ("name", "hub"),
            ("non_secret.docker_hub_namespace", "acme"),
            ("non_secret.docker_hub_username", "bot"),
            ("secret.docker_hub_password", "pw"),
        ]);
        assert!(set.validate(&input, []).is_ok());
    }

    #[test]
    fn test_validate_reports_missing_and_empty() {
        let set = FieldSet::for_registry(RegistryType::DockerHub);
        let input = values(&[("name", "  "), ("non_secret.docker_hub_namespace", "acme")]);

        let errors = set.validate(&input, []).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("name", ValidationErrorKind::Empty),
                ("non_secret.docker_hub_username", ValidationErrorKind::Required),
                ("secret.docker_hub_password", ValidationErrorKind::Required),
            ]
        );
    }

    #[test]
    fn test_validate_gcr_requires_file() {
        let set = FieldSet::for_registry(RegistryType::GoogleContainerRegistry);
        let input = values(&[("name", "gcr"), ("registry_url", "https://gcr.io")]);

        let errors = set.validate(&input, []).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(set.validate(&input, ["service_account_json"]).is_ok());
    }

    #[test]
    fn test_validate_ecr_iam_role_skips_keys() {
        let set = FieldSet::for_registry(RegistryType::Ecr);
        let with_role = values(&[
            ("name", "ecr"),
            ("non_secret.use_iam_role", "true"),
            ("non_secret.aws_region_name", "us-east-1"),
        ]);
        assert!(set.validate(&with_role, []).is_ok());

        let without_role = values(&[("name", "ecr"), ("non_secret.aws_region_name", "us-east-1")]);
        assert_eq!(set.validate(&without_role, []).unwrap_err().len(), 2);
    }
}
