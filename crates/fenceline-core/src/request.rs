//! Request and response models for the registry connector endpoints.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::fields::{nest_fields, FlatFieldMap, NestedRequestBody, NestedValue};
use crate::registry_type::RegistryType;

/// Body of the generic "add registry" call.
///
/// Serializes to a single JSON object: `name`, `registry_type`, then every
/// nested group. A nested group with the same key as an earlier field
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAddRequest {
    /// Display name of the registry connection.
    pub name: Option<String>,
    /// Registry type tag.
    pub registry_type: RegistryType,
    /// Grouped credential and settings fields.
    pub nested: NestedRequestBody,
}

impl RegistryAddRequest {
    /// Builds a request from a flat form submission.
    ///
    /// `name` is read from the flat map; everything else comes from
    /// [`nest_fields`], so other undotted keys are not forwarded.
    #[must_use]
    pub fn from_fields(registry_type: RegistryType, fields: &FlatFieldMap) -> Self {
        Self {
            name: fields.get("name").cloned(),
            registry_type,
            nested: nest_fields(fields),
        }
    }

    /// Returns a nested group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.nested.get(name).and_then(NestedValue::as_group)
    }

    fn entries(&self) -> Vec<(&str, EntryValue<'_>)> {
        let mut entries: Vec<(&str, EntryValue<'_>)> = Vec::with_capacity(self.nested.len() + 2);
        if let Some(name) = &self.name {
            entries.push(("name", EntryValue::Str(name)));
        }
        entries.push(("registry_type", EntryValue::Str(self.registry_type.as_str())));

        for (key, value) in &self.nested {
            if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key.as_str()) {
                existing.1 = EntryValue::Nested(value);
            } else {
                entries.push((key.as_str(), EntryValue::Nested(value)));
            }
        }
        entries
    }
}

enum EntryValue<'a> {
    Str(&'a str),
    Nested(&'a NestedValue),
}

impl Serialize for EntryValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Nested(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for RegistryAddRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Body of the multipart "add Google Container Registry" call.
#[derive(Clone, PartialEq, Eq)]
pub struct GcrAddRequest {
    /// Display name of the registry connection.
    pub name: String,
    /// Registry URL, e.g. `https://us.gcr.io`.
    pub registry_url: String,
    /// Service account key file, forwarded byte for byte.
    pub service_account_json: Vec<u8>,
}

impl std::fmt::Debug for GcrAddRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcrAddRequest")
            .field("name", &self.name)
            .field("registry_url", &self.registry_url)
            .field(
                "service_account_json",
                &format_args!("<{} bytes>", self.service_account_json.len()),
            )
            .finish()
    }
}

/// Outcome of one connector submission, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Whether the registry was added.
    pub success: bool,
    /// Server-supplied reason for a rejected submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionResult {
    /// A successful submission.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A rejected submission with a message for the user.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Body returned by the backend with a `400 Bad Request`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadRequestResponse {
    /// Summary message.
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(default)]
    pub error_fields: BTreeMap<String, String>,
    /// Always false for error responses.
    #[serde(default)]
    pub success: Option<bool>,
}
