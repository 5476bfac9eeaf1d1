//! Submitted form fields and the nesting transform.
//!
//! Connector forms name their inputs with a single dot separating a group
//! from a field (`non_secret.docker_hub_username`). The backend expects those
//! grouped into objects, so a flat submission is reshaped before it is sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat mapping of submitted field names to values.
pub type FlatFieldMap = BTreeMap<String, String>;

/// A value in a [`NestedRequestBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestedValue {
    /// A plain string value.
    Text(String),
    /// A group of string values keyed by field name.
    Group(BTreeMap<String, String>),
}

impl NestedValue {
    /// Returns the group map if this value is a group.
    #[must_use]
    pub const fn as_group(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Text(_) => None,
        }
    }
}

/// Request body fragment produced by [`nest_fields`].
pub type NestedRequestBody = BTreeMap<String, NestedValue>;

/// Reshapes dotted field names into nested groups.
///
/// `group.leaf = value` becomes `{group: {leaf: value}}`. Keys without a dot
/// are not part of the output; callers that need them (such as `name`) read
/// them from the flat map directly. For keys with more than one dot only the
/// first two segments are used.
///
/// # Examples
///
/// ```
/// use fenceline_core::fields::{nest_fields, FlatFieldMap};
///
/// let mut flat = FlatFieldMap::new();
/// flat.insert("name".into(), "hub".into());
/// flat.insert("secret.password".into(), "hunter2".into());
///
/// let nested = nest_fields(&flat);
/// assert!(!nested.contains_key("name"));
/// assert_eq!(nested["secret"].as_group().unwrap()["password"], "hunter2");
/// ```
#[must_use]
pub fn nest_fields(flat: &FlatFieldMap) -> NestedRequestBody {
    let mut result = NestedRequestBody::new();

    for (key, value) in flat {
        let Some((group, rest)) = key.split_once('.') else {
            continue;
        };
        let leaf = rest.split('.').next().unwrap_or(rest);

        let entry = result
            .entry(group.to_string())
            .or_insert_with(|| NestedValue::Group(BTreeMap::new()));
        if let NestedValue::Group(fields) = entry {
            fields.insert(leaf.to_string(), value.clone());
        }
    }

    result
}
