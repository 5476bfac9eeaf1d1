//! # Fenceline Core
//!
//! Core types for connecting cloud accounts and container registries to the
//! posture console.
//!
//! This crate provides the data structures shared by the registry client and
//! the command line:
//!
//! - [`RegistryType`] - closed set of supported container registries
//! - [`fields`] - flat form submissions and the dotted-name nesting transform
//! - [`RegistryAddRequest`] / [`GcrAddRequest`] - bodies for the two backend calls
//! - [`FieldSet`] - the fixed inputs asked for per registry type
//! - [`cloudformation`] - the AWS CloudFormation deployment guide
//!
//! ## Example
//!
//! ```rust
//! use fenceline_core::{fields::FlatFieldMap, RegistryAddRequest, RegistryType};
//!
//! let mut fields = FlatFieldMap::new();
//! fields.insert("name".into(), "team-quay".into());
//! fields.insert("non_secret.quay_namespace".into(), "acme".into());
//!
//! let request = RegistryAddRequest::from_fields(RegistryType::Quay, &fields);
//! let body = serde_json::to_value(&request).unwrap();
//! assert_eq!(body["registry_type"], "quay");
//! assert_eq!(body["non_secret"]["quay_namespace"], "acme");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cloudformation;
pub mod error;
pub mod field_set;
pub mod fields;
pub mod registry_type;
pub mod request;
pub mod validation;

#[cfg(test)]
mod proptest_tests;

// Re-export main types at crate root
pub use cloudformation::{AwsRegion, CloudFormationWizard, DeployLinks, TemplateSource};
pub use error::{Error, Result};
pub use field_set::{FieldKind, FieldSet, FieldSpec};
pub use fields::{nest_fields, FlatFieldMap, NestedRequestBody, NestedValue};
pub use registry_type::RegistryType;
pub use request::{BadRequestResponse, GcrAddRequest, RegistryAddRequest, SubmissionResult};
pub use validation::{Validate, ValidationError, ValidationErrors};
