//! # Fenceline Registry
//!
//! Registry connector submission for the Fenceline console.
//!
//! This crate turns a submitted connector form into a call on the console's
//! registry account API and reports the outcome back to the form.
//!
//! ## Features
//!
//! - **Connector Form**: Per-type field sets, hidden type injection and
//!   in-flight state tracking
//! - **Dispatch**: Google Container Registry goes to the multipart endpoint,
//!   every other type to the generic JSON endpoint
//! - **Console Client**: Bearer token auth, custom CA and timeouts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//!
//! use fenceline_core::RegistryType;
//! use fenceline_registry::{
//!     ConsoleClient, ConsoleConfig, RegistryConnectorForm, TracingNotifier,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConsoleConfig::new("https://console.example.com").with_token("api-token");
//!     let client = ConsoleClient::new(config)?;
//!
//!     let mut form = RegistryConnectorForm::new(RegistryType::Quay, || {});
//!     let fields = BTreeMap::from([
//!         ("name".to_string(), "quay".to_string()),
//!         ("non_secret.quay_registry_url".to_string(), "https://quay.io".to_string()),
//!         ("non_secret.quay_namespace".to_string(), "acme".to_string()),
//!     ]);
//!
//!     let result = form
//!         .submit(&client, &TracingNotifier, fields, BTreeMap::new())
//!         .await?;
//!     println!("success: {}", result.success);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  RegistryConnectorForm   │  validate, inject registryType
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │ registry_connector_action│  pick operation, map outcome
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │  RegistriesApi           │  ConsoleClient (HTTP)
//! └──────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod action;
mod api;
mod client;
mod config;
mod error;
mod form;
mod notify;

#[cfg(test)]
mod testing;

pub use action::{registry_connector_action, REGISTRY_TYPE_FIELD, SUCCESS_MESSAGE};
pub use api::{ApiFailure, RegistriesApi};
pub use client::{ConsoleClient, ADD_REGISTRY_GCR_PATH, ADD_REGISTRY_PATH};
pub use config::{ConsoleConfig, TlsConfig};
pub use error::RegistryError;
pub use form::{
    FormState, FormStateHandle, FormSubmission, RegistryConnectorForm, ADD_CONNECTOR_ACTION,
    MULTIPART_FORM_DATA,
};
pub use notify::{Notifier, TracingNotifier};
