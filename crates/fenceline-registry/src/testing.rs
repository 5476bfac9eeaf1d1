//! In-memory test doubles for the console API.

use async_trait::async_trait;
use fenceline_core::{GcrAddRequest, RegistryAddRequest};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::api::{ApiFailure, RegistriesApi};
use crate::notify::Notifier;

/// Records every call and answers with a fixed outcome.
#[derive(Debug)]
pub struct RecordingApi {
    outcome: Result<(), ApiFailure>,
    gcr_calls: Mutex<Vec<GcrAddRequest>>,
    generic_calls: Mutex<Vec<RegistryAddRequest>>,
}

impl RecordingApi {
    pub fn ok() -> Self {
        Self::with_outcome(Ok(()))
    }

    pub fn failing(failure: ApiFailure) -> Self {
        Self::with_outcome(Err(failure))
    }

    fn with_outcome(outcome: Result<(), ApiFailure>) -> Self {
        Self {
            outcome,
            gcr_calls: Mutex::new(Vec::new()),
            generic_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn gcr_calls(&self) -> Vec<GcrAddRequest> {
        self.gcr_calls.lock().clone()
    }

    pub fn generic_calls(&self) -> Vec<RegistryAddRequest> {
        self.generic_calls.lock().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.gcr_calls.lock().len() + self.generic_calls.lock().len()
    }
}

#[async_trait]
impl RegistriesApi for RecordingApi {
    async fn add_registry_gcr(&self, request: &GcrAddRequest) -> Result<(), ApiFailure> {
        self.gcr_calls.lock().push(request.clone());
        self.outcome.clone()
    }

    async fn add_registry(&self, request: &RegistryAddRequest) -> Result<(), ApiFailure> {
        self.generic_calls.lock().push(request.clone());
        self.outcome.clone()
    }
}

/// Holds every call open until [`GatedApi::release`] is called.
#[derive(Debug, Default)]
pub struct GatedApi {
    gate: Notify,
}

impl GatedApi {
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl RegistriesApi for GatedApi {
    async fn add_registry_gcr(&self, _request: &GcrAddRequest) -> Result<(), ApiFailure> {
        self.gate.notified().await;
        Ok(())
    }

    async fn add_registry(&self, _request: &RegistryAddRequest) -> Result<(), ApiFailure> {
        self.gate.notified().await;
        Ok(())
    }
}

/// Collects notifications.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
