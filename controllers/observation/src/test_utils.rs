//! Test utilities for unit testing the reconciler
//!
//! Provides an in-memory `ClusterStore` with per-operation failure
//! injection plus helpers for creating test objects.

use crate::error::StoreError;
use crate::store::{ClusterStore, OWNER_LABEL};
use async_trait::async_trait;
use crds::{Observation, ObservationSpec, ObservationStatus};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory cluster store for testing.
///
/// Stores objects in memory and can be configured to fail individual
/// operations with a given error message.
#[derive(Default)]
pub struct MockClusterStore {
    observations: Mutex<HashMap<(String, String), Observation>>,
    deployments: Mutex<Vec<Deployment>>,
    services: Mutex<Vec<Service>>,
    deployment_list_error: Mutex<Option<String>>,
    service_list_error: Mutex<Option<String>>,
    status_update_error: Mutex<Option<String>>,
    status_updates: Mutex<u32>,
}

impl MockClusterStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an Observation to the mock store (for test setup).
    pub fn add_observation(&self, observation: Observation) {
        let namespace = observation
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let name = observation.metadata.name.clone().unwrap_or_default();
        self.observations
            .lock()
            .unwrap()
            .insert((namespace, name), observation);
    }

    /// Add a Deployment to the mock store (for test setup).
    pub fn add_deployment(&self, deployment: Deployment) {
        self.deployments.lock().unwrap().push(deployment);
    }

    /// Fetch a stored Observation back out (for assertions).
    pub fn observation(&self, namespace: &str, name: &str) -> Option<Observation> {
        self.observations
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Make Deployment list calls fail with the given message.
    pub fn fail_deployment_lists(&self, message: &str) {
        *self.deployment_list_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make Service list calls fail with the given message.
    pub fn fail_service_lists(&self, message: &str) {
        *self.service_list_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make status updates fail with the given message.
    pub fn fail_status_updates(&self, message: &str) {
        *self.status_update_error.lock().unwrap() = Some(message.to_string());
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        *self.deployment_list_error.lock().unwrap() = None;
        *self.service_list_error.lock().unwrap() = None;
        *self.status_update_error.lock().unwrap() = None;
    }

    /// Number of status writes performed so far.
    pub fn status_update_count(&self) -> u32 {
        *self.status_updates.lock().unwrap()
    }
}

fn owned_by(metadata: &ObjectMeta, namespace: &str, owner: &str) -> bool {
    metadata.namespace.as_deref() == Some(namespace)
        && metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(OWNER_LABEL))
            .map(String::as_str)
            == Some(owner)
}

#[async_trait]
impl ClusterStore for MockClusterStore {
    async fn get_observation(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Observation, StoreError> {
        self.observations
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Observation {}/{}", namespace, name)))
    }

    async fn update_observation_status(
        &self,
        namespace: &str,
        name: &str,
        status: &ObservationStatus,
    ) -> Result<(), StoreError> {
        if let Some(message) = self.status_update_error.lock().unwrap().clone() {
            return Err(StoreError::Transient(message));
        }
        let mut observations = self.observations.lock().unwrap();
        let observation = observations
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| StoreError::NotFound(format!("Observation {}/{}", namespace, name)))?;
        observation.status = Some(status.clone());
        *self.status_updates.lock().unwrap() += 1;
        Ok(())
    }

    async fn list_owned_deployments(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Deployment>, StoreError> {
        if let Some(message) = self.deployment_list_error.lock().unwrap().clone() {
            return Err(StoreError::Transient(message));
        }
        Ok(self
            .deployments
            .lock()
            .unwrap()
            .iter()
            .filter(|d| owned_by(&d.metadata, namespace, owner))
            .cloned()
            .collect())
    }

    async fn list_owned_services(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Service>, StoreError> {
        if let Some(message) = self.service_list_error.lock().unwrap().clone() {
            return Err(StoreError::Transient(message));
        }
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| owned_by(&s.metadata, namespace, owner))
            .cloned()
            .collect())
    }
}

/// Helper to create a test Observation with empty status.
pub fn create_test_observation(name: &str, namespace: &str) -> Observation {
    Observation {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: ObservationSpec::default(),
        status: None,
    }
}

/// Helper to create a Deployment labelled as owned by an Observation.
pub fn create_owned_deployment(name: &str, namespace: &str, owner: &str) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                OWNER_LABEL.to_string(),
                owner.to_string(),
            )])),
            ..Default::default()
        },
        ..Default::default()
    }
}
