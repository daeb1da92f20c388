//! Cluster state store access.
//!
//! Wraps the typed Kubernetes API calls the reconciler needs behind a
//! trait so the reconciliation logic can be unit tested against an
//! in-memory store.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;

use crate::error::StoreError;
use crds::{Observation, ObservationStatus};

/// Label naming the Observation a dependent object belongs to.
///
/// Dependents are looked up by this label; it plays the role of an
/// owner-reference index key.
pub const OWNER_LABEL: &str = "monitoring.bi-ws2025.de/owner";

/// Typed access to the cluster state store.
///
/// All async methods must be `Send` to work with Tokio's work-stealing
/// runtime. The trait deliberately exposes no write operations on
/// dependents; the controller is a pure observer of them.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Get an Observation by namespaced name.
    async fn get_observation(&self, namespace: &str, name: &str)
        -> Result<Observation, StoreError>;

    /// Replace the status subresource of an Observation. Never touches
    /// spec.
    async fn update_observation_status(
        &self,
        namespace: &str,
        name: &str,
        status: &ObservationStatus,
    ) -> Result<(), StoreError>;

    /// List Deployments in `namespace` owned by the named Observation.
    async fn list_owned_deployments(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Deployment>, StoreError>;

    /// List Services in `namespace` owned by the named Observation.
    async fn list_owned_services(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Service>, StoreError>;
}

/// Store implementation backed by the Kubernetes API server.
///
/// Holds the client and builds typed API handles per call, so one store
/// serves every namespace the watcher delivers objects from.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Creates a store bound to a Kubernetes client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn owner_selector(owner: &str) -> String {
        format!("{}={}", OWNER_LABEL, owner)
    }
}

/// Maps a Kubernetes API error onto the store error taxonomy.
fn store_error(resource: &str, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(ref response) if response.code == 404 => {
            StoreError::NotFound(resource.to_string())
        }
        kube::Error::Api(ref response) if response.code == 409 => {
            StoreError::Conflict(resource.to_string())
        }
        other => StoreError::Transient(other.to_string()),
    }
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn get_observation(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Observation, StoreError> {
        let api: Api<Observation> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| store_error(&format!("Observation {}/{}", namespace, name), e))
    }

    async fn update_observation_status(
        &self,
        namespace: &str,
        name: &str,
        status: &ObservationStatus,
    ) -> Result<(), StoreError> {
        let api: Api<Observation> = Api::namespaced(self.client.clone(), namespace);
        let status_patch = json!({ "status": status });
        let pp = PatchParams::default();
        api.patch_status(name, &pp, &Patch::Merge(&status_patch))
            .await
            .map(|_| ())
            .map_err(|e| store_error(&format!("Observation {}/{} status", namespace, name), e))
    }

    async fn list_owned_deployments(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Deployment>, StoreError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&Self::owner_selector(owner));
        api.list(&lp)
            .await
            .map(|list| list.items)
            .map_err(|e| store_error("Deployments", e))
    }

    async fn list_owned_services(
        &self,
        namespace: &str,
        owner: &str,
    ) -> Result<Vec<Service>, StoreError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&Self::owner_selector(owner));
        api.list(&lp)
            .await
            .map(|list| list.items)
            .map_err(|e| store_error("Services", e))
    }
}
