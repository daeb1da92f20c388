//! Main controller implementation.
//!
//! This module contains the `Controller` struct that assembles the store,
//! reconciler, and resource watcher for the Observation Controller.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::{ClusterStore, KubeStore};
use crate::watcher::Watcher;
use crds::Observation;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for Observation management.
pub struct Controller {
    observation_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(
        namespace: Option<String>,
        concurrency: u16,
    ) -> Result<Self, ControllerError> {
        info!("Initializing Observation Controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        // Create API clients
        let ns = namespace.as_deref().unwrap_or("default");
        let observation_api: Api<Observation> = Api::namespaced(kube_client.clone(), ns);
        let deployment_api: Api<Deployment> = Api::namespaced(kube_client.clone(), ns);
        let service_api: Api<Service> = Api::namespaced(kube_client.clone(), ns);

        // The typed store is built once here and handed to the
        // reconciler; all cluster access flows through it.
        let store: Arc<dyn ClusterStore> = Arc::new(KubeStore::new(kube_client));
        let reconciler = Arc::new(Reconciler::new(store));

        // Start the watcher in a background task
        let watcher_instance = Watcher::new(
            reconciler,
            observation_api,
            deployment_api,
            service_api,
            concurrency,
        );
        let observation_watcher = tokio::spawn(async move {
            watcher_instance.watch_observations().await
        });

        Ok(Self {
            observation_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Observation Controller running");

        self.observation_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("Observation watcher panicked: {}", e)))?
            .map_err(|e| ControllerError::Watch(format!("Observation watcher error: {}", e)))?;

        Ok(())
    }
}
