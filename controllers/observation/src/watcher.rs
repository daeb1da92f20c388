//! Kubernetes resource watchers.
//!
//! Watches Observation resources and their owner-labelled dependents and
//! drives reconciliation through `kube_runtime::Controller`, which
//! supplies per-object serialization, bounded concurrency across distinct
//! objects, automatic reconnection, and requeue scheduling.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::OWNER_LABEL;
use crds::Observation;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Api, Resource, ResourceExt};
use kube_runtime::controller::{Action, Config as ControllerConfig};
use kube_runtime::reflector::ObjectRef;
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Watches cluster resources and runs the reconcile loop.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    observation_api: Api<Observation>,
    deployment_api: Api<Deployment>,
    service_api: Api<Service>,
    concurrency: u16,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: Arc<Reconciler>,
        observation_api: Api<Observation>,
        deployment_api: Api<Deployment>,
        service_api: Api<Service>,
        concurrency: u16,
    ) -> Self {
        Self {
            reconciler,
            observation_api,
            deployment_api,
            service_api,
            concurrency,
        }
    }

    /// Starts watching Observation resources.
    ///
    /// Dependent Deployments and Services are watched too; an event on a
    /// dependent maps back to the owning Observation through the owner
    /// label, so dependent changes requeue the owner. Delivery is
    /// at-least-once and reconciliations for one object never overlap.
    pub async fn watch_observations(&self) -> Result<(), ControllerError> {
        info!("Starting Observation watcher");

        // Requeue failed objects with per-object backoff; success clears
        // the backoff inside the reconciler.
        let error_policy = |obj: Arc<Observation>, error: &ControllerError, ctx: Arc<Reconciler>| {
            let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
            let name = obj.name_any();
            let delay = ctx.next_requeue(&namespace, &name);
            error!(
                "Reconciliation error for Observation {}/{}: {}, requeueing in {:?}",
                namespace, name, error, delay
            );
            Action::requeue(delay)
        };

        let reconcile = |obj: Arc<Observation>, ctx: Arc<Reconciler>| async move {
            let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
            let name = obj.name_any();
            debug!("Reconcile request for Observation {}/{}", namespace, name);
            ctx.reconcile_observation(&namespace, &name).await?;
            // No explicit requeue interval on success; future work rides
            // on watch-triggered re-invocation.
            Ok(Action::await_change())
        };

        // Debounce batches bursts of watch events; concurrency bounds how
        // many distinct objects reconcile at once.
        let controller_config = ControllerConfig::default()
            .debounce(Duration::from_secs(1))
            .concurrency(self.concurrency);

        // Only dependents carrying the owner label are interesting.
        let dependents = watcher::Config::default().labels(OWNER_LABEL);

        Controller::new(self.observation_api.clone(), watcher::Config::default())
            .with_config(controller_config)
            .watches(self.deployment_api.clone(), dependents.clone(), owning_observation)
            .watches(self.service_api.clone(), dependents, owning_observation)
            .shutdown_on_signal()
            .run(reconcile, error_policy, self.reconciler.clone())
            .for_each(|result| async move {
                match result {
                    Ok((obj_ref, _action)) => {
                        debug!("Reconciled Observation {}", obj_ref);
                    }
                    Err(e) => error!("Controller error: {}", e),
                }
            })
            .await;

        Ok(())
    }
}

/// Maps a dependent object to the Observation named by its owner label.
fn owning_observation<K: Resource>(obj: K) -> Option<ObjectRef<Observation>> {
    let namespace = obj.meta().namespace.clone()?;
    let owner = obj.meta().labels.as_ref()?.get(OWNER_LABEL)?;
    Some(ObjectRef::new(owner).within(&namespace))
}
