//! Reconciliation logic for Observation resources.
//!
//! One reconciliation fetches the current object, makes sure its status
//! conditions are initialized, lists the dependent resource collections,
//! and records failures into status. No dependent objects are ever
//! created, mutated, or deleted; only the Observation status subresource
//! is written.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{error, info};

use crate::backoff::ExponentialBackoff;
use crate::error::{ControllerError, StoreError};
use crate::store::ClusterStore;
use crds::{
    set_status_condition, Condition, ConditionStatus, Observation, TYPE_DEGRADED, TYPE_PROGRESSING,
};

/// Reason recorded on the initial Progressing condition.
const REASON_RECONCILING: &str = "Reconciling";

/// Reason recorded on Degraded conditions raised by failed list calls.
const REASON_RECONCILIATION_ERROR: &str = "ReconciliationError";

/// Reconciles Observation resources against the cluster state store.
///
/// Safe to share across worker tasks: the store is behind an `Arc` and
/// the only internal state is the per-object backoff table.
pub struct Reconciler {
    store: Arc<dyn ClusterStore>,
    backoffs: Mutex<HashMap<String, ExponentialBackoff>>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self {
            store,
            backoffs: Mutex::new(HashMap::new()),
        }
    }

    /// Reconciles one Observation by namespaced name.
    ///
    /// A missing object ends the cycle successfully: deletion needs no
    /// cleanup since no finalizer-tracked external resources exist. Every
    /// other store failure propagates so the dispatch layer requeues with
    /// backoff. Re-invoking with the same inputs is always safe.
    pub async fn reconcile_observation(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<(), ControllerError> {
        info!("Reconciling Observation {}/{}", namespace, name);

        let mut observation = match self.store.get_observation(namespace, name).await {
            Ok(observation) => observation,
            Err(StoreError::NotFound(_)) => {
                info!(
                    "Observation {}/{} not found, ignoring since object must be deleted",
                    namespace, name
                );
                return Ok(());
            }
            Err(e) => {
                error!("Failed to get Observation {}/{}: {}", namespace, name, e);
                return Err(e.into());
            }
        };

        // First observation: mark the object as being reconciled before
        // any dependent-resource work, then re-fetch so later status
        // writes carry a fresh resource version.
        let conditions_empty = observation
            .status
            .as_ref()
            .map(|s| s.conditions.is_empty())
            .unwrap_or(true);
        if conditions_empty {
            let status = observation.status.get_or_insert_with(Default::default);
            set_status_condition(
                &mut status.conditions,
                Condition::new(
                    TYPE_PROGRESSING,
                    ConditionStatus::Unknown,
                    REASON_RECONCILING,
                    "Starting reconciliation",
                ),
            );
            if let Err(e) = self
                .store
                .update_observation_status(namespace, name, status)
                .await
            {
                error!(
                    "Failed to update Observation {}/{} status: {}",
                    namespace, name, e
                );
                return Err(e.into());
            }
            observation = match self.store.get_observation(namespace, name).await {
                Ok(observation) => observation,
                Err(e) => {
                    error!("Failed to re-fetch Observation {}/{}: {}", namespace, name, e);
                    return Err(e.into());
                }
            };
        }

        if let Err(e) = self.store.list_owned_deployments(namespace, name).await {
            let error_msg = format!("Failed to list Deployments: {}", e);
            error!("{}", error_msg);
            self.record_degraded(&mut observation, namespace, name, error_msg)
                .await;
            return Err(e.into());
        }

        if let Err(e) = self.store.list_owned_services(namespace, name).await {
            let error_msg = format!("Failed to list Services: {}", e);
            error!("{}", error_msg);
            self.record_degraded(&mut observation, namespace, name, error_msg)
                .await;
            return Err(e.into());
        }

        self.clear_backoff(namespace, name);
        Ok(())
    }

    /// Upserts a Degraded condition and persists it best-effort. A
    /// secondary persist failure is logged and never masks the primary
    /// error the caller is about to return.
    async fn record_degraded(
        &self,
        observation: &mut Observation,
        namespace: &str,
        name: &str,
        message: String,
    ) {
        let status = observation.status.get_or_insert_with(Default::default);
        set_status_condition(
            &mut status.conditions,
            Condition::new(
                TYPE_DEGRADED,
                ConditionStatus::True,
                REASON_RECONCILIATION_ERROR,
                message,
            ),
        );
        if let Err(e) = self
            .store
            .update_observation_status(namespace, name, status)
            .await
        {
            error!(
                "Failed to update Observation {}/{} status: {}",
                namespace, name, e
            );
        }
    }

    /// Next requeue delay for an object whose reconciliation just failed.
    ///
    /// Delays grow per object and are dropped again on the first
    /// successful reconciliation.
    pub fn next_requeue(&self, namespace: &str, name: &str) -> Duration {
        let key = format!("{}/{}", namespace, name);
        self.lock_backoffs()
            .entry(key)
            .or_default()
            .next_backoff()
    }

    fn clear_backoff(&self, namespace: &str, name: &str) {
        let key = format!("{}/{}", namespace, name);
        self.lock_backoffs().remove(&key);
    }

    fn lock_backoffs(&self) -> MutexGuard<'_, HashMap<String, ExponentialBackoff>> {
        match self.backoffs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
