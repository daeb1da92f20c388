//! Observation Controller
//!
//! Watches `Observation` custom resources that snapshot references to
//! other cluster objects, keeps their status conditions initialized, and
//! reports dependent-resource listing failures into status.
//!
//! The controller is a pure observer of dependents: it lists Deployments
//! and Services owned by each Observation but never creates, mutates, or
//! deletes them.

mod backoff;
mod controller;
mod error;
mod reconciler;
mod store;
mod watcher;

#[cfg(test)]
mod test_utils;

use crate::error::ControllerError;
use controller::Controller;
use std::env;
use tracing::info;

/// Distinct objects reconciled concurrently unless configured otherwise.
const DEFAULT_CONCURRENCY: u16 = 3;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Observation Controller");

    // Load configuration from environment variables
    let namespace = env::var("WATCH_NAMESPACE").ok();
    let concurrency = match env::var("RECONCILE_CONCURRENCY") {
        Ok(value) => value
            .parse::<u16>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| {
                ControllerError::InvalidConfig(format!(
                    "RECONCILE_CONCURRENCY must be a positive integer, got {:?}",
                    value
                ))
            })?,
        Err(_) => DEFAULT_CONCURRENCY,
    };

    info!("Configuration:");
    info!("  Namespace: {}", namespace.as_deref().unwrap_or("default"));
    info!("  Concurrency: {}", concurrency);

    // Initialize and run controller
    let controller = Controller::new(namespace, concurrency).await?;
    controller.run().await?;

    Ok(())
}
