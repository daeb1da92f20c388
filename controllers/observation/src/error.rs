//! Controller-specific error types.
//!
//! This module defines error types specific to the Observation Controller
//! that are not covered by upstream library errors.

use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Observation Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Cluster state store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

/// Errors surfaced by the cluster state store.
///
/// `NotFound` is benign on reads and terminates the cycle; everything
/// else is retryable via requeue.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Optimistic-concurrency conflict on a write
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transient API failure (network, throttling, server-side)
    #[error("{0}")]
    Transient(String),
}
