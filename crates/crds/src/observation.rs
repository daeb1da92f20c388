//! Observation CRD
//!
//! A passive snapshot of references to other cluster objects, plus an
//! optional list of HTTP endpoint descriptors. The controller only ever
//! writes the status subresource; spec is owned by whoever created the
//! object.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conditions::Condition;
use crate::references::ObjectReference;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "monitoring.bi-ws2025.de",
    version = "v1",
    kind = "Observation",
    namespaced,
    status = "ObservationStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ObservationSpec {
    /// Watched DaemonSets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daemon_sets: Vec<ObjectReference>,

    /// Watched Deployments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<ObjectReference>,

    /// Watched StatefulSets
    ///
    /// The stored wire key is the singular `statefulSet`.
    #[serde(default, rename = "statefulSet", skip_serializing_if = "Vec::is_empty")]
    pub stateful_sets: Vec<ObjectReference>,

    /// Watched Pods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pods: Vec<ObjectReference>,

    /// Watched Services
    ///
    /// The stored wire key is the singular `service`.
    #[serde(default, rename = "service", skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ObjectReference>,

    /// Watched PersistentVolumes
    ///
    /// The stored wire key is the singular `persistentVolume`.
    #[serde(default, rename = "persistentVolume", skip_serializing_if = "Vec::is_empty")]
    pub persistent_volumes: Vec<ObjectReference>,

    /// Watched Ingress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<ObjectReference>,

    /// HTTP endpoints recorded alongside the object references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http_endpoints: Vec<HTTPEndpoint>,
}

/// A request/response pair describing one HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HTTPEndpoint {
    /// The request identifying the endpoint
    pub request: HTTPRequest,

    /// Recorded response, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<HTTPResponse>,
}

/// An HTTP request descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HTTPRequest {
    /// Request method (GET, POST, ...)
    pub method: String,

    /// Request URL
    pub url: String,
}

/// A recorded HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct HTTPResponse {
    /// Response status line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Observed state of an Observation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObservationStatus {
    /// Current state of the Observation resource, unique by condition type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
