//! Kubernetes object references
//!
//! Standard Kubernetes-style references to other cluster objects,
//! following the TypedLocalObjectReference pattern with apiGroup, kind,
//! name, and optional namespace.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to another cluster object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// API group of the referenced object; omitted for the core group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,

    /// Kind of the referenced object (e.g. "Deployment", "Service")
    pub kind: String,

    /// Name of the referenced object
    pub name: String,

    /// Namespace of the referenced object (defaults to the same namespace
    /// as the referencing Observation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectReference {
    /// Create a core-group reference in the same namespace.
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            api_group: None,
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: None,
        }
    }

    /// Create a reference to an object in a specific namespace.
    pub fn with_namespace(kind: &str, name: &str, namespace: &str) -> Self {
        Self {
            api_group: None,
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }

    /// Create a reference carrying an explicit API group.
    pub fn grouped(api_group: &str, kind: &str, name: &str) -> Self {
        Self {
            api_group: Some(api_group.to_string()),
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: None,
        }
    }
}
