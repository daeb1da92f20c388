//! Observation Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the observation controller.

pub mod conditions;
pub mod observation;
pub mod references;

pub use conditions::*;
pub use observation::*;
pub use references::*;
