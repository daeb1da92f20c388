//! Status conditions
//!
//! Typed, timestamped status flags communicating sub-states of a
//! resource's lifecycle, unique by condition type within a status.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type set when the resource is fully functional.
///
/// Declared for API completeness; the current reconciliation logic never
/// sets it.
pub const TYPE_AVAILABLE: &str = "Available";

/// Condition type set while the resource is being reconciled.
pub const TYPE_PROGRESSING: &str = "Progressing";

/// Condition type set when reconciliation encountered an error.
pub const TYPE_DEGRADED: &str = "Degraded";

/// Status value of a condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum ConditionStatus {
    /// The condition holds
    True,

    /// The condition does not hold
    False,

    /// The condition cannot be determined
    Unknown,
}

/// A typed status flag with a human-readable reason and message.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type, unique within a condition list
    #[serde(rename = "type")]
    pub condition_type: String,

    /// One of True, False, Unknown
    pub status: ConditionStatus,

    /// Machine-readable reason for the last transition
    pub reason: String,

    /// Human-readable details, may embed underlying error text
    pub message: String,

    /// When the condition last changed status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    /// Creates a condition stamped with the current time.
    pub fn new(
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            status,
            reason: reason.to_string(),
            message: message.into(),
            last_transition_time: Some(Utc::now()),
        }
    }
}

/// Upserts `condition` into `conditions`, keyed by condition type.
///
/// An existing entry of the same type is replaced in place, keeping its
/// position in the list; a new type is appended. The transition timestamp
/// is carried over from the existing entry unless the status value
/// changed.
pub fn set_status_condition(conditions: &mut Vec<Condition>, mut condition: Condition) {
    if condition.last_transition_time.is_none() {
        condition.last_transition_time = Some(Utc::now());
    }
    match conditions
        .iter_mut()
        .find(|c| c.condition_type == condition.condition_type)
    {
        Some(existing) => {
            if existing.status == condition.status {
                condition.last_transition_time = existing.last_transition_time;
            }
            *existing = condition;
        }
        None => conditions.push(condition),
    }
}
