//! Core domain types shared across the db, service, and HTTP layers.

use serde::{Deserialize, Serialize};

/// A scheduled task, the sole persisted entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Positive row id, assigned by the store on creation.
    pub id: i64,
    /// Next due date, always 8-digit `YYYYMMDD` at rest.
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    /// Repeat rule text; empty means a one-time task.
    #[serde(default)]
    pub repeat: String,
}

/// Incoming task fields for create and update requests.
///
/// Every field defaults so partial bodies decode; validation of the decoded
/// values happens in the service layer, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

/// Response body for the create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Response body for the upcoming-list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}
