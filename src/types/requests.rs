//! Asynchronous request records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::RequestId;

/// Status of an asynchronous request
///
/// `Timeout` and `NotFound` are only ever synthesized for an observer; the
/// response table never stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    /// Still in flight
    Pending,
    /// Finished with a result
    Complete,
    /// Finished with an error
    Error,
    /// Observer stopped waiting; the work may still finish
    Timeout,
    /// Unknown or purged request id
    NotFound,
}

impl RequestStatus {
    /// Whether the request will never change again
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

/// One asynchronous unit of work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Request id
    pub request_id: RequestId,
    /// Target agent
    pub agent_name: String,
    /// Submitted prompt
    pub prompt: String,
    /// Current status
    pub status: RequestStatus,
    /// Result text when `Complete`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure message when `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the request was issued
    pub submitted_at: DateTime<Utc>,
    /// When the request reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    /// New request in `Pending` state
    pub fn pending(
        request_id: RequestId,
        agent_name: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            agent_name: agent_name.into(),
            prompt: prompt.into(),
            status: RequestStatus::Pending,
            result: None,
            error: None,
            submitted_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Synthetic record for an unknown id
    #[must_use]
    pub fn not_found(request_id: RequestId) -> Self {
        Self {
            request_id,
            agent_name: String::new(),
            prompt: String::new(),
            status: RequestStatus::NotFound,
            result: None,
            error: None,
            submitted_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Copy of this record reported as timed out
    #[must_use]
    pub fn timed_out(&self) -> Self {
        Self {
            status: RequestStatus::Timeout,
            ..self.clone()
        }
    }
}
