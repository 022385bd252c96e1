//! Agent metadata types
//!
//! Snapshots handed out by the registry. None of them hold a live process
//! handle, so they can be cloned, serialized and kept after the agent dies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::SessionId;

/// Lifecycle state of an agent process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Process is up and accepting requests
    Running,
    /// Output stream closed; process is gone or unusable
    Exited,
}

/// Public metadata for one registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Unique, caller-chosen name
    pub name: String,

    /// Model selector as requested (e.g. `opus`)
    pub model: Option<String>,

    /// Concrete model id passed to the process
    pub resolved_model: Option<String>,

    /// OS process id, when the platform reported one
    pub pid: Option<u32>,

    /// Session id from the latest response (seeded from the parent for forks)
    pub session_id: Option<SessionId>,

    /// Session this agent was resumed from
    pub forked_from: Option<SessionId>,

    /// When the agent was spawned
    pub created_at: DateTime<Utc>,

    /// Successful requests served so far
    pub request_count: u64,

    /// Process state
    pub status: AgentStatus,
}

/// Fork ancestry of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// Agent name
    pub name: String,
    /// Current session id
    pub session_id: Option<SessionId>,
    /// Parent session id, absent for root agents
    pub forked_from: Option<SessionId>,
    /// When the agent was spawned
    pub created_at: DateTime<Utc>,
}

/// Outcome marker for `kill`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KillStatus {
    /// Agent removed and its process group terminated
    Killed,
}

/// Response from `kill`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillResponse {
    /// Name of the killed agent
    pub name: String,
    /// Always `killed`
    pub status: KillStatus,
}

/// Response from `kill_all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillAllResponse {
    /// Names that were killed
    pub killed: Vec<String>,
}
