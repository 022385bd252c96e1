//! Type definitions for the orchestrator
//!
//! - [`identifiers`] - Type-safe ID wrappers (`SessionId`, `RequestId`)
//! - [`messages`] - Wire message types for the line protocol
//! - [`agent`] - Agent metadata snapshots
//! - [`requests`] - Asynchronous request records
//! - [`options`] - Per-agent spawn options
//! - [`config`] - Orchestrator-wide configuration
//! - [`models`] - Model selector table

pub mod agent;
pub mod config;
pub mod identifiers;
pub mod messages;
pub mod models;
pub mod options;
pub mod requests;

// Re-export commonly used types
pub use agent::{AgentInfo, AgentStatus, KillAllResponse, KillResponse, KillStatus, Lineage};
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use identifiers::{RequestId, SessionId};
pub use messages::{AgentResponse, InboundMessage, OutboundMessage, ResultMessage};
pub use models::resolve_model;
pub use options::{MAX_ALLOWED_TURNS, PermissionMode, SpawnOptions, SpawnOptionsBuilder};
pub use requests::{PendingRequest, RequestStatus};
