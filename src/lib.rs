//! # Claude Agent Orchestrator
//!
//! Runs several long-lived Claude CLI processes side by side, each under a
//! caller-chosen name, and talks to them over the CLI's newline-delimited
//! JSON protocol. Agents can be queried synchronously or through a queue of
//! asynchronous requests, branched from one another's conversation state,
//! and fed messages by relay or broadcast.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kodegen_claude_orchestrator::{AgentManager, SpawnOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = AgentManager::new();
//!
//!     manager.spawn("base", SpawnOptions::with_model("sonnet")).await?;
//!     let answer = manager.ask("base", "Summarize the repository layout").await?;
//!     log::info!("base: {answer}");
//!
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Features
//!
//! ### 1. Forking
//!
//! Build expensive context once, then branch independent workers from it.
//! A fork resumes the source agent's latest session with `--resume`:
//!
//! ```no_run
//! # use kodegen_claude_orchestrator::{AgentManager, SpawnOptions};
//! # async fn example(manager: AgentManager) -> Result<(), Box<dyn std::error::Error>> {
//! manager.ask("base", "You are reviewing crate `foo`. Read src/lib.rs.").await?;
//! manager.fork("base", "security", SpawnOptions::default()).await?;
//! manager.fork("base", "perf", SpawnOptions::default()).await?;
//!
//! let lineage = manager.get_lineage("security")?;
//! assert_eq!(lineage.forked_from, manager.get_lineage("base")?.session_id);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. Asynchronous Requests
//!
//! [`AgentManager::ask_async`] returns a [`RequestId`] at once; poll or wait
//! for the outcome:
//!
//! ```no_run
//! # use kodegen_claude_orchestrator::{AgentManager, RequestStatus};
//! # use std::time::Duration;
//! # async fn example(manager: AgentManager) -> Result<(), Box<dyn std::error::Error>> {
//! let id = manager.ask_async("security", "List unsafe blocks")?;
//! let record = manager.wait_response(&id, Duration::from_secs(120)).await;
//! if record.status == RequestStatus::Complete {
//!     log::info!("{}", record.result.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Relay and Broadcast
//!
//! ```no_run
//! # use kodegen_claude_orchestrator::AgentManager;
//! # async fn example(manager: AgentManager) -> Result<(), Box<dyn std::error::Error>> {
//! let findings = manager.ask("security", "Report your findings").await?;
//! manager.relay("security", "perf", &format!("Security found: {findings}"))?;
//!
//! let ids = manager.broadcast(Some("base"), "Wrap up in one paragraph");
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. Auditing
//!
//! Every spawn, fork, kill and relay is reported to an [`AuditSink`]. The
//! default writes through `log`; [`JsonlAuditSink`] appends to a file.
//!
//! ## Architecture
//!
//! - [`manager`] - `AgentManager`, the public API
//! - [`transport`] - Line protocol framing and process management
//! - [`message`] - Line decoding
//! - [`types`] - Identifiers, wire messages, records and configuration
//! - [`audit`] - Audit events and sinks
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod error;
pub mod manager;
pub mod message;
pub(crate) mod registry;
pub mod transport;
pub mod types;

// Re-export commonly used types for external API
pub use audit::{
    AuditEvent, AuditOperation, AuditOutcome, AuditSink, JsonlAuditSink, LogAuditSink,
    MemoryAuditSink,
};
pub use error::{ErrorKind, OrchestratorError, Result};
pub use manager::{AgentManager, ResponseTable};
pub use message::parse_line;
pub use transport::{AgentProcess, LineTransport};

// Re-export type submodules for flat public API
pub use types::agent::{AgentInfo, AgentStatus, KillAllResponse, KillResponse, KillStatus, Lineage};
pub use types::config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use types::identifiers::{RequestId, SessionId};
pub use types::messages::{AgentResponse, InboundMessage, OutboundMessage, ResultMessage};
pub use types::models::resolve_model;
pub use types::options::{MAX_ALLOWED_TURNS, PermissionMode, SpawnOptions, SpawnOptionsBuilder};
pub use types::requests::{PendingRequest, RequestStatus};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
