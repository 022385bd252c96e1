//! Core agent manager structure and lifecycle management
//!
//! Provides the main `AgentManager` struct with initialization and shutdown.

use std::sync::Arc;

use crate::audit::{AuditEvent, AuditSink, LogAuditSink};
use crate::registry::AgentRegistry;
use crate::types::agent::KillAllResponse;
use crate::types::config::OrchestratorConfig;

use super::super::responses::ResponseTable;

// ============================================================================
// AGENT MANAGER CORE
// ============================================================================

/// Manager for multiple concurrent agent processes
///
/// The `AgentManager` coordinates named agents, handling:
/// - Agent lifecycle (spawn, fork, kill)
/// - Synchronous and queued asynchronous requests
/// - Relay and broadcast between agents
/// - Audit events for every lifecycle change
///
/// Cloning is cheap; clones share the same registry and response table.
#[derive(Clone)]
pub struct AgentManager {
    pub(crate) registry: Arc<AgentRegistry>,
    pub(crate) responses: Arc<ResponseTable>,
    pub(crate) audit: Arc<dyn AuditSink>,
    pub(crate) config: Arc<OrchestratorConfig>,
}

impl AgentManager {
    /// Create a manager with default configuration and log-backed auditing
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    /// Create a manager with the given configuration
    #[must_use]
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self {
            registry: Arc::new(AgentRegistry::new(config.max_agents)),
            responses: Arc::new(ResponseTable::new()),
            audit: Arc::new(LogAuditSink),
            config: Arc::new(config),
        }
    }

    /// Replace the audit sink
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Hand an event to the audit sink; failures are logged, never returned
    pub(crate) fn audit(&self, event: AuditEvent) {
        if let Err(e) = self.audit.record(&event) {
            log::warn!(
                "Failed to record audit event for agent '{}': {}",
                event.agent,
                e
            );
        }
    }
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentManager {
    /// Gracefully shutdown the AgentManager
    ///
    /// Kills every registered agent. Should be called before dropping to
    /// ensure every process group is reaped.
    pub async fn shutdown(&self) -> KillAllResponse {
        log::info!("Shutting down AgentManager...");
        let response = self.kill_all().await;
        log::info!(
            "AgentManager shutdown complete ({} agents killed)",
            response.killed.len()
        );
        response
    }
}
