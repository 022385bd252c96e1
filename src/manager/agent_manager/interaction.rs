//! Agent interaction methods
//!
//! Handles synchronous requests to agents and terminating agents.

use futures::future::join_all;

use crate::audit::{AuditEvent, AuditOperation, AuditOutcome};
use crate::error::Result;
use crate::types::agent::{KillAllResponse, KillResponse, KillStatus};
use crate::types::messages::AgentResponse;

use super::core::AgentManager;

impl AgentManager {
    /// Send `prompt` to `name` and wait for the result text
    ///
    /// Requests to one agent are served one at a time in arrival order. There
    /// is no timeout; use [`ask_async`](Self::ask_async) with
    /// [`wait_response`](Self::wait_response) for that.
    ///
    /// # Errors
    /// `NotFound` if `name` is not registered, `TransportClosed` if the agent
    /// dies or is killed mid-request, `Protocol` for a malformed response
    pub async fn ask(&self, name: &str, prompt: &str) -> Result<String> {
        let response = self.ask_full(name, prompt).await?;
        Ok(response.text().to_string())
    }

    /// Like [`ask`](Self::ask) but returns the whole decoded response
    ///
    /// # Errors
    /// Same as [`ask`](Self::ask)
    pub async fn ask_full(&self, name: &str, prompt: &str) -> Result<AgentResponse> {
        let agent = self.registry.get(name)?;
        agent.request(prompt).await
    }

    /// Kill an agent and its process group, freeing its name
    ///
    /// A request in flight on the agent fails with `TransportClosed`.
    ///
    /// # Errors
    /// `NotFound` if `name` is not registered
    pub async fn kill(&self, name: &str) -> Result<KillResponse> {
        let agent = match self.registry.remove(name) {
            Ok(agent) => agent,
            Err(e) => {
                self.audit(AuditEvent::new(
                    AuditOperation::Kill,
                    name,
                    None,
                    AuditOutcome::Error {
                        message: e.to_string(),
                    },
                ));
                return Err(e);
            }
        };

        agent.stop(self.config.shutdown_timeout * 2).await;
        log::info!("Killed agent '{name}'");

        self.audit(AuditEvent::new(
            AuditOperation::Kill,
            name,
            agent.model.clone(),
            AuditOutcome::Ok,
        ));

        Ok(KillResponse {
            name: name.to_string(),
            status: KillStatus::Killed,
        })
    }

    /// Kill every registered agent
    ///
    /// Agents are killed concurrently; a failure on one is logged and does
    /// not stop the rest.
    pub async fn kill_all(&self) -> KillAllResponse {
        let names = self.registry.names();
        let results = join_all(names.iter().map(|name| self.kill(name))).await;

        let mut killed = Vec::with_capacity(names.len());
        for (name, result) in names.into_iter().zip(results) {
            match result {
                Ok(_) => killed.push(name),
                Err(e) => log::warn!("Failed to kill agent '{name}': {e}"),
            }
        }

        KillAllResponse { killed }
    }
}
