//! Asynchronous request queue
//!
//! `ask_async` queues a request on the agent's worker and hands back an id
//! at once. A detached task waits for the worker's answer and records it in
//! the response table, where callers poll or wait for it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::Result;
use crate::types::identifiers::RequestId;
use crate::types::requests::{PendingRequest, RequestStatus};

use super::core::AgentManager;

impl AgentManager {
    /// Queue `prompt` for `name` and return its request id immediately
    ///
    /// Requests queued for the same agent are answered in submission order.
    /// Failures after this returns are recorded as the request's `error`
    /// status, never raised.
    ///
    /// # Errors
    /// `NotFound` if `name` is not registered
    pub fn ask_async(&self, name: &str, prompt: &str) -> Result<RequestId> {
        let agent = self.registry.get(name)?;
        let request_id = self.responses.submit(name, prompt);

        let pending = match agent.enqueue(prompt) {
            Ok(pending) => pending,
            Err(e) => {
                self.responses.finish(&request_id, Err(e));
                return Ok(request_id);
            }
        };

        let responses = Arc::clone(&self.responses);
        let id = request_id.clone();
        tokio::spawn(async move {
            let outcome = pending.wait().await.map(|r| r.text().to_string());
            if let Err(e) = &outcome {
                log::debug!("Request {id} failed: {e}");
            }
            responses.finish(&id, outcome);
        });

        log::debug!("Queued request {request_id} for agent '{name}'");
        Ok(request_id)
    }

    /// Current state of a request, or `not-found` for an unknown id
    #[must_use]
    pub fn poll_response(&self, request_id: &RequestId) -> PendingRequest {
        self.responses.get(request_id)
    }

    /// Poll until the request leaves `pending` or `timeout` elapses
    ///
    /// On timeout the returned record has status `timeout`; the request keeps
    /// running and a later poll can still observe its outcome.
    pub async fn wait_response(&self, request_id: &RequestId, timeout: Duration) -> PendingRequest {
        let deadline = Instant::now() + timeout;

        loop {
            let record = self.responses.get(request_id);
            if record.status != RequestStatus::Pending {
                return record;
            }

            let now = Instant::now();
            if now >= deadline {
                return record.timed_out();
            }

            tokio::time::sleep(self.config.poll_interval.min(deadline - now)).await;
        }
    }

    /// [`wait_response`](Self::wait_response) with the configured default timeout
    pub async fn wait_response_default(&self, request_id: &RequestId) -> PendingRequest {
        self.wait_response(request_id, self.config.default_wait_timeout)
            .await
    }

    /// Requests still in flight, oldest first
    #[must_use]
    pub fn list_pending(&self) -> Vec<PendingRequest> {
        self.responses.list(Some(RequestStatus::Pending))
    }

    /// Requests with the given status (all when `None`), oldest first
    #[must_use]
    pub fn list_responses(&self, status: Option<RequestStatus>) -> Vec<PendingRequest> {
        self.responses.list(status)
    }

    /// Drop every finished request, returning how many were removed
    pub fn clear_responses(&self) -> usize {
        let removed = self.responses.clear_finished();
        log::debug!("Cleared {removed} finished requests");
        removed
    }
}
