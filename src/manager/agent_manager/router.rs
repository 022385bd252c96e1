//! Relay and broadcast
//!
//! Both are thin layers over [`AgentManager::ask_async`]: they only decide
//! which agents receive a message.

use std::collections::BTreeMap;

use serde_json::json;

use crate::audit::{AuditEvent, AuditOperation};
use crate::error::Result;
use crate::types::identifiers::RequestId;

use super::core::AgentManager;

impl AgentManager {
    /// Queue `message` for `to` on behalf of `from`
    ///
    /// Only `message` is forwarded. Callers that want to pass on `from`'s
    /// output compose it into `message` themselves; `from` is recorded in the
    /// audit trail and need not still be registered.
    ///
    /// # Errors
    /// `NotFound` if `to` is not registered
    pub fn relay(&self, from: &str, to: &str, message: &str) -> Result<RequestId> {
        let result = self.ask_async(to, message);

        let detail = match &result {
            Ok(id) => json!({ "from": from, "request_id": id.as_str() }),
            Err(_) => json!({ "from": from }),
        };
        let model = self.registry.get(to).ok().and_then(|a| a.model.clone());
        self.audit(
            AuditEvent::new(
                AuditOperation::Relay,
                to,
                model,
                AuditEvent::outcome_of(&result),
            )
            .with_detail(detail),
        );

        result
    }

    /// Queue `message` for every registered agent except `exclude`
    ///
    /// Returns the request id per agent. An agent that cannot take the
    /// request (killed concurrently) is logged and left out of the map.
    pub fn broadcast(&self, exclude: Option<&str>, message: &str) -> BTreeMap<String, RequestId> {
        let mut request_ids = BTreeMap::new();

        for name in self.registry.names() {
            if exclude == Some(name.as_str()) {
                continue;
            }
            match self.ask_async(&name, message) {
                Ok(id) => {
                    request_ids.insert(name, id);
                }
                Err(e) => log::warn!("Broadcast skipped agent '{name}': {e}"),
            }
        }

        log::debug!("Broadcast queued for {} agents", request_ids.len());
        request_ids
    }
}
