//! Response table for asynchronous requests
//!
//! Independent of the agent registry: entries refer to agents by name only.
//! Each entry moves from `pending` to a terminal status exactly once.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::helpers::format_request_id;
use crate::error::Result;
use crate::types::identifiers::RequestId;
use crate::types::requests::{PendingRequest, RequestStatus};

/// Shared store of asynchronous requests keyed by id
#[derive(Debug, Default)]
pub struct ResponseTable {
    entries: Mutex<HashMap<RequestId, PendingRequest>>,
    counter: AtomicU64,
}

impl ResponseTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh id and record a pending request for it
    pub fn submit(&self, agent_name: &str, prompt: &str) -> RequestId {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let request_id = format_request_id(agent_name, counter);
        let entry = PendingRequest::pending(request_id.clone(), agent_name, prompt);
        self.entries.lock().insert(request_id.clone(), entry);
        request_id
    }

    /// Move a pending request to `complete` or `error`
    ///
    /// Returns `false` without touching the table if the request is unknown
    /// or already terminal.
    pub fn finish(&self, request_id: &RequestId, outcome: Result<String>) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(request_id) else {
            return false;
        };
        if entry.status != RequestStatus::Pending {
            return false;
        }

        match outcome {
            Ok(text) => {
                entry.status = RequestStatus::Complete;
                entry.result = Some(text);
            }
            Err(e) => {
                entry.status = RequestStatus::Error;
                entry.error = Some(e.to_string());
            }
        }
        entry.completed_at = Some(Utc::now());
        true
    }

    /// Current record, or a synthetic `not-found` one
    pub fn get(&self, request_id: &RequestId) -> PendingRequest {
        self.entries
            .lock()
            .get(request_id)
            .cloned()
            .unwrap_or_else(|| PendingRequest::not_found(request_id.clone()))
    }

    /// Records matching `status` (all when `None`), oldest first
    pub fn list(&self, status: Option<RequestStatus>) -> Vec<PendingRequest> {
        let mut records: Vec<PendingRequest> = self
            .entries
            .lock()
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.request_id.cmp(&b.request_id))
        });
        records
    }

    /// Delete every non-pending record, returning how many were removed
    pub fn clear_finished(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, r| r.status == RequestStatus::Pending);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;

    #[test]
    fn transition_happens_once() {
        let table = ResponseTable::new();
        let id = table.submit("a", "hi");
        assert_eq!(table.get(&id).status, RequestStatus::Pending);

        assert!(table.finish(&id, Ok("hello".into())));
        assert!(!table.finish(&id, Err(OrchestratorError::transport("late"))));

        let record = table.get(&id);
        assert_eq!(record.status, RequestStatus::Complete);
        assert_eq!(record.result.as_deref(), Some("hello"));
        assert!(record.error.is_none());
        assert!(record.completed_at.is_some());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let table = ResponseTable::new();
        let record = table.get(&RequestId::new("nope"));
        assert_eq!(record.status, RequestStatus::NotFound);
        assert!(!table.finish(&RequestId::new("nope"), Ok(String::new())));
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let table = ResponseTable::new();
        let a = table.submit("x", "1");
        let b = table.submit("x", "2");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("x-000001-"));
        assert!(b.as_str().starts_with("x-000002-"));
    }

    #[test]
    fn clear_keeps_pending_entries() {
        let table = ResponseTable::new();
        let done = table.submit("a", "1");
        let failed = table.submit("a", "2");
        let open = table.submit("b", "3");
        table.finish(&done, Ok("ok".into()));
        table.finish(&failed, Err(OrchestratorError::not_found("a")));

        assert_eq!(table.list(Some(RequestStatus::Error)).len(), 1);
        assert_eq!(table.clear_finished(), 2);
        assert_eq!(table.list(None).len(), 1);
        assert_eq!(table.get(&open).status, RequestStatus::Pending);
        assert_eq!(table.get(&done).status, RequestStatus::NotFound);
    }
}
