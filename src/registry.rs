//! Agent registry: the name-keyed table of live agents
//!
//! Entries hold the worker channel for an agent plus its metadata. The
//! process itself lives inside the worker task, so nothing here touches
//! stdin/stdout directly.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{OrchestratorError, Result};
use crate::manager::AskCommand;
use crate::types::agent::{AgentInfo, AgentStatus, Lineage};
use crate::types::identifiers::SessionId;
use crate::types::messages::AgentResponse;

/// Mutable per-agent bookkeeping, updated by the agent's worker
#[derive(Debug, Clone)]
pub(crate) struct AgentState {
    pub session_id: Option<SessionId>,
    pub request_count: u64,
    pub status: AgentStatus,
}

/// One registered agent
pub(crate) struct RegisteredAgent {
    pub name: String,
    pub model: Option<String>,
    pub resolved_model: Option<String>,
    pub pid: Option<u32>,
    pub forked_from: Option<SessionId>,
    pub created_at: DateTime<Utc>,
    pub state: Arc<Mutex<AgentState>>,
    pub command_tx: mpsc::UnboundedSender<AskCommand>,
    pub cancel: CancellationToken,
    pub worker: Mutex<Option<JoinHandle<()>>>,
}

impl RegisteredAgent {
    /// Current session id
    pub fn session_id(&self) -> Option<SessionId> {
        self.state.lock().session_id.clone()
    }

    /// Metadata snapshot
    pub fn info(&self) -> AgentInfo {
        let state = self.state.lock().clone();
        AgentInfo {
            name: self.name.clone(),
            model: self.model.clone(),
            resolved_model: self.resolved_model.clone(),
            pid: self.pid,
            session_id: state.session_id,
            forked_from: self.forked_from.clone(),
            created_at: self.created_at,
            request_count: state.request_count,
            status: state.status,
        }
    }

    /// Fork ancestry snapshot
    pub fn lineage(&self) -> Lineage {
        Lineage {
            name: self.name.clone(),
            session_id: self.session_id(),
            forked_from: self.forked_from.clone(),
            created_at: self.created_at,
        }
    }

    /// Queue one request on the worker without waiting for it
    ///
    /// Requests are served in the order they were enqueued.
    ///
    /// # Errors
    /// `TransportClosed` if the worker is gone
    pub fn enqueue(&self, prompt: &str) -> Result<PendingAnswer> {
        let (response_tx, response_rx) = oneshot::channel();
        let cmd = AskCommand {
            prompt: prompt.to_string(),
            response_tx,
        };

        self.command_tx
            .send(cmd)
            .map_err(|_| OrchestratorError::transport_closed(&self.name))?;

        Ok(PendingAnswer {
            agent: self.name.clone(),
            response_rx,
        })
    }

    /// Queue one request on the worker and wait for its response
    ///
    /// # Errors
    /// `TransportClosed` if the worker is gone, otherwise whatever the
    /// exchange produced
    pub async fn request(&self, prompt: &str) -> Result<AgentResponse> {
        self.enqueue(prompt)?.wait().await
    }

    /// Cancel the worker and wait for it to reap the process
    ///
    /// A request in flight fails with `TransportClosed`. If the worker does
    /// not finish within `timeout` it is aborted, which drops the process and
    /// kills its group.
    pub async fn stop(&self, timeout: Duration) {
        self.cancel.cancel();

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let abort = handle.abort_handle();
            if tokio::time::timeout(timeout, handle).await.is_err() {
                log::warn!("Worker for agent '{}' did not stop in {:?}; aborting", self.name, timeout);
                abort.abort();
            }
        }
    }
}

/// Reply slot for a request already queued on a worker
pub(crate) struct PendingAnswer {
    agent: String,
    response_rx: oneshot::Receiver<Result<AgentResponse>>,
}

impl PendingAnswer {
    /// Wait for the worker to answer
    ///
    /// A worker that stops before answering (kill) yields `TransportClosed`.
    pub async fn wait(self) -> Result<AgentResponse> {
        self.response_rx
            .await
            .map_err(|_| OrchestratorError::transport_closed(&self.agent))?
    }
}

/// Table of live agents keyed by name
///
/// Every lookup and mutation takes the table lock for one step. A spawn
/// first reserves its name under the lock, launches the process with the
/// lock released, then installs the agent; a reserved name counts as taken,
/// so two concurrent spawns of the same name cannot both succeed.
pub(crate) struct AgentRegistry {
    table: Mutex<Table>,
    max_agents: Option<usize>,
}

#[derive(Default)]
struct Table {
    agents: HashMap<String, Arc<RegisteredAgent>>,
    reserved: HashSet<String>,
}

/// A name held for a spawn in progress; released on drop unless installed
struct Reservation<'a> {
    registry: &'a AgentRegistry,
    name: String,
}

impl Reservation<'_> {
    /// Publish `agent` under the reserved name; the reservation drops after
    fn install(self, agent: RegisteredAgent) -> Arc<RegisteredAgent> {
        let agent = Arc::new(agent);
        self.registry
            .table
            .lock()
            .agents
            .insert(self.name.clone(), Arc::clone(&agent));
        agent
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.registry.table.lock().reserved.remove(&self.name);
    }
}

impl AgentRegistry {
    /// Create an empty registry with an optional live-agent cap
    pub fn new(max_agents: Option<usize>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            max_agents,
        }
    }

    fn reserve(&self, name: &str) -> Result<Reservation<'_>> {
        let mut table = self.table.lock();

        if table.agents.contains_key(name) || table.reserved.contains(name) {
            return Err(OrchestratorError::already_exists(name));
        }

        if let Some(max) = self.max_agents
            && table.agents.len() + table.reserved.len() >= max
        {
            return Err(OrchestratorError::LimitExceeded(max));
        }

        table.reserved.insert(name.to_string());
        Ok(Reservation {
            registry: self,
            name: name.to_string(),
        })
    }

    /// Insert the agent built by `make` under `name`
    ///
    /// The name and capacity checks pass before `make` runs. `make` runs
    /// without the table lock held, and a failed build leaves no trace.
    ///
    /// # Errors
    /// `AlreadyExists`, `LimitExceeded`, or the error from `make`
    pub fn insert_with<F>(&self, name: &str, make: F) -> Result<Arc<RegisteredAgent>>
    where
        F: FnOnce() -> Result<RegisteredAgent>,
    {
        let reservation = self.reserve(name)?;
        let agent = make()?;
        Ok(reservation.install(agent))
    }

    /// Look up an agent
    ///
    /// # Errors
    /// `NotFound` if no agent has this name
    pub fn get(&self, name: &str) -> Result<Arc<RegisteredAgent>> {
        self.table
            .lock()
            .agents
            .get(name)
            .cloned()
            .ok_or_else(|| OrchestratorError::not_found(name))
    }

    /// Remove an agent, freeing its name
    ///
    /// # Errors
    /// `NotFound` if no agent has this name
    pub fn remove(&self, name: &str) -> Result<Arc<RegisteredAgent>> {
        self.table
            .lock()
            .agents
            .remove(name)
            .ok_or_else(|| OrchestratorError::not_found(name))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.table.lock().agents.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.lock().agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of every agent, oldest first
    pub fn snapshot(&self) -> Vec<AgentInfo> {
        let agents: Vec<Arc<RegisteredAgent>> =
            self.table.lock().agents.values().cloned().collect();
        let mut infos: Vec<AgentInfo> = agents.iter().map(|a| a.info()).collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        infos
    }
}
