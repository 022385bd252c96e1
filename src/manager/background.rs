//! Background worker task owning one agent process
//!
//! The worker is the only code that touches an agent's stdio. It pulls
//! [`AskCommand`]s off a channel one at a time, runs the exchange, updates
//! the agent's bookkeeping, and answers on the command's oneshot. Cancelling
//! the agent's token abandons any exchange in flight and shuts the process
//! down.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::commands::AskCommand;
use crate::error::{OrchestratorError, Result};
use crate::registry::{AgentState, RegisteredAgent};
use crate::transport::AgentProcess;
use crate::types::agent::AgentStatus;
use crate::types::identifiers::SessionId;
use crate::types::messages::AgentResponse;
use crate::types::models::resolve_model;

/// Shared state for the worker task
struct WorkerContext {
    name: String,
    state: Arc<Mutex<AgentState>>,
    cancel: CancellationToken,
}

/// Wrap a freshly spawned process in a worker and build its registry entry
///
/// `forked_from` pre-seeds the session id so the agent reports its parent's
/// session until its own first response.
pub(crate) fn start_agent(
    process: AgentProcess,
    model: Option<String>,
    forked_from: Option<SessionId>,
) -> RegisteredAgent {
    let name = process.name().to_string();
    let pid = process.pid();

    let state = Arc::new(Mutex::new(AgentState {
        session_id: forked_from.clone(),
        request_count: 0,
        status: AgentStatus::Running,
    }));
    let cancel = CancellationToken::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let ctx = WorkerContext {
        name: name.clone(),
        state: Arc::clone(&state),
        cancel: cancel.clone(),
    };
    let worker = spawn_agent_worker(process, command_rx, ctx);

    RegisteredAgent {
        name,
        resolved_model: model.as_deref().map(resolve_model),
        model,
        pid,
        forked_from,
        created_at: Utc::now(),
        state,
        command_tx,
        cancel,
        worker: Mutex::new(Some(worker)),
    }
}

/// Spawn the worker loop for one agent
///
/// Runs until the agent is cancelled or every command sender is dropped,
/// then closes the process.
fn spawn_agent_worker(
    mut process: AgentProcess,
    mut command_rx: mpsc::UnboundedReceiver<AskCommand>,
    ctx: WorkerContext,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                () = ctx.cancel.cancelled() => break,

                cmd = command_rx.recv() => {
                    let Some(AskCommand { prompt, response_tx }) = cmd else {
                        break;
                    };

                    let result = tokio::select! {
                        biased;

                        () = ctx.cancel.cancelled() => {
                            Err(OrchestratorError::transport_closed(&ctx.name))
                        }
                        result = process.exchange(&prompt) => result,
                    };

                    if process.is_desynced() {
                        ctx.state.lock().status = AgentStatus::Exited;
                    }
                    let result = record_outcome(&ctx, result);
                    let _ = response_tx.send(result);
                }
            }
        }

        ctx.state.lock().status = AgentStatus::Exited;
        process.close().await;
        log::debug!("Worker for agent '{}' stopped", ctx.name);
    })
}

/// Fold one exchange result into the agent's bookkeeping
///
/// A response without a session id is rejected so the agent never silently
/// keeps a stale or missing resume token.
fn record_outcome(ctx: &WorkerContext, result: Result<AgentResponse>) -> Result<AgentResponse> {
    match result {
        Ok(response) => {
            let Some(session_id) = response.session_id().filter(|s| !s.is_blank()).cloned() else {
                log::warn!("[{}] result line carried no session_id", ctx.name);
                return Err(OrchestratorError::protocol(
                    format!("Result from agent '{}' carried no session_id", ctx.name),
                    Some(response.raw.to_string()),
                ));
            };

            let mut state = ctx.state.lock();
            state.session_id = Some(session_id);
            state.request_count += 1;
            drop(state);

            Ok(response)
        }
        Err(e) => {
            if matches!(
                e,
                OrchestratorError::TransportClosed { .. } | OrchestratorError::Transport(_)
            ) {
                ctx.state.lock().status = AgentStatus::Exited;
            }
            log::debug!("[{}] request failed: {}", ctx.name, e);
            Err(e)
        }
    }
}
