//! Command protocol between callers and an agent's worker task

use tokio::sync::oneshot;

use crate::error::Result;
use crate::types::messages::AgentResponse;

/// One request for an agent's worker
///
/// The worker handles commands strictly in arrival order, which is what keeps
/// concurrent callers from interleaving lines on the agent's stdin/stdout.
pub(crate) struct AskCommand {
    /// The prompt text to send
    pub prompt: String,
    /// Channel to send the response back
    pub response_tx: oneshot::Sender<Result<AgentResponse>>,
}
