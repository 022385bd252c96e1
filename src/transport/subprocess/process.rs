//! Process Handle: one spawned agent and its framed stdio

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::task::JoinHandle;

use crate::error::{OrchestratorError, Result};
use crate::transport::line::LineTransport;
use crate::types::messages::AgentResponse;

/// A running agent process
///
/// Owns the child, the line transport over its stdin/stdout, and the task
/// draining its stderr. Exactly one worker task holds each `AgentProcess`.
pub struct AgentProcess {
    pub(super) name: String,
    pub(super) pid: Option<u32>,
    pub(super) child: Option<Child>,
    pub(super) transport: LineTransport<ChildStdin, ChildStdout>,
    pub(super) stderr_task: Option<JoinHandle<()>>,
    pub(super) shutdown_timeout: Duration,
    /// Set once a response was abandoned part-way; the stream is out of step
    pub(super) desynced: bool,
}

impl AgentProcess {
    /// Agent name this process serves
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS process id (also the process group id)
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Send one prompt and wait for its result line
    ///
    /// A malformed or oversized line leaves the rest of that response unread,
    /// so the process refuses every later exchange rather than hand the stale
    /// lines to the next request.
    ///
    /// # Errors
    /// Returns a transport-family error
    pub async fn exchange(&mut self, prompt: &str) -> Result<AgentResponse> {
        if self.child.is_none() {
            return Err(OrchestratorError::transport_closed(&self.name));
        }
        if self.desynced {
            return Err(OrchestratorError::transport(format!(
                "Output stream of agent '{}' is out of step after a malformed line",
                self.name
            )));
        }

        let result = self.transport.exchange(prompt).await;
        if let Err(OrchestratorError::Protocol { .. }) = &result {
            log::warn!("[{}] abandoning stream after protocol error", self.name);
            self.desynced = true;
        }
        result
    }

    /// Whether a malformed line has put the stream out of step
    #[must_use]
    pub fn is_desynced(&self) -> bool {
        self.desynced
    }
}

/// Find Claude Code CLI binary
///
/// # Errors
/// Returns error if CLI cannot be found in PATH or common locations
pub fn find_cli() -> Result<PathBuf> {
    if let Ok(path) = which::which("claude") {
        return Ok(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| String::from("/root"));
    let locations = [
        PathBuf::from(&home).join(".npm-global/bin/claude"),
        PathBuf::from("/usr/local/bin/claude"),
        PathBuf::from(&home).join(".local/bin/claude"),
        PathBuf::from(&home).join("node_modules/.bin/claude"),
        PathBuf::from(&home).join(".yarn/bin/claude"),
    ];

    locations
        .into_iter()
        .find(|path| path.is_file())
        .ok_or_else(OrchestratorError::cli_not_found)
}
