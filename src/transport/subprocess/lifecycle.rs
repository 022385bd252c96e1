//! Lifecycle management for agent processes (spawn, terminate)

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{OrchestratorError, Result};
use crate::transport::line::LineTransport;
use crate::types::config::OrchestratorConfig;
use crate::types::identifiers::SessionId;
use crate::types::options::SpawnOptions;

use super::command::CommandBuilder;
use super::process::AgentProcess;

impl AgentProcess {
    /// Launch an agent process in its own process group
    ///
    /// Does not block; must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns `OrchestratorError::Spawn` if the process cannot be started or
    /// its stdio handles cannot be obtained
    pub fn spawn(
        name: &str,
        cli_path: &Path,
        options: &SpawnOptions,
        resume: Option<&SessionId>,
        config: &OrchestratorConfig,
    ) -> Result<Self> {
        let mut cmd = CommandBuilder::new(cli_path, options)
            .resume(resume)
            .base_env(&config.env)
            .default_cwd(config.cwd.as_deref())
            .build();

        // Pipe stderr rather than inherit it so the child cannot touch the
        // parent terminal.
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|e| {
            OrchestratorError::spawn(format!("{}: {e}", cli_path.display()))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| OrchestratorError::spawn("Failed to get stdin handle"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| OrchestratorError::spawn("Failed to get stdout handle"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| OrchestratorError::spawn("Failed to get stderr handle"))?;

        // Drain stderr so the child never blocks on a full pipe
        let tag = name.to_string();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::debug!("[{tag}] stderr: {line}");
            }
        });

        let pid = child.id();
        log::debug!("Spawned agent '{}' (pid {:?})", name, pid);

        Ok(Self {
            name: name.to_string(),
            pid,
            child: Some(child),
            transport: LineTransport::new(name, stdin, stdout, config.max_line_length),
            stderr_task: Some(stderr_task),
            shutdown_timeout: config.shutdown_timeout,
            desynced: false,
        })
    }

    /// Close stdin, kill the process group and reap the child
    ///
    /// Safe to call more than once; errors from an already-dead process are
    /// ignored.
    pub async fn close(&mut self) {
        self.transport.shutdown_input().await;
        self.terminate();

        if let Some(mut child) = self.child.take() {
            match tokio::time::timeout(self.shutdown_timeout, child.wait()).await {
                Ok(Ok(status)) => log::debug!("Agent '{}' exited: {}", self.name, status),
                Ok(Err(e)) => log::debug!("Agent '{}' wait failed: {}", self.name, e),
                Err(_) => {
                    log::warn!(
                        "Agent '{}' not reaped within {:?}",
                        self.name,
                        self.shutdown_timeout
                    );
                    let _ = child.start_kill();
                }
            }
        }

        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }
    }

    /// Send SIGKILL to the whole process group, once
    fn terminate(&mut self) {
        #[cfg(unix)]
        if let Some(pid) = self.pid.take() {
            kill_process_group(pid);
        }

        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
    }
}

impl Drop for AgentProcess {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.terminate();
        }
        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }
    }
}

/// Kill every process in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };

    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("killpg({pid}) failed: {e}"),
    }
}
