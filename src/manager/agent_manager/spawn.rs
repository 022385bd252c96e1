//! Agent spawning logic
//!
//! Handles fresh spawns, spawns that resume an existing session, and forks.

use std::path::PathBuf;

use serde_json::json;

use crate::audit::{AuditEvent, AuditOperation, AuditOutcome};
use crate::error::{OrchestratorError, Result};
use crate::transport::{AgentProcess, find_cli};
use crate::types::agent::AgentInfo;
use crate::types::identifiers::SessionId;
use crate::types::options::SpawnOptions;

use super::super::background::start_agent;
use super::core::AgentManager;

impl AgentManager {
    /// Spawn a fresh agent
    ///
    /// Launches the agent process and registers it under `name` with no
    /// session id.
    ///
    /// # Errors
    /// `AlreadyExists` if `name` is taken, `LimitExceeded` at capacity,
    /// `CliNotFound`/`Spawn` if the process cannot be launched
    pub async fn spawn(&self, name: &str, options: SpawnOptions) -> Result<AgentInfo> {
        let model = options.model.clone();
        let result = self.launch(name, &options, None);

        self.audit(AuditEvent::new(
            AuditOperation::Spawn,
            name,
            model,
            AuditEvent::outcome_of(&result),
        ));

        result
    }

    /// Spawn an agent that resumes the conversation behind `session_id`
    ///
    /// The new agent starts with `session_id` as both its current session and
    /// its `forked_from` marker.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank session id, plus every error of
    /// [`spawn`](Self::spawn)
    pub async fn spawn_from_session(
        &self,
        name: &str,
        session_id: impl Into<SessionId>,
        options: SpawnOptions,
    ) -> Result<AgentInfo> {
        let session_id = session_id.into();
        let model = options.model.clone();

        let result = if session_id.is_blank() {
            Err(OrchestratorError::invalid_argument(
                "Cannot resume from an empty session id",
            ))
        } else {
            self.launch(name, &options, Some(&session_id))
        };

        self.audit(
            AuditEvent::new(
                AuditOperation::Fork,
                name,
                model,
                AuditEvent::outcome_of(&result),
            )
            .with_detail(json!({ "session_id": session_id.as_str() })),
        );

        result
    }

    /// Branch `new_name` off `source`'s current session
    ///
    /// The fork inherits the source's model unless `options` names one.
    ///
    /// # Errors
    /// `NotFound` if `source` is not registered, `InvalidArgument` if it has
    /// not completed a request yet, plus every error of
    /// [`spawn`](Self::spawn)
    pub async fn fork(
        &self,
        source: &str,
        new_name: &str,
        mut options: SpawnOptions,
    ) -> Result<AgentInfo> {
        let parent = match self.registry.get(source) {
            Ok(agent) => agent,
            Err(e) => return Err(self.fork_failed(source, new_name, options.model, e)),
        };

        let Some(session_id) = parent.session_id() else {
            let err = OrchestratorError::invalid_argument(format!(
                "Agent '{source}' has no session yet; ask it something before forking"
            ));
            return Err(self.fork_failed(source, new_name, options.model, err));
        };

        if options.model.is_none() {
            options.model = parent.model.clone();
        }

        log::debug!("Forking '{new_name}' from '{source}' at session {session_id}");
        self.spawn_from_session(new_name, session_id, options).await
    }

    fn fork_failed(
        &self,
        source: &str,
        new_name: &str,
        model: Option<String>,
        err: OrchestratorError,
    ) -> OrchestratorError {
        self.audit(
            AuditEvent::new(
                AuditOperation::Fork,
                new_name,
                model,
                AuditOutcome::Error {
                    message: err.to_string(),
                },
            )
            .with_detail(json!({ "source": source })),
        );
        err
    }

    /// Launch a process and register it, atomically with respect to `name`
    fn launch(
        &self,
        name: &str,
        options: &SpawnOptions,
        resume: Option<&SessionId>,
    ) -> Result<AgentInfo> {
        if name.trim().is_empty() {
            return Err(OrchestratorError::invalid_argument(
                "Agent name must not be empty",
            ));
        }

        let cli_path: PathBuf = match &self.config.cli_path {
            Some(path) => path.clone(),
            None => find_cli()?,
        };

        let agent = self.registry.insert_with(name, || {
            let process = AgentProcess::spawn(name, &cli_path, options, resume, &self.config)?;
            Ok(start_agent(
                process,
                options.model.clone(),
                resume.cloned(),
            ))
        })?;

        let info = agent.info();
        log::info!(
            "Spawned agent '{}' (pid {:?}, model {:?}{})",
            info.name,
            info.pid,
            info.resolved_model,
            resume.map(|s| format!(", resuming {s}")).unwrap_or_default()
        );
        Ok(info)
    }
}
