//! CLI command building logic for agent processes

use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;

use crate::types::identifiers::SessionId;
use crate::types::models::resolve_model;
use crate::types::options::SpawnOptions;

use super::config::{BASE_ARGS, DANGEROUS_ENV_VARS, ENTRYPOINT_ENV};

/// Command builder for one agent process
pub struct CommandBuilder<'a> {
    cli_path: &'a Path,
    options: &'a SpawnOptions,
    resume: Option<&'a SessionId>,
    base_env: Option<&'a HashMap<String, String>>,
    default_cwd: Option<&'a Path>,
}

impl<'a> CommandBuilder<'a> {
    /// Create a new command builder
    pub fn new(cli_path: &'a Path, options: &'a SpawnOptions) -> Self {
        Self {
            cli_path,
            options,
            resume: None,
            base_env: None,
            default_cwd: None,
        }
    }

    /// Resume the conversation identified by `session_id`
    #[must_use]
    pub fn resume(mut self, session_id: Option<&'a SessionId>) -> Self {
        self.resume = session_id;
        self
    }

    /// Environment applied before the per-agent variables
    #[must_use]
    pub fn base_env(mut self, env: &'a HashMap<String, String>) -> Self {
        self.base_env = Some(env);
        self
    }

    /// Working directory used when the options name none
    #[must_use]
    pub fn default_cwd(mut self, cwd: Option<&'a Path>) -> Self {
        self.default_cwd = cwd;
        self
    }

    /// Startup arguments, in order
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|a| (*a).to_string()).collect();

        if let Some(ref model) = self.options.model {
            args.push("--model".to_string());
            args.push(resolve_model(model));
        }

        if let Some(session_id) = self.resume {
            args.push("--resume".to_string());
            args.push(session_id.as_str().to_string());
        }

        self.add_prompt_args(&mut args);
        self.add_tool_args(&mut args);
        self.add_configuration_args(&mut args);

        args
    }

    /// Build the complete command with arguments, environment and cwd
    pub fn build(&self) -> Command {
        let mut cmd = Command::new(self.cli_path);
        cmd.args(self.args());

        for (key, value) in self.base_env.into_iter().flatten().chain(&self.options.env) {
            if DANGEROUS_ENV_VARS.contains(&key.as_str()) {
                log::warn!("Refusing to pass environment variable {key} to agent");
                continue;
            }
            cmd.env(key, value);
        }
        cmd.env(ENTRYPOINT_ENV.0, ENTRYPOINT_ENV.1);

        if let Some(cwd) = self.options.cwd.as_deref().or(self.default_cwd) {
            cmd.current_dir(cwd);
        }

        cmd
    }

    fn add_prompt_args(&self, args: &mut Vec<String>) {
        if let Some(ref prompt) = self.options.system_prompt {
            args.push("--system-prompt".to_string());
            args.push(prompt.clone());
        }

        if let Some(ref append) = self.options.append_system_prompt {
            args.push("--append-system-prompt".to_string());
            args.push(append.clone());
        }
    }

    fn add_tool_args(&self, args: &mut Vec<String>) {
        if !self.options.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(self.options.allowed_tools.join(","));
        }

        if !self.options.disallowed_tools.is_empty() {
            args.push("--disallowedTools".to_string());
            args.push(self.options.disallowed_tools.join(","));
        }
    }

    fn add_configuration_args(&self, args: &mut Vec<String>) {
        if let Some(mode) = self.options.permission_mode {
            args.push("--permission-mode".to_string());
            args.push(mode.as_str().to_string());
        }

        if let Some(max_turns) = self.options.max_turns {
            args.push("--max-turns".to_string());
            args.push(max_turns.to_string());
        }

        for dir in &self.options.add_dirs {
            args.push("--add-dir".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
    }
}
