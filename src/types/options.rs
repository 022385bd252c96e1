//! Per-agent spawn options
//!
//! Everything here ends up as startup arguments or environment for one agent
//! process. Orchestrator-wide settings live in [`super::config`].

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Permission mode for tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    /// Prompt for every sensitive tool
    Default,
    /// Auto-accept file edits
    AcceptEdits,
    /// Planning only
    Plan,
    /// Skip all permission checks
    BypassPermissions,
}

impl PermissionMode {
    /// CLI spelling of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::AcceptEdits => "acceptEdits",
            Self::Plan => "plan",
            Self::BypassPermissions => "bypassPermissions",
        }
    }
}

/// Upper bound accepted by [`SpawnOptionsBuilder::max_turns`]
pub const MAX_ALLOWED_TURNS: u32 = 1000;

/// Options for spawning one agent
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// Model selector, resolved through the model table
    pub model: Option<String>,
    /// Replacement system prompt
    pub system_prompt: Option<String>,
    /// Text appended to the default system prompt
    pub append_system_prompt: Option<String>,
    /// Tools the agent may use
    pub allowed_tools: Vec<String>,
    /// Tools the agent may not use
    pub disallowed_tools: Vec<String>,
    /// Permission mode for tool execution
    pub permission_mode: Option<PermissionMode>,
    /// Maximum turns per request
    pub max_turns: Option<u32>,
    /// Working directory, overriding the orchestrator default
    pub cwd: Option<PathBuf>,
    /// Additional directories to add to the context
    pub add_dirs: Vec<PathBuf>,
    /// Extra environment variables
    pub env: HashMap<String, String>,
}

impl SpawnOptions {
    /// Create a new builder for `SpawnOptions`
    #[must_use]
    pub fn builder() -> SpawnOptionsBuilder {
        SpawnOptionsBuilder::default()
    }

    /// Options that only select a model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Builder for SpawnOptions
// ============================================================================

/// Builder for `SpawnOptions`
#[derive(Debug, Default)]
pub struct SpawnOptionsBuilder {
    options: SpawnOptions,
}

impl SpawnOptionsBuilder {
    /// Set model selector
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options.model = Some(model.into());
        self
    }

    /// Set system prompt
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.options.system_prompt = Some(prompt.into());
        self
    }

    /// Append to the default system prompt
    #[must_use]
    pub fn append_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.options.append_system_prompt = Some(prompt.into());
        self
    }

    /// Set allowed tools
    #[must_use]
    pub fn allowed_tools(mut self, tools: Vec<impl Into<String>>) -> Self {
        self.options.allowed_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Set disallowed tools
    #[must_use]
    pub fn disallowed_tools(mut self, tools: Vec<impl Into<String>>) -> Self {
        self.options.disallowed_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Set permission mode
    #[must_use]
    pub const fn permission_mode(mut self, mode: PermissionMode) -> Self {
        self.options.permission_mode = Some(mode);
        self
    }

    /// Set max turns
    ///
    /// The CLI accepts at most [`MAX_ALLOWED_TURNS`] turns per request. A
    /// larger value is a programming error rather than input to validate, so
    /// the builder rejects it immediately. Callers taking the limit from user
    /// input should check it first or set [`SpawnOptions::max_turns`]
    /// directly.
    ///
    /// # Panics
    /// Panics if `turns` exceeds [`MAX_ALLOWED_TURNS`]
    #[must_use]
    pub fn max_turns(mut self, turns: u32) -> Self {
        assert!(
            turns <= MAX_ALLOWED_TURNS,
            "max_turns {turns} exceeds maximum allowed: {MAX_ALLOWED_TURNS}"
        );
        self.options.max_turns = Some(turns);
        self
    }

    /// Set working directory
    #[must_use]
    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.cwd = Some(path.into());
        self
    }

    /// Add a context directory
    #[must_use]
    pub fn add_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.add_dirs.push(path.into());
        self
    }

    /// Set an environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.env.insert(key.into(), value.into());
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> SpawnOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_turns_at_limit_is_accepted() {
        let options = SpawnOptions::builder().max_turns(MAX_ALLOWED_TURNS).build();
        assert_eq!(options.max_turns, Some(1000));
    }

    #[test]
    #[should_panic(expected = "exceeds maximum allowed")]
    fn max_turns_over_limit_panics() {
        let _ = SpawnOptions::builder().max_turns(MAX_ALLOWED_TURNS + 1);
    }
}
