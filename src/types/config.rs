//! Orchestrator-wide configuration

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum accepted protocol line (1MB)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Default `wait_response` poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default observer timeout for `wait_response_default`
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default time `kill` waits for a worker to reap its process
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable naming the agent binary
pub const ENV_CLI_PATH: &str = "CLAUDE_ORCHESTRATOR_CLI";

/// Environment variable capping live agents
pub const ENV_MAX_AGENTS: &str = "CLAUDE_ORCHESTRATOR_MAX_AGENTS";

/// Settings shared by every agent an [`AgentManager`](crate::AgentManager) runs
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Path to the agent binary (searched for when `None`)
    pub cli_path: Option<PathBuf>,
    /// Maximum number of live agents
    pub max_agents: Option<usize>,
    /// Poll period for `wait_response`
    pub poll_interval: Duration,
    /// Timeout for `wait_response_default`
    pub default_wait_timeout: Duration,
    /// Longest protocol line accepted from an agent
    pub max_line_length: usize,
    /// How long `kill` waits for the process to be reaped
    pub shutdown_timeout: Duration,
    /// Default working directory for agents
    pub cwd: Option<PathBuf>,
    /// Environment applied to every agent
    pub env: HashMap<String, String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cli_path: None,
            max_agents: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_wait_timeout: DEFAULT_WAIT_TIMEOUT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            cwd: None,
            env: HashMap::new(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new builder for `OrchestratorConfig`
    #[must_use]
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Defaults overridden by `CLAUDE_ORCHESTRATOR_*` environment variables
    ///
    /// An unparsable agent cap is ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(ENV_CLI_PATH)
            && !path.trim().is_empty()
        {
            config.cli_path = Some(PathBuf::from(path));
        }

        if let Ok(raw) = std::env::var(ENV_MAX_AGENTS) {
            match raw.trim().parse::<usize>() {
                Ok(max) => config.max_agents = Some(max),
                Err(e) => log::warn!("Ignoring {ENV_MAX_AGENTS}={raw:?}: {e}"),
            }
        }

        config
    }
}

// ============================================================================
// Builder for OrchestratorConfig
// ============================================================================

/// Builder for `OrchestratorConfig`
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    /// Set the agent binary path
    #[must_use]
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cli_path = Some(path.into());
        self
    }

    /// Cap the number of live agents
    #[must_use]
    pub const fn max_agents(mut self, max: usize) -> Self {
        self.config.max_agents = Some(max);
        self
    }

    /// Set the `wait_response` poll interval
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the default observer timeout
    #[must_use]
    pub const fn default_wait_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_wait_timeout = timeout;
        self
    }

    /// Set the longest accepted protocol line
    #[must_use]
    pub const fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    /// Set how long `kill` waits for the process to be reaped
    #[must_use]
    pub const fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Set the default working directory
    #[must_use]
    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cwd = Some(path.into());
        self
    }

    /// Set an environment variable for every agent
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.insert(key.into(), value.into());
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.max_line_length, 1024 * 1024);
        assert!(config.max_agents.is_none());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = OrchestratorConfig::builder()
            .cli_path("/opt/claude")
            .max_agents(4)
            .poll_interval(Duration::from_millis(10))
            .env("FOO", "bar")
            .build();
        assert_eq!(config.cli_path, Some(PathBuf::from("/opt/claude")));
        assert_eq!(config.max_agents, Some(4));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.env.get("FOO").map(String::as_str), Some("bar"));
    }
}
