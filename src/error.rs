//! Error types for the Claude agent orchestrator

use thiserror::Error;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// An agent with this name is already registered
    #[error("Agent already exists: {0}")]
    AlreadyExists(String),

    /// No agent registered under this name
    #[error("Agent not found: {0}")]
    NotFound(String),

    /// Argument rejected before any process work happened
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Process I/O failure while talking to an agent
    #[error("Transport error: {0}")]
    Transport(String),

    /// The agent's output stream ended before a terminal `result` line
    #[error("Transport closed for agent '{agent}' before a result was received")]
    TransportClosed {
        /// Agent whose stream closed
        agent: String,
    },

    /// A line from the agent could not be decoded
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message
        message: String,
        /// Offending raw line, if one was read
        line: Option<String>,
    },

    /// A capacity guard refused the operation
    #[error("Limit exceeded: at most {0} live agents")]
    LimitExceeded(usize),

    /// Claude Code CLI not found or not installed
    #[error("Claude Code CLI not found: {0}")]
    CliNotFound(String),

    /// Launching the agent process failed
    #[error("Failed to spawn agent process: {0}")]
    Spawn(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode or decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification callers branch on to pick a recovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Name collision on spawn
    AlreadyExists,
    /// Unknown agent name
    NotFound,
    /// Rejected argument
    InvalidArgument,
    /// Process I/O, stream close, or malformed protocol line
    Transport,
    /// Capacity guard
    LimitExceeded,
}

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;

impl OrchestratorError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::LimitExceeded(_) => ErrorKind::LimitExceeded,
            Self::Transport(_)
            | Self::TransportClosed { .. }
            | Self::Protocol { .. }
            | Self::CliNotFound(_)
            | Self::Spawn(_)
            | Self::Io(_)
            | Self::Json(_) => ErrorKind::Transport,
        }
    }

    /// Create a CLI not found error
    #[must_use]
    pub fn cli_not_found() -> Self {
        Self::CliNotFound(
            "Claude Code not found. Install with:\n\
             npm install -g @anthropic-ai/claude-code\n\
             \n\
             Or set CLAUDE_ORCHESTRATOR_CLI to the binary path"
                .to_string(),
        )
    }

    /// Create an already-exists error
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists(name.into())
    }

    /// Create a not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a transport-closed error
    pub fn transport_closed(agent: impl Into<String>) -> Self {
        Self::TransportClosed {
            agent: agent.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>, line: Option<String>) -> Self {
        Self::Protocol {
            message: msg.into(),
            line,
        }
    }

    /// Create a spawn error
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    /// Whether this error belongs to the transport family
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
