//! Wire message type definitions
//!
//! One JSON object per line in each direction. Outbound there is only the
//! user message; inbound lines are tagged by `type`, and `result` is the only
//! variant that ends an exchange.

use super::identifiers::SessionId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Outbound
// ============================================================================

/// Body of an outbound user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessageContent {
    /// Message role (always "user")
    pub role: String,
    /// Prompt text
    pub content: String,
}

/// Outbound line: `{"type":"user","message":{"role":"user","content":...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// User prompt
    User {
        /// Message body
        message: UserMessageContent,
    },
}

impl OutboundMessage {
    /// Build a user message carrying `content`
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            message: UserMessageContent {
                role: "user".to_string(),
                content: content.into(),
            },
        }
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// Terminal `result` line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultMessage {
    /// Result subtype (`success`, `error_max_turns`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Whether the agent reported an error
    #[serde(default)]
    pub is_error: bool,
    /// Number of conversation turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    /// Total duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Total cost in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    /// Session the agent is now on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Final response text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Decoded inbound line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// System line; the `init` subtype carries the initial session id
    System {
        /// System message subtype
        #[serde(default)]
        subtype: Option<String>,
        /// Session ID
        #[serde(default)]
        session_id: Option<SessionId>,
    },
    /// Intermediate assistant content
    Assistant {
        /// Session ID
        #[serde(default)]
        session_id: Option<SessionId>,
    },
    /// Terminal result
    Result(ResultMessage),
    /// Any other line type (tool results echoed as `user`, stream events)
    #[serde(other)]
    Other,
}

impl InboundMessage {
    /// Whether this line ends a receive
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

/// Everything read for one request, up to and including its result line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Parsed result line
    pub result: ResultMessage,
    /// Result line exactly as decoded
    pub raw: serde_json::Value,
    /// `system` lines seen before the result
    pub system: Vec<serde_json::Value>,
    /// `assistant` lines seen before the result
    pub assistant: Vec<serde_json::Value>,
}

impl AgentResponse {
    /// Result text, empty when the agent sent none
    #[must_use]
    pub fn text(&self) -> &str {
        self.result.result.as_deref().unwrap_or_default()
    }

    /// Session id reported by the result line
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.result.session_id.as_ref()
    }
}
