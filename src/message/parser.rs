//! Line parser for agent stdout

use serde::Deserialize;

use crate::error::{OrchestratorError, Result};
use crate::types::messages::{InboundMessage, OutboundMessage};

/// One decoded inbound line
#[derive(Debug, Clone)]
pub struct ParsedLine {
    /// Typed view of the line
    pub message: InboundMessage,
    /// Line as decoded JSON
    pub raw: serde_json::Value,
}

/// Parse one line of agent output
///
/// # Errors
/// Returns `OrchestratorError::Protocol` when the line is not JSON, not an
/// object, or has no string `type` field.
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    let raw: serde_json::Value = serde_json::from_str(line).map_err(|e| {
        OrchestratorError::protocol(format!("Malformed JSON line: {e}"), Some(line.to_string()))
    })?;

    if !raw.get("type").is_some_and(serde_json::Value::is_string) {
        return Err(OrchestratorError::protocol(
            "Line has no string `type` field",
            Some(line.to_string()),
        ));
    }

    let message = InboundMessage::deserialize(&raw).map_err(|e| {
        OrchestratorError::protocol(
            format!("Failed to decode message: {e}"),
            Some(line.to_string()),
        )
    })?;

    Ok(ParsedLine { message, raw })
}

/// Serialize a user message as one newline-terminated line
///
/// # Errors
/// Returns `OrchestratorError::Json` if serialization fails
pub fn encode_user_message(content: &str) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(&OutboundMessage::user(content))?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_line_is_terminal() {
        let parsed = parse_line(
            r#"{"type":"result","subtype":"success","is_error":false,"session_id":"s1","result":"4"}"#,
        )
        .unwrap();
        assert!(parsed.message.is_terminal());
        match parsed.message {
            InboundMessage::Result(result) => {
                assert_eq!(result.result.as_deref(), Some("4"));
                assert_eq!(result.session_id.unwrap().as_str(), "s1");
            }
            other => panic!("expected result, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_decodes_as_other() {
        let parsed = parse_line(r#"{"type":"stream_event","event":{}}"#).unwrap();
        assert!(matches!(parsed.message, InboundMessage::Other));
    }

    #[test]
    fn malformed_json_keeps_the_line() {
        let err = parse_line("not json {").unwrap_err();
        match err {
            OrchestratorError::Protocol { line, .. } => assert_eq!(line.as_deref(), Some("not json {")),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn missing_type_is_rejected() {
        assert!(parse_line(r#"{"session_id":"s1"}"#).is_err());
        assert!(parse_line("[1,2]").is_err());
    }

    #[test]
    fn user_message_encoding() {
        let bytes = encode_user_message("hello").unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "{\"type\":\"user\",\"message\":{\"role\":\"user\",\"content\":\"hello\"}}\n"
        );
    }
}
