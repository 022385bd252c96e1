//! Structured audit events for agent lifecycle and routing
//!
//! Every spawn, fork, kill and relay produces one [`AuditEvent`]. The
//! orchestrator only needs somewhere to write them; [`AuditSink`] is that
//! capability. Three sinks ship with the crate:
//!
//! - [`LogAuditSink`] - one `log::info!` line per event (default)
//! - [`JsonlAuditSink`] - append-only JSON Lines file
//! - [`MemoryAuditSink`] - in-memory buffer for inspection

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Audited operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    /// Fresh agent spawn
    Spawn,
    /// Agent resumed from a session
    Fork,
    /// Agent killed
    Kill,
    /// Message relayed between agents
    Relay,
}

/// Outcome of an audited operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Operation succeeded
    Ok,
    /// Operation failed
    Error {
        /// Failure message
        message: String,
    },
}

/// One audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the operation finished
    pub timestamp: DateTime<Utc>,
    /// What was done
    pub operation: AuditOperation,
    /// Agent the operation targeted
    pub agent: String,
    /// Model selector, when relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Result of the operation
    pub outcome: AuditOutcome,
    /// Operation-specific fields (source session, relay origin, request id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl AuditEvent {
    /// New event stamped with the current time
    pub fn new(
        operation: AuditOperation,
        agent: impl Into<String>,
        model: Option<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            agent: agent.into(),
            model,
            outcome,
            detail: None,
        }
    }

    /// Attach operation-specific detail
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Outcome derived from an operation result
    pub fn outcome_of<T>(result: &Result<T>) -> AuditOutcome {
        match result {
            Ok(_) => AuditOutcome::Ok,
            Err(e) => AuditOutcome::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Destination for audit events
///
/// Implementations must not block for long; they run inline with the
/// operation being audited.
pub trait AuditSink: Send + Sync {
    /// Record one event
    ///
    /// # Errors
    /// Returns error if the event could not be written. The orchestrator
    /// logs the failure and carries on.
    fn record(&self, event: &AuditEvent) -> Result<()>;
}

// ============================================================================
// Log sink
// ============================================================================

/// Writes each event as a JSON `log::info!` line under the `audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<()> {
        log::info!(target: "audit", "{}", serde_json::to_string(event)?);
        Ok(())
    }
}

// ============================================================================
// JSONL file sink
// ============================================================================

/// Append-only JSON Lines file, flushed after every event
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open (or create) `path` for appending, creating parent directories
    ///
    /// # Errors
    /// Returns error if the directory or file cannot be created
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    /// Path of the log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Memory sink
// ============================================================================

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;

    #[test]
    fn jsonl_sink_appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("audit.jsonl");
        let sink = JsonlAuditSink::open(&path).unwrap();

        sink.record(&AuditEvent::new(
            AuditOperation::Spawn,
            "base",
            Some("opus".into()),
            AuditOutcome::Ok,
        ))
        .unwrap();
        sink.record(
            &AuditEvent::new(AuditOperation::Kill, "base", None, AuditOutcome::Ok)
                .with_detail(serde_json::json!({"pid": 42})),
        )
        .unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["operation"], "spawn");
        assert_eq!(lines[0]["outcome"]["status"], "ok");
        assert_eq!(lines[1]["detail"]["pid"], 42);
    }

    #[test]
    fn error_outcome_carries_message() {
        let result: Result<()> = Err(OrchestratorError::already_exists("base"));
        let outcome = AuditEvent::outcome_of(&result);
        assert_eq!(
            outcome,
            AuditOutcome::Error {
                message: "Agent already exists: base".into()
            }
        );
    }
}
