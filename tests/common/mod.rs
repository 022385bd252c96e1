//! Shared fixtures for integration tests
//!
//! Tests drive the manager against a small shell script that speaks the
//! stream-json line protocol:
//!
//! - prints a `system` init line on startup
//! - answers each user line with an `assistant` line and a `result` line
//!   whose text is `echo: <content>` and whose session id is
//!   `sess-<pid>-<n>`
//! - records the `--resume` argument it was started with as `resumed_from`
//! - `die` exits without answering, `nosession` answers without a session
//!   id, `sleep:<secs>` delays the answer, `garbled` prints a malformed line
//!   before its normal answer

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use kodegen_claude_orchestrator::{
    AgentManager, MemoryAuditSink, OrchestratorConfig, OrchestratorConfigBuilder, PendingRequest,
    RequestId,
};
use tempfile::TempDir;

const FAKE_AGENT: &str = r#"#!/bin/sh
resumed=""
while [ $# -gt 0 ]; do
  case "$1" in
    --resume) resumed="$2"; shift ;;
  esac
  shift
done

printf '%s\n' "{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"init-$$\"}"

n=0
while IFS= read -r line; do
  [ -z "$line" ] && continue
  n=$((n + 1))
  content=$(printf '%s' "$line" | sed -n 's/.*"content":"\(.*\)"}}$/\1/p')
  case "$content" in
    die) exit 0 ;;
    sleep:*) sleep "${content#sleep:}" ;;
    garbled) printf '%s\n' '{bad' ;;
    *) sleep 0.05 ;;
  esac
  printf '%s\n' "{\"type\":\"assistant\",\"session_id\":\"sess-$$-$n\",\"message\":{\"role\":\"assistant\",\"content\":[{\"type\":\"text\",\"text\":\"$content\"}]}}"
  if [ "$content" = "nosession" ]; then
    printf '%s\n' "{\"type\":\"result\",\"subtype\":\"success\",\"is_error\":false,\"result\":\"echo: $content\"}"
  else
    printf '%s\n' "{\"type\":\"result\",\"subtype\":\"success\",\"is_error\":false,\"num_turns\":$n,\"session_id\":\"sess-$$-$n\",\"result\":\"echo: $content\",\"resumed_from\":\"$resumed\"}"
  fi
done
"#;

struct FakeAgent {
    _dir: TempDir,
    path: PathBuf,
}

static FAKE: OnceLock<FakeAgent> = OnceLock::new();

/// Initialize test logging once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Path to the fake agent script
///
/// Written once per test binary, before any test spawns a process, so no
/// child can inherit the script's write handle.
pub fn fake_cli() -> &'static Path {
    &FAKE
        .get_or_init(|| {
            use std::os::unix::fs::PermissionsExt;

            let dir = tempfile::tempdir().expect("create temp dir");
            let path = dir.path().join("fake-claude");
            std::fs::write(&path, FAKE_AGENT).expect("write fake agent");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod fake agent");
            FakeAgent { _dir: dir, path }
        })
        .path
}

/// Config pointing at the fake agent with short timings
pub fn config() -> OrchestratorConfigBuilder {
    OrchestratorConfig::builder()
        .cli_path(fake_cli())
        .poll_interval(Duration::from_millis(10))
        .shutdown_timeout(Duration::from_secs(2))
}

/// Manager backed by the fake agent
pub fn manager() -> AgentManager {
    init_logging();
    AgentManager::with_config(config().build())
}

/// Manager backed by the fake agent, auditing into memory
pub fn manager_with_audit() -> (AgentManager, Arc<MemoryAuditSink>) {
    init_logging();
    let sink = Arc::new(MemoryAuditSink::new());
    let manager = AgentManager::with_config(config().build()).with_audit_sink(sink.clone());
    (manager, sink)
}

/// Wait generously for a request to finish
pub async fn wait_done(manager: &AgentManager, id: &RequestId) -> PendingRequest {
    manager.wait_response(id, Duration::from_secs(10)).await
}
