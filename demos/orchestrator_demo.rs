//! Fork-and-fan-out walkthrough against a real Claude Code CLI
//!
//! Builds shared context in one agent, forks two reviewers from it, asks
//! both asynchronously, relays one answer to the other and prints an audit
//! trail. Set `CLAUDE_ORCHESTRATOR_CLI` to point at a specific binary.
//!
//! ```text
//! RUST_LOG=info cargo run --example orchestrator_demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use kodegen_claude_orchestrator::{
    AgentManager, JsonlAuditSink, OrchestratorConfig, RequestStatus, SpawnOptions,
};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let audit_dir = tempfile::tempdir()?;
    let audit = Arc::new(JsonlAuditSink::open(audit_dir.path().join("audit.jsonl"))?);
    let manager =
        AgentManager::with_config(OrchestratorConfig::from_env()).with_audit_sink(audit.clone());

    let result = run(&manager).await;
    manager.shutdown().await;

    let trail = std::fs::read_to_string(audit.path())?;
    info!("Audit trail:\n{trail}");
    result
}

async fn run(manager: &AgentManager) -> Result<()> {
    manager
        .spawn("base", SpawnOptions::with_model("haiku"))
        .await
        .context("spawning base agent")?;

    let primer = manager
        .ask(
            "base",
            "You are reviewing a small Rust crate that manages subprocesses. \
             Reply with one sentence confirming you are ready.",
        )
        .await?;
    info!("base: {primer}");

    for name in ["safety", "style"] {
        let info = manager.fork("base", name, SpawnOptions::default()).await?;
        info!("forked {} from {:?}", info.name, info.forked_from);
    }

    let safety = manager.ask_async("safety", "Name one process-safety pitfall in one line.")?;
    let style = manager.ask_async("style", "Name one API-style pitfall in one line.")?;

    let safety = manager.wait_response(&safety, Duration::from_secs(120)).await;
    if safety.status != RequestStatus::Complete {
        bail!("safety reviewer finished with {:?}: {:?}", safety.status, safety.error);
    }
    let safety_text = safety.result.unwrap_or_default();
    info!("safety: {safety_text}");

    let relayed = manager.relay(
        "safety",
        "style",
        &format!("Your colleague said: {safety_text}. Do you agree? One line."),
    )?;

    let style = manager.wait_response_default(&style).await;
    info!("style: {:?}", style.result);
    let relayed = manager.wait_response_default(&relayed).await;
    info!("style on safety: {:?}", relayed.result);

    let replies = manager.broadcast(Some("base"), "Say goodbye in three words.");
    for (name, id) in replies {
        let record = manager.wait_response_default(&id).await;
        info!("{name}: {:?}", record.result);
    }

    for agent in manager.list() {
        info!(
            "{} requests={} session={:?}",
            agent.name, agent.request_count, agent.session_id
        );
    }

    Ok(())
}
