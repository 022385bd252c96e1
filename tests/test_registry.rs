//! Agent lifecycle tests
//!
//! Spawn, ask, kill and capacity behavior against the fake agent.

#![cfg(unix)]

mod common;

use std::time::Duration;

use kodegen_claude_orchestrator::{
    AgentManager, AgentStatus, AuditOperation, AuditOutcome, ErrorKind, KillStatus,
    OrchestratorConfig, OrchestratorError, SpawnOptions,
};

#[tokio::test]
async fn test_duplicate_spawn_is_rejected() {
    let manager = common::manager();

    let info = manager.spawn("a", SpawnOptions::default()).await.unwrap();
    assert_eq!(info.name, "a");
    assert!(info.session_id.is_none());
    assert!(info.pid.is_some());

    let err = manager.spawn("a", SpawnOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let names: Vec<String> = manager.list().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["a".to_string()]);

    manager.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_spawns_of_one_name() {
    let manager = common::manager();

    let (first, second) = tokio::join!(
        manager.spawn("same", SpawnOptions::default()),
        manager.spawn("same", SpawnOptions::default()),
    );
    assert_eq!(u8::from(first.is_ok()) + u8::from(second.is_ok()), 1);
    assert_eq!(manager.list().len(), 1);

    manager.shutdown().await;
}

#[tokio::test]
async fn test_ask_updates_session_and_count() {
    let manager = common::manager();
    manager.spawn("counter", SpawnOptions::default()).await.unwrap();

    let mut last_session = None;
    for i in 1..=3u64 {
        let answer = manager.ask("counter", &format!("hello {i}")).await.unwrap();
        assert_eq!(answer, format!("echo: hello {i}"));

        let info = manager.agent_info("counter").unwrap();
        assert_eq!(info.request_count, i);
        assert!(info.session_id.is_some());
        assert_ne!(info.session_id, last_session);
        last_session = info.session_id;
    }

    manager.shutdown().await;
}

#[tokio::test]
async fn test_ask_full_collects_side_lines() {
    let manager = common::manager();
    manager.spawn("full", SpawnOptions::default()).await.unwrap();

    let response = manager.ask_full("full", "details").await.unwrap();
    assert_eq!(response.text(), "echo: details");
    assert_eq!(response.result.num_turns, Some(1));
    assert_eq!(response.system.len(), 1);
    assert_eq!(response.system[0]["subtype"], "init");
    assert_eq!(response.assistant.len(), 1);
    assert_eq!(response.raw["type"], "result");

    let second = manager.ask_full("full", "again").await.unwrap();
    assert!(second.system.is_empty());

    manager.shutdown().await;
}

#[tokio::test]
async fn test_kill_frees_name() {
    let manager = common::manager();
    manager.spawn("victim", SpawnOptions::default()).await.unwrap();

    let response = manager.kill("victim").await.unwrap();
    assert_eq!(response.name, "victim");
    assert_eq!(response.status, KillStatus::Killed);
    assert!(!manager.exists("victim"));
    assert!(manager.list().is_empty());

    let err = manager.ask("victim", "anyone?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = manager.kill("victim").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    manager.spawn("victim", SpawnOptions::default()).await.unwrap();
    assert_eq!(manager.ask("victim", "back").await.unwrap(), "echo: back");

    manager.shutdown().await;
}

#[tokio::test]
async fn test_kill_during_ask_fails_request() {
    let manager = common::manager();
    manager.spawn("slow", SpawnOptions::default()).await.unwrap();

    let asker = manager.clone();
    let in_flight = tokio::spawn(async move { asker.ask("slow", "sleep:5").await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    manager.kill("slow").await.unwrap();

    let err = in_flight.await.unwrap().unwrap_err();
    assert!(matches!(err, OrchestratorError::TransportClosed { .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_agent_limit() {
    common::init_logging();
    let manager = AgentManager::with_config(common::config().max_agents(2).build());

    manager.spawn("one", SpawnOptions::default()).await.unwrap();
    manager.spawn("two", SpawnOptions::default()).await.unwrap();

    let err = manager.spawn("three", SpawnOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    assert!(!manager.exists("three"));

    manager.kill("one").await.unwrap();
    manager.spawn("three", SpawnOptions::default()).await.unwrap();

    manager.shutdown().await;
}

#[tokio::test]
async fn test_spawn_validation() {
    let manager = common::manager();

    let err = manager.spawn("  ", SpawnOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let missing = AgentManager::with_config(
        OrchestratorConfig::builder()
            .cli_path("/nonexistent/bin/claude")
            .build(),
    );
    let err = missing.spawn("ghost", SpawnOptions::default()).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Spawn(_)));
    assert!(!missing.exists("ghost"));
}

#[tokio::test]
async fn test_result_without_session_is_protocol_error() {
    let manager = common::manager();
    manager.spawn("quiet", SpawnOptions::default()).await.unwrap();
    manager.ask("quiet", "first").await.unwrap();
    let before = manager.agent_info("quiet").unwrap();

    let err = manager.ask("quiet", "nosession").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Protocol { .. }));

    let after = manager.agent_info("quiet").unwrap();
    assert_eq!(after.request_count, before.request_count);
    assert_eq!(after.session_id, before.session_id);

    manager.shutdown().await;
}

#[tokio::test]
async fn test_malformed_line_retires_stream() {
    let manager = common::manager();
    manager.spawn("noisy", SpawnOptions::default()).await.unwrap();
    manager.ask("noisy", "first").await.unwrap();

    let err = manager.ask("noisy", "garbled").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Protocol { .. }));
    assert_eq!(manager.agent_info("noisy").unwrap().status, AgentStatus::Exited);

    // The unread answer to "garbled" must never surface as a later reply
    let next = manager.ask("noisy", "second").await;
    assert!(!matches!(next.as_deref(), Ok("echo: garbled")));
    assert_eq!(next.unwrap_err().kind(), ErrorKind::Transport);

    assert_eq!(manager.agent_info("noisy").unwrap().request_count, 1);
    manager.kill("noisy").await.unwrap();
}

#[tokio::test]
async fn test_missing_session_keeps_stream_usable() {
    let manager = common::manager();
    manager.spawn("terse", SpawnOptions::default()).await.unwrap();

    manager.ask("terse", "nosession").await.unwrap_err();
    assert_eq!(manager.agent_info("terse").unwrap().status, AgentStatus::Running);
    assert_eq!(manager.ask("terse", "after").await.unwrap(), "echo: after");

    manager.shutdown().await;
}

#[tokio::test]
async fn test_dead_agent_stays_registered_as_exited() {
    let manager = common::manager();
    manager.spawn("mortal", SpawnOptions::default()).await.unwrap();

    let err = manager.ask("mortal", "die").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let info = manager.agent_info("mortal").unwrap();
    assert_eq!(info.status, AgentStatus::Exited);

    let err = manager.ask("mortal", "still there?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    manager.kill("mortal").await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_is_audited() {
    let (manager, audit) = common::manager_with_audit();

    manager.spawn("watched", SpawnOptions::with_model("opus")).await.unwrap();
    let _ = manager.spawn("watched", SpawnOptions::default()).await;
    manager.kill("watched").await.unwrap();

    let events = audit.events();
    let ops: Vec<AuditOperation> = events.iter().map(|e| e.operation).collect();
    assert_eq!(
        ops,
        vec![AuditOperation::Spawn, AuditOperation::Spawn, AuditOperation::Kill]
    );
    assert_eq!(events[0].model.as_deref(), Some("opus"));
    assert_eq!(events[0].outcome, AuditOutcome::Ok);
    assert!(matches!(events[1].outcome, AuditOutcome::Error { .. }));
    assert!(events.iter().all(|e| e.agent == "watched"));
}

#[tokio::test]
async fn test_spawn_resolves_model() {
    let manager = common::manager();

    let info = manager.spawn("m", SpawnOptions::with_model("Sonnet")).await.unwrap();
    assert_eq!(info.model.as_deref(), Some("Sonnet"));
    assert_eq!(info.resolved_model.as_deref(), Some("claude-sonnet-4-5-20250929"));

    let info = manager
        .spawn("custom", SpawnOptions::with_model("my-private-model"))
        .await
        .unwrap();
    assert_eq!(info.resolved_model.as_deref(), Some("my-private-model"));

    manager.shutdown().await;
}
