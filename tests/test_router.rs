//! Relay and broadcast tests

#![cfg(unix)]

mod common;

use std::collections::HashSet;

use kodegen_claude_orchestrator::{
    AuditOperation, ErrorKind, RequestId, RequestStatus, SpawnOptions,
};

#[tokio::test]
async fn test_broadcast_then_kill_all() {
    let manager = common::manager();
    for name in ["a", "b", "c"] {
        manager.spawn(name, SpawnOptions::default()).await.unwrap();
    }

    let ids = manager.broadcast(None, "ping");
    assert_eq!(ids.len(), 3);
    let distinct: HashSet<&RequestId> = ids.values().collect();
    assert_eq!(distinct.len(), 3);

    for (name, id) in &ids {
        let record = common::wait_done(&manager, id).await;
        assert_eq!(record.status, RequestStatus::Complete);
        assert_eq!(&record.agent_name, name);
        assert_eq!(record.result.as_deref(), Some("echo: ping"));
    }

    let mut killed = manager.kill_all().await.killed;
    killed.sort();
    assert_eq!(killed, vec!["a", "b", "c"]);
    assert!(manager.list().is_empty());
}

#[tokio::test]
async fn test_broadcast_excludes_sender() {
    let manager = common::manager();
    for name in ["lead", "w1", "w2"] {
        manager.spawn(name, SpawnOptions::default()).await.unwrap();
    }

    let ids = manager.broadcast(Some("lead"), "status?");
    let names: Vec<&str> = ids.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["w1", "w2"]);

    manager.shutdown().await;
}

#[tokio::test]
async fn test_broadcast_with_no_agents() {
    let manager = common::manager();
    assert!(manager.broadcast(None, "anyone?").is_empty());
    assert!(manager.kill_all().await.killed.is_empty());
}

#[tokio::test]
async fn test_relay_forwards_message() {
    let (manager, audit) = common::manager_with_audit();
    manager.spawn("research", SpawnOptions::default()).await.unwrap();
    manager.spawn("writer", SpawnOptions::default()).await.unwrap();

    let findings = manager.ask("research", "findings").await.unwrap();
    let id = manager
        .relay("research", "writer", &format!("Research says {findings}"))
        .unwrap();

    let record = common::wait_done(&manager, &id).await;
    assert_eq!(record.agent_name, "writer");
    assert_eq!(
        record.result.as_deref(),
        Some("echo: Research says echo: findings")
    );

    let relay = audit
        .events()
        .into_iter()
        .find(|e| e.operation == AuditOperation::Relay)
        .unwrap();
    assert_eq!(relay.agent, "writer");
    let detail = relay.detail.unwrap();
    assert_eq!(detail["from"], "research");
    assert_eq!(detail["request_id"], id.as_str());

    manager.shutdown().await;
}

#[tokio::test]
async fn test_relay_to_unknown_agent() {
    let manager = common::manager();
    manager.spawn("source", SpawnOptions::default()).await.unwrap();

    let err = manager.relay("source", "nowhere", "hello").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // The source does not have to be live
    manager.spawn("target", SpawnOptions::default()).await.unwrap();
    let id = manager.relay("gone", "target", "hello").unwrap();
    assert_eq!(
        common::wait_done(&manager, &id).await.status,
        RequestStatus::Complete
    );

    manager.shutdown().await;
}
