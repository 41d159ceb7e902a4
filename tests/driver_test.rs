//! Interactive loop behaviour against a scripted backend

mod common;

use std::sync::Arc;

use common::{Reply, ScriptedBackend};
use process_agent::agent::{Agent, DriverState, LoopControl};
use process_agent::backend::AgentEvent;
use process_agent::cli::Console;
use process_agent::core::AgentError;

fn agent_on(backend: &Arc<ScriptedBackend>) -> Agent {
    Agent::new(backend.clone(), Console::new())
}

#[tokio::test]
async fn test_hello_new_exit() {
    let backend = Arc::new(ScriptedBackend::echo());
    let mut agent = agent_on(&backend);

    agent.connect().await.unwrap();
    assert_eq!(agent.state(), DriverState::Idle);
    assert_eq!(agent.turn_count(), 0);

    assert_eq!(agent.handle_input("hello").await.unwrap(), LoopControl::Continue);
    assert_eq!(agent.turn_count(), 1);
    assert_eq!(agent.state(), DriverState::Idle);

    assert_eq!(agent.handle_input("new").await.unwrap(), LoopControl::Continue);
    assert_eq!(agent.turn_count(), 0);
    assert_eq!(backend.sessions(), 2);
    assert_eq!(backend.disconnects(), 1);

    assert_eq!(agent.handle_input("exit").await.unwrap(), LoopControl::Exit);
    // "new" and "exit" never reach the backend
    assert_eq!(backend.prompts(), vec![(1, "hello".to_string())]);

    agent.shutdown().await;
    assert_eq!(agent.state(), DriverState::Disconnected);
    assert_eq!(backend.disconnects(), 2);
}

#[tokio::test]
async fn test_exit_in_any_casing() {
    for word in ["exit", "EXIT", "Quit", "qUiT", "  exit  "] {
        let backend = Arc::new(ScriptedBackend::echo());
        let mut agent = agent_on(&backend);
        agent.connect().await.unwrap();

        assert_eq!(agent.handle_input(word).await.unwrap(), LoopControl::Exit);
        assert!(backend.prompts().is_empty(), "'{}' was sent to the backend", word);
        assert_eq!(agent.turn_count(), 0);
    }
}

#[tokio::test]
async fn test_blank_lines_consume_no_turn() {
    let backend = Arc::new(ScriptedBackend::echo());
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    for line in ["", "   ", "\t"] {
        assert_eq!(agent.handle_input(line).await.unwrap(), LoopControl::Continue);
    }
    assert_eq!(agent.turn_count(), 0);
    assert!(backend.prompts().is_empty());
}

#[tokio::test]
async fn test_new_restarts_turn_numbering() {
    let backend = Arc::new(ScriptedBackend::echo());
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    agent.handle_input("one").await.unwrap();
    agent.handle_input("two").await.unwrap();
    assert_eq!(agent.turn_count(), 2);

    agent.handle_input("NEW").await.unwrap();
    agent.handle_input("three").await.unwrap();
    assert_eq!(agent.turn_count(), 1);

    assert_eq!(
        backend.prompts(),
        vec![
            (1, "one".to_string()),
            (1, "two".to_string()),
            (2, "three".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_turn_failure_keeps_session() {
    let backend = Arc::new(ScriptedBackend::new(|prompt| {
        if prompt == "boom" {
            Reply::FailMidStream(vec![AgentEvent::text("partial")], "connection reset".into())
        } else {
            Reply::text(&["fine"])
        }
    }));
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    assert_eq!(agent.handle_input("boom").await.unwrap(), LoopControl::Continue);
    assert_eq!(agent.state(), DriverState::Idle);
    assert_eq!(agent.handle_input("again").await.unwrap(), LoopControl::Continue);

    assert_eq!(agent.turn_count(), 2);
    assert_eq!(backend.sessions(), 1);
    assert_eq!(backend.disconnects(), 0);
}

#[tokio::test]
async fn test_error_result_is_turn_level() {
    let backend = Arc::new(ScriptedBackend::new(|_| Reply::error_result("rate limited")));
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    assert_eq!(agent.handle_input("hi").await.unwrap(), LoopControl::Continue);
    assert_eq!(agent.handle_input("hi again").await.unwrap(), LoopControl::Continue);
    assert_eq!(backend.sessions(), 1);
}

#[tokio::test]
async fn test_invalid_session_is_fatal() {
    let backend = Arc::new(ScriptedBackend::new(|_| Reply::Invalid));
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    let err = agent.handle_input("hello").await.unwrap_err();
    assert!(matches!(err, AgentError::SessionInvalid(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_reconnect_failure_is_fatal() {
    let backend = Arc::new(ScriptedBackend::echo().with_connect_limit(1));
    let mut agent = agent_on(&backend);
    agent.connect().await.unwrap();

    let err = agent.handle_input("new").await.unwrap_err();
    assert!(matches!(err, AgentError::Connect(_)));
    assert_eq!(agent.state(), DriverState::Disconnected);
    assert_eq!(backend.connect_attempts(), 2);
}

#[tokio::test]
async fn test_run_stops_when_connect_fails() {
    let backend = Arc::new(ScriptedBackend::echo().with_connect_limit(0));
    let mut agent = agent_on(&backend);

    let err = agent.run().await.unwrap_err();
    assert!(matches!(err, AgentError::Connect(_)));
    assert_eq!(agent.state(), DriverState::Disconnected);
    assert!(backend.prompts().is_empty());
}
