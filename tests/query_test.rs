//! Single-shot queries against a scripted backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Reply, ScriptedBackend};
use process_agent::agent::QueryRunner;
use process_agent::backend::{AgentEvent, TurnResult};
use process_agent::core::AgentError;
use serde_json::json;

fn mixed_turn() -> Reply {
    Reply::Events(vec![
        AgentEvent::System {
            subtype: "init".into(),
            session_id: Some("abc".into()),
        },
        AgentEvent::text("The answer "),
        AgentEvent::ToolUse {
            id: "toolu_1".into(),
            name: "Bash".into(),
            input: json!({"command": "echo $((2+2))"}),
            parent_tool_use_id: None,
        },
        AgentEvent::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "4".into(),
            is_error: false,
        },
        AgentEvent::text("is 4."),
        AgentEvent::Result(TurnResult::success()),
    ])
}

#[tokio::test]
async fn test_only_text_in_arrival_order() {
    let backend = Arc::new(ScriptedBackend::new(|_| mixed_turn()));
    let runner = QueryRunner::new(backend.clone());

    assert_eq!(runner.ask("What is 2+2?").await.unwrap(), "The answer is 4.");
    assert_eq!(backend.sessions(), 1);
    assert_eq!(backend.disconnects(), 1);
}

#[tokio::test]
async fn test_events_are_kept_for_inspection() {
    let backend = Arc::new(ScriptedBackend::new(|_| mixed_turn()));
    let runner = QueryRunner::new(backend);

    let output = runner.ask_with_events("What is 2+2?").await.unwrap();
    assert_eq!(output.text, "The answer is 4.");
    assert_eq!(output.events.len(), 6);
    assert!(output.events.last().unwrap().is_terminal());
    assert!(matches!(output.events[2], AgentEvent::ToolUse { ref name, .. } if name == "Bash"));
}

#[tokio::test]
async fn test_chunks_are_not_normalised() {
    let backend = Arc::new(ScriptedBackend::new(|_| Reply::text(&["a ", " b", "\n", "c"])));
    let runner = QueryRunner::new(backend);
    assert_eq!(runner.ask("x").await.unwrap(), "a  b\nc");
}

#[tokio::test]
async fn test_blank_prompt_never_connects() {
    let backend = Arc::new(ScriptedBackend::echo());
    let runner = QueryRunner::new(backend.clone());

    for prompt in ["", "   ", "\n\t"] {
        let err = runner.ask(prompt).await.unwrap_err();
        assert!(err.is_invalid_argument());
    }
    assert_eq!(backend.connect_attempts(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_are_isolated() {
    let backend = Arc::new(ScriptedBackend::echo());
    let runner = QueryRunner::new(backend.clone());

    let (first, second) = tokio::join!(runner.ask("one"), runner.ask("two"));
    assert_eq!(first.unwrap(), "echo: one");
    assert_eq!(second.unwrap(), "echo: two");

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 2);
    assert_ne!(prompts[0].0, prompts[1].0);
    assert_eq!(backend.sessions(), 2);
    assert_eq!(backend.disconnects(), 2);
}

#[tokio::test]
async fn test_one_failure_does_not_affect_other_call() {
    let backend = Arc::new(ScriptedBackend::new(|prompt| {
        if prompt == "bad" {
            Reply::FailMidStream(vec![AgentEvent::text("par")], "broken pipe".into())
        } else {
            Reply::text(&["ok"])
        }
    }));
    let runner = QueryRunner::new(backend.clone());

    let (bad, good) = tokio::join!(runner.ask("bad"), runner.ask("good"));
    assert!(matches!(bad, Err(AgentError::Stream(_))));
    assert_eq!(good.unwrap(), "ok");
    assert_eq!(backend.disconnects(), 2);
}

#[tokio::test]
async fn test_connect_failure_is_distinct() {
    let backend = Arc::new(ScriptedBackend::echo().with_connect_limit(0));
    let runner = QueryRunner::new(backend.clone());

    let err = runner.ask("hello").await.unwrap_err();
    assert!(matches!(err, AgentError::Connect(_)));
    assert_eq!(backend.sessions(), 0);
}

#[tokio::test]
async fn test_error_result_is_backend_error() {
    let backend = Arc::new(ScriptedBackend::new(|_| Reply::error_result("overloaded")));
    let runner = QueryRunner::new(backend.clone());

    let err = runner.ask("hello").await.unwrap_err();
    assert!(matches!(err, AgentError::Backend(ref msg) if msg.contains("overloaded")));
    assert_eq!(backend.disconnects(), 1);
}

#[tokio::test]
async fn test_timeout_tears_session_down() {
    let backend = Arc::new(ScriptedBackend::new(|_| Reply::Hang));
    let runner = QueryRunner::new(backend.clone()).with_timeout(Duration::from_millis(50));

    let err = runner.ask("hello").await.unwrap_err();
    assert!(matches!(err, AgentError::Timeout(d) if d == Duration::from_millis(50)));
    assert_eq!(backend.disconnects(), 1);
}
