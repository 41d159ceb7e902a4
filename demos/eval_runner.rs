//! Eval Runner Example
//!
//! Sends a batch of prompts to the process agent concurrently. Every prompt
//! gets its own session, so the answers are independent of each other.
//!
//! Run with: cargo run --example eval_runner

use std::sync::Arc;

use anyhow::Result;
use colored::*;
use futures::future::join_all;

use process_agent::agent::{process_agent_options, QueryRunner};
use process_agent::backend;
use process_agent::config::Settings;

/// Prompt and a substring the answer is expected to contain
const CASES: &[(&str, &str)] = &[
    ("What is 2+2? Answer with just the number.", "4"),
    ("What is the capital of France? Answer with one word.", "Paris"),
    ("How many legs does a cat have? Answer with just the number.", "4"),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("eval_runner=info,process_agent=warn")
        .init();

    let settings = Settings::from_env()?;
    let options = Arc::new(process_agent_options(&settings)?);
    let mut runner = QueryRunner::new(backend::from_settings(&settings, options));
    if let Some(limit) = settings.timeout {
        runner = runner.with_timeout(limit);
    }

    println!("=== Eval Runner ({} cases) ===\n", CASES.len());

    let results = join_all(CASES.iter().map(|(prompt, _)| runner.ask(prompt))).await;

    let mut passed = 0;
    for ((prompt, expected), result) in CASES.iter().zip(results) {
        match result {
            Ok(answer) if answer.contains(expected) => {
                passed += 1;
                println!("{} {}", "PASS".green().bold(), prompt);
            }
            Ok(answer) => {
                println!("{} {}", "FAIL".red().bold(), prompt);
                println!("     expected '{}', got: {}", expected, answer.trim());
            }
            Err(e) => {
                println!("{} {}", "ERROR".red().bold(), prompt);
                println!("     {}", e);
            }
        }
    }

    println!("\n{}/{} passed", passed, CASES.len());
    Ok(())
}
