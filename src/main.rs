//! Interactive terminal for the process agent
//!
//! Run with: cargo run

use std::sync::Arc;

use anyhow::Result;

use process_agent::agent::{process_agent_options, Agent};
use process_agent::backend;
use process_agent::cli::Console;
use process_agent::config::Settings;
use process_agent::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let settings = Settings::from_env()?;
    tracing::info!("Settings: {:?}", settings);

    let options = Arc::new(process_agent_options(&settings)?);
    let backend = backend::from_settings(&settings, options);

    let mut agent = Agent::new(backend, Console::new());
    agent.run().await?;

    Ok(())
}
