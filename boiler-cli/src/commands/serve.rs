//! Serve command handler

use anyhow::{Context, Result};
use boiler_engine::{DeployPipeline, EngineConfig};
use boiler_webhook::{AgentConfig, AppState};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Starts the webhook listener
pub async fn handle_serve(port: u16, config_path: PathBuf) -> Result<()> {
    let agent_config = AgentConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let engine_config = EngineConfig::from_env();
    engine_config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let pipeline = Arc::new(DeployPipeline::standard(engine_config));
    let state = Arc::new(AppState {
        secret: agent_config.github_webhook.secret,
        pipeline,
    });

    println!(
        "\n{}",
        format!("Serving boiler webhook endpoint at port {}", port).magenta()
    );

    let addr = format!("0.0.0.0:{}", port);
    boiler_webhook::serve(&addr, state)
        .await
        .context("webhook server failed")
}
