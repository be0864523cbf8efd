//! Deploy command handler

use anyhow::{Context, Result};
use boiler_core::domain::DeploymentRequest;
use boiler_engine::{DeployPipeline, EngineConfig};
use colored::*;
use std::sync::Arc;

use crate::reporter::ConsoleReporter;

/// Runs one deployment from the command line
pub async fn handle_deploy(
    repository: String,
    project_name: Option<String>,
    revision: String,
    skip_clean: bool,
    skip_build: bool,
) -> Result<()> {
    println!("\n{}", format!("Boiling {}", repository).magenta());

    let mut request = DeploymentRequest::new(repository)
        .with_revision(revision)
        .with_skip_build(skip_build)
        .with_skip_clean(skip_clean);
    if let Some(name) = project_name {
        request = request.with_project_name(name);
    }

    let config = EngineConfig::from_env();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let pipeline = DeployPipeline::standard(config).with_progress(Arc::new(ConsoleReporter));

    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&request))
        .await
        .context("deployment task panicked")?;

    if outcome.success {
        println!("\n{}", "App boiled! Can be served =)".cyan());
        Ok(())
    } else {
        anyhow::bail!(
            "deployment failed at stage '{}': {}",
            outcome.stage_reached,
            outcome.message
        )
    }
}
