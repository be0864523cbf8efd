//! Requirements command handler

use anyhow::Result;
use boiler_engine::{DeployPipeline, EngineConfig};
use colored::*;

/// Probes whether this host can run deployments
pub fn handle_requirements() -> Result<()> {
    println!("\n{}", "Check requirements".magenta());

    let pipeline = DeployPipeline::standard(EngineConfig::from_env());

    match pipeline.check_requirements() {
        Ok(()) => {
            println!("{}", "All clear".green());
            Ok(())
        }
        Err(e) => {
            println!("{}", format!("Requirements not met: {}", e).red());
            anyhow::bail!("requirements not met")
        }
    }
}
