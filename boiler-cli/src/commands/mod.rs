//! Command definitions and dispatch

mod deploy;
mod requirements;
mod serve;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use boiler_webhook::config::DEFAULT_CONFIG_PATH;

/// Agent subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy an app using docker-compose and nginx
    #[command(visible_alias = "boil")]
    Deploy {
        /// Repository locator, e.g. git@host:org/name.git
        repository: String,

        /// Override the project name derived from the repository
        #[arg(short, long)]
        project_name: Option<String>,

        /// Branch or tag to deploy
        #[arg(short, long, default_value = "master")]
        revision: String,

        /// Keep the workspace on disk after deploying
        #[arg(long)]
        skip_clean: bool,

        /// Stop after extracting configuration, before any container work
        #[arg(long)]
        skip_build: bool,
    },

    /// Listen for release webhooks and deploy each published release
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "6100", env = "BOILER_PORT")]
        port: u16,

        /// Path to the agent configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "BOILER_CONFIG")]
        config: PathBuf,
    },

    /// Check whether this host can run deployments
    Requirements,
}

/// Routes a parsed command to its handler
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Deploy {
            repository,
            project_name,
            revision,
            skip_clean,
            skip_build,
        } => deploy::handle_deploy(repository, project_name, revision, skip_clean, skip_build).await,
        Commands::Serve { port, config } => serve::handle_serve(port, config).await,
        Commands::Requirements => requirements::handle_requirements(),
    }
}
