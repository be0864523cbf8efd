//! Boiler CLI
//!
//! Operator entry point for the deployment agent: run a deploy by hand,
//! start the webhook listener, or probe host readiness.

mod commands;
mod reporter;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "boiler")]
#[command(about = "Self-hosted continuous deployment agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "boiler_engine=info,boiler_webhook=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    banner();

    handle_command(cli.command).await
}

fn banner() {
    println!("{}", "██████╗  ██████╗ ██╗██╗     ███████╗██████╗ ".cyan());
    println!("{}", "██╔══██╗██╔═══██╗██║██║     ██╔════╝██╔══██╗".cyan());
    println!("{}", "██████╔╝██║   ██║██║██║     █████╗  ██████╔╝".cyan());
    println!("{}", "██╔══██╗██║   ██║██║██║     ██╔══╝  ██╔══██╗".cyan());
    println!("{}", "██████╔╝╚██████╔╝██║███████╗███████╗██║  ██║".cyan());
    println!("{}", "╚═════╝  ╚═════╝ ╚═╝╚══════╝╚══════╝╚═╝  ╚═╝".cyan());
}
