use std::sync::Arc;

use clap::Parser as _;
use dotenvy::dotenv;
use scorer::cli::{Cli, Commands, RunCmd};
use scorer::core::config::Config;
use scorer::server::setup_server;
use scorer::utils::logging::init_logging;
use scorer::{ScorerError, ScorerResult};
use tracing::{debug, error, info};

/// Start the server
#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    info!("Starting scorer");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            info!("Executing run command with args: {:?}", run_command);
            match run_scorer(run_command).await {
                Ok(_) => {
                    info!("Scorer stopped");
                }
                Err(e) => {
                    error!(
                        error = %e,
                        error_chain = ?e,
                        "Failed to run scorer service"
                    );
                    std::process::exit(1);
                }
            }
        }
    }
}

async fn run_scorer(run_cmd: &RunCmd) -> ScorerResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let (_, server_handle) = setup_server(config.clone()).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received ctrl+c, shutting down");

    server_handle.shutdown().await.map_err(|e| ScorerError::ScorerAnyHowError(e.into()))?;
    config.runner().shutdown().await;

    info!("Scorer service shutting down");
    Ok(())
}
