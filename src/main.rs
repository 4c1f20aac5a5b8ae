//! echoload: WebSocket echo round trips for load testing
//!
//! - `echoload run` drives round trips against an endpoint
//! - `echoload serve` hosts a target that echoes or sends a canned reply

mod cli;

use clap::Parser;
use echoload::{EchoRoundTrip, EchoServer, WsConnector};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, RunArgs, ServeArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Serve(args) => serve(args).await,
    }
}

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;
    info!(
        endpoint = %args.endpoint,
        payload_size = config.payload_size,
        iterations = args.iterations,
        deadline_secs = config.timeouts.iteration.as_secs(),
        "Starting round trips"
    );

    let mut round_trip = EchoRoundTrip::new(config);
    round_trip
        .run_iterations(&WsConnector::new(), &args.endpoint, args.iterations)
        .await?;
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let server = EchoServer::bind(args.to_config()).await?;
    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
