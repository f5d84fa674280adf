//! Relaybot CLI — entry point.
//!
//! # Commands
//!
//! - `relaybot serve` — start the WebSocket gateway with all agents
//! - `relaybot init` — write a default config file
//! - `relaybot status` — show configuration status

mod serve;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Relaybot — multi-agent message gateway
#[derive(Parser)]
#[command(name = "relaybot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the WebSocket gateway
    Serve {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default config file to ~/.relaybot/config.json
    Init,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { logs } => {
            init_logging(logs);
            serve::run().await
        }
        Commands::Init => status::init(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("relaybot=debug,info")
    } else {
        EnvFilter::new("relaybot=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
