//! scopelog demo server
//!
//! Serves a small app behind the request timing middleware and drains the
//! logging pipeline on shutdown.

#![allow(missing_docs)]

use clap::Parser;
use scopelog::config::Config;
use scopelog::server;
use scopelog::utils::logging::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "scopelog-demo", version, about = "Contextual logging demo server")]
struct Args {
    /// YAML configuration file; defaults plus SCOPELOG_* variables when absent
    #[arg(short, long, env = "SCOPELOG_CONFIG")]
    config: Option<PathBuf>,
}

async fn load_config(args: &Args) -> scopelog::Result<Config> {
    match &args.config {
        Some(path) => Config::from_file(path).await,
        None => Config::from_env(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.diagnostics) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match server::builder::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line messages readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
