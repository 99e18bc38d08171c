//! admond: the admon metrics relay agent.
//!
//! Reads the newest per-server snapshot for every configured metadata and
//! storage server from the local admon database, sums each category into
//! one document, and indexes it into the remote metrics sink. Repeats every
//! poll interval until stopped or until too many cycles in a row fail.
//!
//! # Usage
//!
//! ```text
//! admond --config /etc/admon-relay/admon-relay.toml run
//! admond run --once
//! admond probe
//! admond check-config
//! ```

mod commands;
mod exit;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use admon_core::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(name = "admond", version, about = "admon metrics relay agent")]
struct Cli {
    /// Path to the relay configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the collection loop.
    Run {
        /// Poll interval in seconds, overriding the config file.
        #[arg(long)]
        interval: Option<u64>,

        /// Run a single cycle and exit.
        #[arg(long)]
        once: bool,
    },
    /// Check that the sink is reachable.
    Probe,
    /// Validate the config file and print the effective settings.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let interval = match cli.command {
        Command::Run { interval, .. } => interval,
        _ => None,
    };
    let config = match commands::load_config(&cli.config, interval) {
        Ok(config) => config,
        Err(failure) => {
            eprintln!("admond: {failure}");
            return failure.exit_code();
        }
    };

    // Printing the config needs no logging.
    if let Command::CheckConfig = cli.command {
        return match commands::check_config(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(failure) => {
                eprintln!("admond: {failure}");
                failure.exit_code()
            }
        };
    }

    if let Err(e) = logging::init(&config.log) {
        eprintln!("admond: {e:#}");
        return ExitCode::from(exit::codes::STARTUP);
    }

    let result = match cli.command {
        Command::Run { once, .. } => commands::run(config, once).await,
        Command::Probe => commands::probe(&config).await,
        Command::CheckConfig => commands::check_config(&config),
    };
    match result {
        Ok(()) => ExitCode::from(exit::codes::SUCCESS),
        Err(failure) => {
            error!(error = %failure, code = failure.code(), "admond exiting");
            failure.exit_code()
        }
    }
}
