//! osi-sim: terminal walkthrough of OSI encapsulation
//!
//! A student emails an assignment to a teacher; the walkthrough follows the
//! email down the sender's stack and back up the receiver's.
//!
//! # Example
//!
//! ```bash
//! # Interactive, with a reproducible scenario pick
//! osi-sim --seed 42 --print-config
//!
//! # Play the whole story at one step per second
//! osi-sim --autoplay --speed fast
//! ```

mod command;
mod config;
mod render;
mod session;

use clap::Parser;
use config::{Cli, Config, StatsFormat};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the walkthrough
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }
    info!(seed = config.seed, scenario = config.scenario.id, "Session starting");

    let result = if config.autoplay {
        session::run_autoplay(&config)
    } else {
        session::run_interactive(&config)
    };

    match result {
        Ok(stats) => {
            if config.print_stats {
                match config.stats_format {
                    StatsFormat::Summary => stats.print_summary(),
                    StatsFormat::Text => print!("{}", stats.export_text()),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
