//! grouping-rules - Classify entity events into destinations with regex rules
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use grouping_rules::cli::{commands, exit_codes, Cli, Commands};
use grouping_rules::config::Config;
use grouping_rules::GroupingError;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Handle exit codes for CI integration
    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32, GroupingError> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };

    match cli.command {
        Commands::Check(args) => commands::check::execute(args, &config),
        Commands::Match(args) => commands::matching::execute(args, &config),
        Commands::List(args) => commands::list::execute(args, &config),
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
