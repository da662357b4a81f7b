//! # CLI Module
//!
//! Command-line interface for grouping-rules, built with `clap`.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Load a rules source and report every definition's outcome |
//! | `match` | Classify one event against the rules |
//! | `list` | Print the loaded rule set as JSON |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//!
//! ## Examples
//!
//! ```bash
//! grouping-rules check --rules grouping_rules.conf
//! grouping-rules match --rules grouping_rules.conf --service-path /rooms --entity-type Room
//! grouping-rules list --rules grouping_rules.conf --as-field
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{CheckArgs, ListArgs, MatchArgs};

/// grouping-rules - Classify entity events into destinations with regex rules
#[derive(Parser, Debug)]
#[command(name = "grouping-rules")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a grouping rules source
    Check(CheckArgs),

    /// Find the rule matching an event
    Match(MatchArgs),

    /// Print the loaded grouping rules
    List(ListArgs),
}
