//! CLI commands module

pub mod check;
pub mod list;
pub mod matching;

use clap::Args;
use std::path::PathBuf;

use crate::config::{Config, RulesConfig};

/// Where to read grouping rules from
#[derive(Args, Debug, Clone, Default)]
pub struct RulesSourceArgs {
    /// Grouping rules file (overrides the configuration)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

impl RulesSourceArgs {
    /// Rules configuration with the command-line file applied
    pub fn resolve(&self, config: &Config) -> RulesConfig {
        let mut rules = config.rules.clone();
        if let Some(file) = &self.rules {
            rules.file = Some(file.clone());
        }
        rules
    }
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: RulesSourceArgs,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the match command
#[derive(Args, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    pub source: RulesSourceArgs,

    /// Service path of the event
    #[arg(long, default_value = "", value_name = "PATH")]
    pub service_path: String,

    /// Entity identifier of the event
    #[arg(long, default_value = "", value_name = "ID")]
    pub entity_id: String,

    /// Entity type of the event
    #[arg(long, default_value = "", value_name = "TYPE")]
    pub entity_type: String,

    /// Destination to report when no rule matches (overrides the configuration)
    #[arg(long, value_name = "DESTINATION")]
    pub default_destination: Option<String>,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: RulesSourceArgs,

    /// Print `"grouping_rules": [...]` instead of a full document
    #[arg(long)]
    pub as_field: bool,
}

/// Output format for check and match
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_argument_overrides_config() {
        let mut config = Config::default();
        config.rules.file = Some(PathBuf::from("/etc/rules.json"));
        config.rules.comment_prefix = "//".to_string();

        let args = RulesSourceArgs {
            rules: Some(PathBuf::from("local.json")),
        };
        let resolved = args.resolve(&config);
        assert_eq!(resolved.file, Some(PathBuf::from("local.json")));
        assert_eq!(resolved.comment_prefix, "//");

        let resolved = RulesSourceArgs::default().resolve(&config);
        assert_eq!(resolved.file, Some(PathBuf::from("/etc/rules.json")));
    }
}
