//! Match command - Classify a single event

use super::{MatchArgs, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, MatchOutcome, OutputRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::GroupingError;
use crate::rules::{EventAttributes, GroupingRules};

pub fn execute(args: MatchArgs, config: &Config) -> Result<i32, GroupingError> {
    let (rules, _report) = GroupingRules::load(&args.source.resolve(config));

    let attributes = EventAttributes::new(&args.service_path, &args.entity_id, &args.entity_type);
    let fallback = args
        .default_destination
        .or_else(|| config.matching.default_destination.clone());

    let outcome = match (rules.find_match(&attributes), fallback) {
        (Some(rule), _) => MatchOutcome::Rule(rule),
        (None, Some(destination)) => MatchOutcome::Fallback(destination),
        (None, None) => MatchOutcome::NoMatch,
    };

    let renderer: Box<dyn OutputRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    println!("{}", renderer.render_match(&attributes, &outcome)?);

    match outcome {
        MatchOutcome::NoMatch => Ok(exit_codes::NO_MATCH),
        _ => Ok(exit_codes::SUCCESS),
    }
}
