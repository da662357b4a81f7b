//! Check command - Load a rules source and report what was kept

use super::{CheckArgs, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, OutputRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::GroupingError;
use crate::rules::GroupingRules;

pub fn execute(args: CheckArgs, config: &Config) -> Result<i32, GroupingError> {
    let (rules, report) = GroupingRules::load(&args.source.resolve(config));

    let renderer: Box<dyn OutputRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    println!("{}", renderer.render_bootstrap(&report, &rules)?);

    if report.is_clean() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::INVALID_RULES)
    }
}
