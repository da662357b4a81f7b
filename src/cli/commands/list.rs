//! List command - Print the loaded rule set

use super::ListArgs;
use crate::cli::exit_codes;
use crate::config::Config;
use crate::error::GroupingError;
use crate::rules::GroupingRules;

pub fn execute(args: ListArgs, config: &Config) -> Result<i32, GroupingError> {
    let (rules, report) = GroupingRules::load(&args.source.resolve(config));
    println!("{}", rules.to_json(args.as_field)?);

    if report.is_source_failure() {
        Ok(exit_codes::INVALID_RULES)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
