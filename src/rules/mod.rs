//! Rules module - Grouping rules and the matching engine

pub mod engine;
pub mod field;
pub mod results;
pub mod rule;

pub use engine::{GroupingRules, Snapshot};
pub use field::{EventAttributes, Field};
pub use results::{BootstrapReport, BootstrapStatus, DefinitionOutcome, DefinitionStatus};
pub use rule::{Rule, RuleDefinition};
