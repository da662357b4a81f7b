//! grouping-rules library
//!
//! Classifies entity events into destinations using an ordered list of
//! regex-based grouping rules. The rule set can be bootstrapped from a JSON or
//! YAML document and edited (add, update, delete) while it keeps serving
//! matches.
//!
//! ```rust
//! use grouping_rules::rules::{Field, GroupingRules, Rule};
//!
//! let rules = GroupingRules::new();
//! let id = rules.add(Rule::new(vec![Field::ServicePath], "^/a/.*$", "g1").unwrap());
//! assert_eq!(id, 1);
//!
//! let matched = rules.matching_rule("/a/b", "e1", "Room").unwrap();
//! assert_eq!(matched.destination(), "g1");
//! assert!(rules.matching_rule("/x", "e1", "Room").is_none());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod rules;

pub use error::GroupingError;
pub use rules::{GroupingRules, Rule};
