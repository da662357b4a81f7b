//! # Grouping Rule
//!
//! A [`Rule`] pairs an ordered list of [`Field`]s with a compiled pattern and a
//! destination. Rules are built from a [`RuleDefinition`], either parsed from a
//! raw JSON/YAML mapping with [`RuleDefinition::from_value`] or assembled in
//! code, and are immutable once compiled. The owning
//! [`GroupingRules`](super::GroupingRules) assigns ids.
//!
//! ## Wire shape
//!
//! ```json
//! {
//!   "fields": ["entityId", "entityType"],
//!   "regex": "Room[0-9]+Room",
//!   "destination": "rooms",
//!   "fiware_service_path": "/rooms"
//! }
//! ```
//!
//! `pattern` and `target` are accepted in place of `regex` and `destination`,
//! `service_path` in place of `fiware_service_path`. Other keys are ignored.
//!
//! ## Matching
//!
//! Patterns are matched against the whole probe string: `a.*b` accepts
//! `aXXb` but rejects both `aXXbz` and `zaXXb`.

use regex_automata::meta::Regex;
use regex_syntax::hir::{Hir, Look};
use regex_syntax::Parser;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::field::{concatenate, EventAttributes, Field};
use crate::error::{RuleError, ValidationError};

const FIELDS_KEYS: &[&str] = &["fields"];
const REGEX_KEYS: &[&str] = &["regex", "pattern"];
const DESTINATION_KEYS: &[&str] = &["destination", "target"];
const SERVICE_PATH_KEYS: &[&str] = &["fiware_service_path", "service_path"];

/// Separator every service path must start with.
pub const PATH_SEPARATOR: char = '/';

/// An uncompiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    pub fields: Vec<Field>,
    pub pattern: String,
    pub destination: String,
    pub service_path: Option<String>,
}

impl RuleDefinition {
    pub fn new(
        fields: Vec<Field>,
        pattern: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            fields,
            pattern: pattern.into(),
            destination: destination.into(),
            service_path: None,
        }
    }

    pub fn with_service_path(mut self, service_path: impl Into<String>) -> Self {
        self.service_path = Some(service_path.into());
        self
    }

    /// Parse and validate a raw definition.
    ///
    /// Checks run in stages so the reported kind is deterministic: missing
    /// keys first, then empty values, then unrecognized field names, then the
    /// service path prefix.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = value.as_object().ok_or(ValidationError::MissingField {
            key: FIELDS_KEYS[0],
        })?;

        let fields = lookup(map, FIELDS_KEYS)
            .and_then(Value::as_array)
            .ok_or(ValidationError::MissingField { key: FIELDS_KEYS[0] })?;
        let pattern = lookup(map, REGEX_KEYS)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField { key: REGEX_KEYS[0] })?;
        let destination = lookup(map, DESTINATION_KEYS)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField {
                key: DESTINATION_KEYS[0],
            })?;
        let service_path = lookup(map, SERVICE_PATH_KEYS);

        if fields.is_empty() {
            return Err(ValidationError::EmptyField { key: FIELDS_KEYS[0] });
        }
        if pattern.is_empty() {
            return Err(ValidationError::EmptyField { key: REGEX_KEYS[0] });
        }
        if destination.is_empty() {
            return Err(ValidationError::EmptyField {
                key: DESTINATION_KEYS[0],
            });
        }
        if service_path.and_then(Value::as_str) == Some("") {
            return Err(ValidationError::EmptyField {
                key: SERVICE_PATH_KEYS[0],
            });
        }

        let fields = fields
            .iter()
            .map(|name| match name.as_str() {
                Some(name) => name.parse::<Field>(),
                None => Err(ValidationError::DisallowedField {
                    name: name.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let service_path = match service_path {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) => Some(path.clone()),
            Some(other) => {
                return Err(ValidationError::MalformedPath {
                    path: other.to_string(),
                })
            }
        };

        let definition = Self {
            fields,
            pattern: pattern.to_string(),
            destination: destination.to_string(),
            service_path,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Validate a definition assembled in code.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.is_empty() {
            return Err(ValidationError::EmptyField { key: FIELDS_KEYS[0] });
        }
        if self.pattern.is_empty() {
            return Err(ValidationError::EmptyField { key: REGEX_KEYS[0] });
        }
        if self.destination.is_empty() {
            return Err(ValidationError::EmptyField {
                key: DESTINATION_KEYS[0],
            });
        }
        if let Some(path) = &self.service_path {
            if path.is_empty() {
                return Err(ValidationError::EmptyField {
                    key: SERVICE_PATH_KEYS[0],
                });
            }
            if !path.starts_with(PATH_SEPARATOR) {
                return Err(ValidationError::MalformedPath { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Validate and compile into a [`Rule`] with no id assigned yet.
    pub fn compile(self) -> Result<Rule, RuleError> {
        self.validate()?;
        let regex = compile_full_match(&self.pattern)?;
        Ok(Rule {
            id: 0,
            fields: self.fields,
            pattern: self.pattern,
            destination: self.destination,
            service_path: self.service_path,
            regex,
        })
    }
}

/// Validate a raw definition without compiling it.
pub fn validate(value: &Value) -> Result<(), ValidationError> {
    RuleDefinition::from_value(value).map(|_| ())
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// Compile `pattern` so that it only accepts whole inputs.
///
/// The anchors are added to the parsed expression rather than to the source
/// text, so inline flags and `(?x)` comments in `pattern` cannot reach them.
fn compile_full_match(pattern: &str) -> Result<Regex, RuleError> {
    let invalid = |source: regex::Error| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    let hir = Parser::new()
        .parse(pattern)
        .map_err(|e| invalid(regex::Error::Syntax(e.to_string())))?;
    let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
    Regex::builder().build_from_hir(&anchored).map_err(|e| {
        invalid(match e.size_limit() {
            Some(limit) => regex::Error::CompiledTooBig(limit),
            None => regex::Error::Syntax(e.to_string()),
        })
    })
}

/// A validated, compiled grouping rule.
///
/// Serializes to the JSON projection used for listing:
/// `{"id":1,"fields":["entityType"],"regex":"Room","destination":"rooms"}`.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    id: u64,
    fields: Vec<Field>,
    #[serde(rename = "regex")]
    pattern: String,
    destination: String,
    #[serde(rename = "fiware_service_path", skip_serializing_if = "Option::is_none")]
    service_path: Option<String>,
    #[serde(skip)]
    regex: Regex,
}

impl Rule {
    /// Compile a rule from its parts.
    pub fn new(
        fields: Vec<Field>,
        pattern: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, RuleError> {
        RuleDefinition::new(fields, pattern, destination).compile()
    }

    /// Validate and compile a raw definition.
    pub fn from_value(value: &Value) -> Result<Self, RuleError> {
        RuleDefinition::from_value(value)?.compile()
    }

    /// Id assigned by the owning rule set; `0` until inserted.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Pattern source text as supplied.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn service_path(&self) -> Option<&str> {
        self.service_path.as_deref()
    }

    /// Probe string this rule tests for `attributes`.
    pub fn probe(&self, attributes: &EventAttributes<'_>) -> String {
        concatenate(&self.fields, attributes)
    }

    /// Whether the whole probe for `attributes` satisfies the pattern.
    pub fn matches(&self, attributes: &EventAttributes<'_>) -> bool {
        self.regex.is_match(self.probe(attributes).as_str())
    }

    /// Back to an uncompiled definition, e.g. to derive an updated rule.
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            fields: self.fields.clone(),
            pattern: self.pattern.clone(),
            destination: self.destination.clone(),
            service_path: self.service_path.clone(),
        }
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.fields == other.fields
            && self.pattern == other.pattern
            && self.destination == other.destination
            && self.service_path == other.service_path
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attrs<'a>(path: &'a str, id: &'a str, ty: &'a str) -> EventAttributes<'a> {
        EventAttributes::new(path, id, ty)
    }

    #[test]
    fn test_from_value_valid_definition() {
        let value = json!({
            "fields": ["entityId", "entityType"],
            "regex": "Room[0-9]+Room",
            "destination": "rooms",
            "fiware_service_path": "/rooms",
            "id": 7
        });

        let definition = RuleDefinition::from_value(&value).unwrap();
        assert_eq!(
            definition,
            RuleDefinition::new(
                vec![Field::EntityId, Field::EntityType],
                "Room[0-9]+Room",
                "rooms"
            )
            .with_service_path("/rooms")
        );
    }

    #[test]
    fn test_from_value_accepts_aliases() {
        let value = json!({"fields": ["path"], "pattern": "/a/.*", "target": "g1"});
        let definition = RuleDefinition::from_value(&value).unwrap();
        assert_eq!(definition.fields, vec![Field::ServicePath]);
        assert_eq!(definition.pattern, "/a/.*");
        assert_eq!(definition.destination, "g1");
        assert_eq!(definition.service_path, None);
    }

    #[test]
    fn test_missing_fields_are_reported() {
        assert_eq!(
            validate(&json!({"regex": "x", "destination": "d"})),
            Err(ValidationError::MissingField { key: "fields" })
        );
        assert_eq!(
            validate(&json!({"fields": ["entityId"], "destination": "d"})),
            Err(ValidationError::MissingField { key: "regex" })
        );
        assert_eq!(
            validate(&json!({"fields": ["entityType"], "pattern": ".*"})),
            Err(ValidationError::MissingField { key: "destination" })
        );
        assert_eq!(
            validate(&json!("not an object")),
            Err(ValidationError::MissingField { key: "fields" })
        );
    }

    #[test]
    fn test_wrong_types_count_as_missing() {
        assert_eq!(
            validate(&json!({"fields": "entityId", "regex": "x", "destination": "d"})),
            Err(ValidationError::MissingField { key: "fields" })
        );
        assert_eq!(
            validate(&json!({"fields": ["entityId"], "regex": 3, "destination": "d"})),
            Err(ValidationError::MissingField { key: "regex" })
        );
    }

    #[test]
    fn test_empty_fields_are_reported() {
        assert_eq!(
            validate(&json!({"fields": [], "regex": "x", "destination": "d"})),
            Err(ValidationError::EmptyField { key: "fields" })
        );
        assert_eq!(
            validate(&json!({"fields": ["entityId"], "regex": "", "destination": "d"})),
            Err(ValidationError::EmptyField { key: "regex" })
        );
        assert_eq!(
            validate(&json!({"fields": ["entityId"], "regex": "x", "destination": ""})),
            Err(ValidationError::EmptyField { key: "destination" })
        );
    }

    #[test]
    fn test_empty_is_reported_before_disallowed() {
        assert_eq!(
            validate(&json!({"fields": ["color"], "regex": "", "destination": "d"})),
            Err(ValidationError::EmptyField { key: "regex" })
        );
    }

    #[test]
    fn test_disallowed_field_is_reported() {
        assert_eq!(
            validate(&json!({"fields": ["entityId", "color"], "regex": "x", "destination": "d"})),
            Err(ValidationError::DisallowedField {
                name: "color".to_string()
            })
        );
        assert_eq!(
            validate(&json!({"fields": [1], "regex": "x", "destination": "d"})),
            Err(ValidationError::DisallowedField {
                name: "1".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_service_path_is_reported() {
        assert_eq!(
            validate(&json!({
                "fields": ["entityId"],
                "regex": "x",
                "destination": "d",
                "fiware_service_path": "rooms"
            })),
            Err(ValidationError::MalformedPath {
                path: "rooms".to_string()
            })
        );
        assert!(validate(&json!({
            "fields": ["entityId"],
            "regex": "x",
            "destination": "d",
            "service_path": "/rooms"
        }))
        .is_ok());
        assert_eq!(
            validate(&json!({
                "fields": ["entityId"],
                "regex": "x",
                "destination": "d",
                "fiware_service_path": ""
            })),
            Err(ValidationError::EmptyField {
                key: "fiware_service_path"
            })
        );
        assert_eq!(
            validate(&json!({
                "fields": ["entityId"],
                "regex": "x",
                "destination": "d",
                "service_path": 42
            })),
            Err(ValidationError::MalformedPath {
                path: "42".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_pattern_fails_compilation() {
        let err = Rule::new(vec![Field::EntityId], "[invalid regex", "d").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref pattern, .. } if pattern == "[invalid regex"));
    }

    #[test]
    fn test_unbalanced_pattern_is_not_rescued_by_anchoring() {
        let err = Rule::new(vec![Field::EntityId], "a)|(b", "d").unwrap_err();
        assert_eq!(err.kind(), "invalid_pattern");
    }

    #[test]
    fn test_matches_whole_probe_only() {
        let rule = Rule::new(vec![Field::EntityId], "a.*b", "g").unwrap();
        assert!(rule.matches(&attrs("/", "aYYYb", "")));
        assert!(!rule.matches(&attrs("/", "aYYYbz", "")));
        assert!(!rule.matches(&attrs("/", "xaYYYb", "")));
        assert!(!rule.matches(&attrs("/", "xaYYYb z", "")));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let rule = Rule::new(vec![Field::EntityType], "Room|Car", "g").unwrap();
        assert!(rule.matches(&attrs("/", "", "Room")));
        assert!(rule.matches(&attrs("/", "", "Car")));
        assert!(!rule.matches(&attrs("/", "", "Roomba")));
        assert!(!rule.matches(&attrs("/", "", "SportsCar")));
    }

    #[test]
    fn test_verbose_pattern_with_trailing_comment() {
        let rule = Rule::new(
            vec![Field::EntityId],
            "(?x) Room [0-9]+  # numbered rooms",
            "rooms",
        )
        .unwrap();
        assert!(rule.matches(&attrs("/", "Room42", "")));
        assert!(!rule.matches(&attrs("/", "Room42b", "")));
        assert!(!rule.matches(&attrs("/", "xRoom42", "")));
    }

    #[test]
    fn test_inline_flags_are_honoured() {
        let rule = Rule::new(vec![Field::EntityType], "(?i)room", "g").unwrap();
        assert!(rule.matches(&attrs("/", "", "ROOM")));
    }

    #[test]
    fn test_probe_concatenates_selected_fields_in_order() {
        let rule = Rule::new(vec![Field::EntityType, Field::EntityId], "RoomRoom1", "g").unwrap();
        let event = attrs("/rooms", "Room1", "Room");
        assert_eq!(rule.probe(&event), "RoomRoom1");
        assert!(rule.matches(&event));
    }

    #[test]
    fn test_serialization_projection() {
        let rule = RuleDefinition::new(vec![Field::EntityType], "Room", "rooms")
            .with_service_path("/rooms")
            .compile()
            .unwrap()
            .with_id(3);
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "id": 3,
                "fields": ["entityType"],
                "regex": "Room",
                "destination": "rooms",
                "fiware_service_path": "/rooms"
            })
        );

        let plain = Rule::new(vec![Field::ServicePath], "/a/.*", "g1").unwrap();
        assert_eq!(
            plain.to_string(),
            r#"{"id":0,"fields":["servicePath"],"regex":"/a/.*","destination":"g1"}"#
        );
    }

    #[test]
    fn test_to_definition_round_trips() {
        let definition =
            RuleDefinition::new(vec![Field::EntityId], "e[0-9]", "ids").with_service_path("/ids");
        let rule = definition.clone().compile().unwrap();
        assert_eq!(rule.to_definition(), definition);
    }
}
