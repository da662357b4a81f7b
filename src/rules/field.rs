//! Recognized event attributes and the probe they contribute to
//!
//! A [`Field`] names one attribute of an incoming event. Rules select an
//! ordered list of fields; the selected values are appended, in that order and
//! without separators, to form the probe string the rule's pattern is tested
//! against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Attributes identifying an event to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAttributes<'a> {
    /// Hierarchical service path (e.g. `/city/rooms`)
    pub service_path: &'a str,
    /// Entity identifier
    pub entity_id: &'a str,
    /// Entity type
    pub entity_type: &'a str,
}

impl<'a> EventAttributes<'a> {
    pub fn new(service_path: &'a str, entity_id: &'a str, entity_type: &'a str) -> Self {
        Self {
            service_path,
            entity_id,
            entity_type,
        }
    }
}

/// A recognized attribute name.
///
/// Adding an attribute means adding a variant here, its name in [`Field::as_str`]
/// and its accessor in [`Field::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "servicePath", alias = "path")]
    ServicePath,
    #[serde(rename = "entityId")]
    EntityId,
    #[serde(rename = "entityType")]
    EntityType,
}

impl Field {
    /// Every recognized field, in declaration order.
    pub const ALL: [Field; 3] = [Field::ServicePath, Field::EntityId, Field::EntityType];

    /// Canonical attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ServicePath => "servicePath",
            Field::EntityId => "entityId",
            Field::EntityType => "entityType",
        }
    }

    /// Resolve an attribute name, accepting `path` as an alias of `servicePath`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "servicePath" | "path" => Some(Field::ServicePath),
            "entityId" => Some(Field::EntityId),
            "entityType" => Some(Field::EntityType),
            _ => None,
        }
    }

    /// The value this field selects from an event.
    pub fn select<'a>(&self, attributes: &EventAttributes<'a>) -> &'a str {
        match self {
            Field::ServicePath => attributes.service_path,
            Field::EntityId => attributes.entity_id,
            Field::EntityType => attributes.entity_type,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_name(s).ok_or_else(|| ValidationError::DisallowedField {
            name: s.to_string(),
        })
    }
}

/// Build the probe string for `fields` over `attributes`.
pub fn concatenate(fields: &[Field], attributes: &EventAttributes<'_>) -> String {
    let capacity = fields
        .iter()
        .map(|field| field.select(attributes).len())
        .sum();
    let mut probe = String::with_capacity(capacity);
    for field in fields {
        probe.push_str(field.select(attributes));
    }
    probe
}
