//! Entity states as published by the host
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single attribute value of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean attribute.
    Bool(bool),

    /// A numeric attribute, such as `brightness` or `color_temp`.
    Number(f64),

    /// A string attribute, such as `friendly_name` or `effect`.
    String(String),

    /// A list of strings, such as `effect_list` or `options`.
    List(Vec<String>),

    /// Anything else; kept so unknown attributes don't break a snapshot.
    Other(serde_json::Value),
}

/// The state of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// The id of the entity, for example `light.kitchen`.
    pub entity_id: String,

    /// The lifecycle state of the entity, for example `on` or `off`.
    pub state: String,

    /// The attributes of the entity.
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
}

/// The entity states indexed by entity id, in the order the host sent them.
pub type States = IndexMap<String, EntityState>;

/// The lifecycle state of an entity that is on.
pub const STATE_ON: &str = "on";

impl EntityState {
    /// Create a new entity with no attributes.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute to the entity.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Returns true if the entity is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state == STATE_ON
    }

    /// The domain of the entity, the part of the id before the first `.`.
    #[must_use]
    pub fn domain(&self) -> &str {
        domain(&self.entity_id)
    }

    /// The friendly name of the entity, falling back to the entity id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.string("friendly_name").unwrap_or(&self.entity_id)
    }

    /// Get a numeric attribute.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.attributes.get(name) {
            Some(AttributeValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get a string attribute.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(AttributeValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get a list of strings attribute.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.attributes.get(name) {
            Some(AttributeValue::List(l)) => Some(l.as_slice()),
            _ => None,
        }
    }
}

/// The domain of an entity id, the part before the first `.`.
#[must_use]
pub fn domain(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

/// Look up an entity by id.
#[must_use]
pub fn resolve_entity<'a>(states: &'a States, entity_id: &str) -> Option<&'a EntityState> {
    states.get(entity_id)
}

/// Look up an entity by its display name. The first match wins.
#[must_use]
pub fn resolve_entity_by_display_name<'a>(
    states: &'a States,
    name: &str,
) -> Option<&'a EntityState> {
    states.values().find(|e| e.display_name() == name)
}
