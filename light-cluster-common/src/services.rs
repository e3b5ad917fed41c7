//! Service calls sent to the host
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::entities::EntityState;

/// A service to call on an entity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Turn the entity on, optionally with new attributes.
    TurnOn,

    /// Turn the entity off.
    TurnOff,
}

impl Service {
    /// The name of the service as known by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Service::TurnOn => "turn_on",
            Service::TurnOff => "turn_off",
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The payload of a service call.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceData {
    /// The entity to act on.
    pub entity_id: String,

    /// The new brightness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,

    /// The new colour temperature in mireds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<i64>,

    /// The new effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

/// The attribute a service call changes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Change {
    /// Only switch on or off.
    Power,

    /// Set the brightness.
    Brightness(i64),

    /// Set the colour temperature.
    ColorTemp(i64),

    /// Set the effect.
    Effect(String),
}

/// A call to a service of the host.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    /// The domain of the service, for example `light`.
    pub domain: String,

    /// The service to call.
    pub service: Service,

    /// The payload of the call.
    pub data: ServiceData,
}

impl ServiceCall {
    /// Create a service call for the entity.
    ///
    /// The domain is taken from the entity id.
    #[must_use]
    pub fn new(entity: &EntityState, service: Service, change: &Change) -> Self {
        let mut data = ServiceData {
            entity_id: entity.entity_id.clone(),
            ..ServiceData::default()
        };

        match change {
            Change::Power => {}
            Change::Brightness(brightness) => data.brightness = Some(*brightness),
            Change::ColorTemp(color_temp) => data.color_temp = Some(*color_temp),
            Change::Effect(effect) => data.effect = Some(effect.clone()),
        }

        Self {
            domain: entity.domain().to_string(),
            service,
            data,
        }
    }
}

impl Display for ServiceCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} {}", self.domain, self.service, self.data.entity_id)
    }
}
