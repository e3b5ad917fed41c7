//! Card configuration
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Icon used for the brightness slider when none is configured.
pub const DEFAULT_BRIGHTNESS_ICON: &str = "weather-sunny";

/// Icon used for the colour temperature slider when none is configured.
pub const DEFAULT_TEMPERATURE_ICON: &str = "thermometer";

/// An error in the card configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration has no entity list, or it is empty.
    #[error("entity id list required.")]
    MissingEntities,

    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The card was rendered before it was configured.
    #[error("Card has not been configured")]
    NotConfigured,

    /// None of the configured entities exist.
    #[error("Invalid entity list: {0}")]
    NoEntities(String),
}

/// How the effect dropdown is configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectsList {
    /// Show or hide the dropdown, using the effects of the lights.
    Enabled(bool),

    /// Show the dropdown with exactly these effects.
    List(Vec<String>),

    /// Show the dropdown with the `options` of this entity.
    Entity(String),
}

impl EffectsList {
    /// Should the effect dropdown be shown?
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        match self {
            EffectsList::Enabled(enabled) => *enabled,
            EffectsList::List(_) | EffectsList::Entity(_) => true,
        }
    }
}

/// The configuration for a light cluster card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// The entities controlled by the card.
    pub entities: Vec<String>,

    /// The title of the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Show the brightness slider.
    pub brightness: bool,

    /// Show the colour temperature slider.
    pub color_temp: bool,

    /// Show the effect dropdown, and where the effects come from.
    pub effects_list: EffectsList,

    /// Hide the header and toggle.
    pub hide_header: bool,

    /// Make the sliders use the full width of the card.
    pub full_width_sliders: bool,

    /// Show the slider position as a percentage.
    pub show_slider_percent: bool,

    /// Style the card for use inside another card.
    pub child_card: bool,

    /// Use a compact layout.
    pub shorten_cards: bool,

    /// The icon for the brightness slider.
    pub brightness_icon: String,

    /// The icon for the colour temperature slider.
    pub temperature_icon: String,

    /// Keys the card does not use, such as the host's `type`.
    ///
    /// Kept so the editor hands them back to the host.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_table() -> Map<String, Value> {
    let defaults = json!({
        "brightness": true,
        "color_temp": true,
        "effects_list": true,
        "hide_header": false,
        "full_width_sliders": false,
        "show_slider_percent": false,
        "child_card": false,
        "shorten_cards": false,
        "brightness_icon": DEFAULT_BRIGHTNESS_ICON,
        "temperature_icon": DEFAULT_TEMPERATURE_ICON,
    });

    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Config {
    /// Create a configuration from the host supplied value.
    ///
    /// The value is merged over the defaults, field by field.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, has no entities, or a
    /// field has the wrong type.
    pub fn from_value(input: Value) -> Result<Self, ConfigError> {
        let Value::Object(input) = input else {
            return Err(ConfigError::Invalid(
                "configuration must be an object".to_string(),
            ));
        };

        if !input.contains_key("entities") {
            return Err(ConfigError::MissingEntities);
        }

        let mut merged = default_table();
        merged.extend(input);

        let config: Config = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if config.entities.is_empty() {
            return Err(ConfigError::MissingEntities);
        }

        Ok(config)
    }

    /// Create a configuration for these entities with every default.
    #[must_use]
    pub fn for_entities(entities: Vec<String>) -> Self {
        Self {
            entities,
            header: None,
            brightness: true,
            color_temp: true,
            effects_list: EffectsList::Enabled(true),
            hide_header: false,
            full_width_sliders: false,
            show_slider_percent: false,
            child_card: false,
            shorten_cards: false,
            brightness_icon: DEFAULT_BRIGHTNESS_ICON.to_string(),
            temperature_icon: DEFAULT_TEMPERATURE_ICON.to_string(),
            extra: Map::new(),
        }
    }

    /// The title of the card.
    ///
    /// If no header is configured it is derived from the first entity id.
    #[must_use]
    pub fn title(&self) -> String {
        match self.header.as_deref() {
            Some(header) if !header.is_empty() => header.to_string(),
            _ => self
                .entities
                .first()
                .map(|id| title_from_entity_id(id))
                .unwrap_or_default(),
        }
    }

    /// The number of rows the card needs in the host layout.
    #[must_use]
    pub fn card_size(&self) -> u32 {
        let rows = [
            !self.hide_header,
            self.brightness,
            self.color_temp,
            self.effects_list.is_shown(),
        ];
        let count = rows.iter().filter(|shown| **shown).count();
        u32::try_from(count).unwrap_or(1).max(1)
    }

    /// The configuration as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn title_from_entity_id(entity_id: &str) -> String {
    let name = entity_id
        .split_once('.')
        .map_or(entity_id, |(_, name)| name)
        .replace('_', " ");

    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
