//! The controller behind the card editor
use serde_json::Value;
use tracing::{debug, warn};

use super::Phase;
use crate::{
    config::{Config, ConfigError, EffectsList},
    entities::States,
};

/// A text field of the editor
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextField {
    /// The header of the card.
    Header,

    /// The icon of the brightness slider.
    BrightnessIcon,

    /// The icon of the colour temperature slider.
    TemperatureIcon,
}

impl TextField {
    /// Every text field, in display order.
    pub const ALL: [TextField; 3] = [
        TextField::Header,
        TextField::BrightnessIcon,
        TextField::TemperatureIcon,
    ];

    /// The label shown next to the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TextField::Header => "Header",
            TextField::BrightnessIcon => "Brightness Icon",
            TextField::TemperatureIcon => "Temperature Icon",
        }
    }
}

/// A boolean option of the editor
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flag {
    /// Show the brightness slider.
    Brightness,

    /// Show the colour temperature slider.
    ColorTemp,

    /// Show the effect dropdown.
    EffectsList,

    /// Hide the header.
    HideHeader,

    /// Full width sliders.
    FullWidthSliders,

    /// Show the slider percentage.
    ShowSliderPercent,

    /// Style as a child card.
    ChildCard,
}

impl Flag {
    /// Every flag, in display order.
    pub const ALL: [Flag; 7] = [
        Flag::Brightness,
        Flag::ColorTemp,
        Flag::EffectsList,
        Flag::HideHeader,
        Flag::FullWidthSliders,
        Flag::ShowSliderPercent,
        Flag::ChildCard,
    ];

    /// The configuration key of the flag.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Flag::Brightness => "brightness",
            Flag::ColorTemp => "color_temp",
            Flag::EffectsList => "effects_list",
            Flag::HideHeader => "hide_header",
            Flag::FullWidthSliders => "full_width_sliders",
            Flag::ShowSliderPercent => "show_slider_percent",
            Flag::ChildCard => "child_card",
        }
    }

    /// The label shown next to the checkbox.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Flag::Brightness => "Show Brightness",
            Flag::ColorTemp => "Show Color Temp",
            Flag::EffectsList => "Show Effects List",
            Flag::HideHeader => "Hide Header",
            Flag::FullWidthSliders => "Full Width Sliders",
            Flag::ShowSliderPercent => "Show Slider Percent",
            Flag::ChildCard => "Child Card",
        }
    }

    /// Is the flag set in the configuration?
    #[must_use]
    pub const fn get(self, config: &Config) -> bool {
        match self {
            Flag::Brightness => config.brightness,
            Flag::ColorTemp => config.color_temp,
            Flag::EffectsList => config.effects_list.is_shown(),
            Flag::HideHeader => config.hide_header,
            Flag::FullWidthSliders => config.full_width_sliders,
            Flag::ShowSliderPercent => config.show_slider_percent,
            Flag::ChildCard => config.child_card,
        }
    }
}

/// A change made in the editor
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigChange {
    /// A text field was edited.
    Text(TextField, String),

    /// A checkbox was clicked.
    Flag(Flag, bool),

    /// An entity was selected or deselected.
    Entity {
        /// The entity.
        entity_id: String,

        /// Is it now selected?
        checked: bool,
    },
}

impl ConfigChange {
    /// Apply the change to a configuration.
    ///
    /// Returns false if the change would leave the card without entities.
    pub fn apply_to_config(&self, config: &mut Config) -> bool {
        match self {
            ConfigChange::Text(TextField::Header, header) => {
                config.header = Some(header.clone());
            }
            ConfigChange::Text(TextField::BrightnessIcon, icon) => {
                config.brightness_icon.clone_from(icon);
            }
            ConfigChange::Text(TextField::TemperatureIcon, icon) => {
                config.temperature_icon.clone_from(icon);
            }
            ConfigChange::Flag(flag, checked) => {
                let checked = *checked;
                match flag {
                    Flag::Brightness => config.brightness = checked,
                    Flag::ColorTemp => config.color_temp = checked,
                    Flag::EffectsList => config.effects_list = EffectsList::Enabled(checked),
                    Flag::HideHeader => config.hide_header = checked,
                    Flag::FullWidthSliders => config.full_width_sliders = checked,
                    Flag::ShowSliderPercent => config.show_slider_percent = checked,
                    Flag::ChildCard => config.child_card = checked,
                }
            }
            ConfigChange::Entity {
                entity_id,
                checked: true,
            } => {
                if !config.entities.contains(entity_id) {
                    config.entities.push(entity_id.clone());
                }
            }
            ConfigChange::Entity {
                entity_id,
                checked: false,
            } => {
                if config.entities.len() == 1 && config.entities[0] == *entity_id {
                    return false;
                }
                config.entities.retain(|e| e != entity_id);
            }
        }
        true
    }
}

/// An entity offered in the editor
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntityOption {
    /// The id of the entity.
    pub entity_id: String,

    /// The name shown to the user.
    pub name: String,

    /// Is the entity on the card?
    pub checked: bool,
}

/// A text field as drawn in the editor
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextFieldView {
    /// The field.
    pub field: TextField,

    /// The configured value, empty if not set.
    pub value: String,

    /// What the card uses when the field is empty.
    pub placeholder: Option<String>,
}

/// Everything needed to draw the editor
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EditorView {
    /// The text fields.
    pub text: Vec<TextFieldView>,

    /// The entities that can be added to the card.
    pub entities: Vec<EntityOption>,

    /// The flags and their values.
    pub flags: Vec<(Flag, bool)>,
}

/// The controller for the card editor
#[derive(Debug, Default)]
pub struct Controller {
    config: Option<Config>,
    first_rendered: bool,
}

impl Controller {
    /// Create an unconfigured controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            first_rendered: false,
        }
    }

    /// Set the configuration from the host supplied value.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn set_config(&mut self, input: Value) -> Result<(), ConfigError> {
        self.config = Some(Config::from_value(input)?);
        Ok(())
    }

    /// Replace the configuration with one that is already valid.
    pub fn configure(&mut self, config: Config) {
        self.config = Some(config);
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// The lifecycle phase of the controller.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.config.is_some() {
            Phase::Configured
        } else {
            Phase::Unconfigured
        }
    }

    /// The editor has been drawn.
    pub fn rendered(&mut self) {
        self.first_rendered = true;
    }

    /// Work out what the editor should show.
    ///
    /// Returns `None` until configured. Only `light` entities are offered.
    #[must_use]
    pub fn view(&self, states: &States) -> Option<EditorView> {
        let config = self.config.as_ref()?;

        let text = TextField::ALL
            .iter()
            .map(|field| {
                let (value, placeholder) = match field {
                    TextField::Header => (
                        config.header.clone().unwrap_or_default(),
                        Some(config.title()),
                    ),
                    TextField::BrightnessIcon => (config.brightness_icon.clone(), None),
                    TextField::TemperatureIcon => (config.temperature_icon.clone(), None),
                };
                TextFieldView {
                    field: *field,
                    value,
                    placeholder,
                }
            })
            .collect();

        let mut entities: Vec<EntityOption> = states
            .values()
            .filter(|e| e.domain() == "light")
            .map(|e| EntityOption {
                entity_id: e.entity_id.clone(),
                name: e.display_name().to_string(),
                checked: config.entities.contains(&e.entity_id),
            })
            .collect();
        entities.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

        let flags = Flag::ALL
            .iter()
            .map(|flag| (*flag, flag.get(config)))
            .collect();

        Some(EditorView {
            text,
            entities,
            flags,
        })
    }

    /// Apply a change from the form.
    ///
    /// Returns the new configuration to hand to the host, or `None` if
    /// nothing should be emitted. Nothing is emitted before the editor has
    /// been drawn with host state.
    pub fn update(&mut self, change: &ConfigChange, has_states: bool) -> Option<Config> {
        if !self.first_rendered || !has_states {
            debug!("Ignoring {change:?} before first render");
            return None;
        }

        let mut config = self.config.clone()?;
        if !change.apply_to_config(&mut config) {
            warn!("Ignoring {change:?}, card needs at least one entity");
            return None;
        }

        debug!("Config changed: {change:?}");
        self.config = Some(config.clone());
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::DEFAULT_BRIGHTNESS_ICON;
    use crate::entities::{AttributeValue, EntityState};
    use serde_json::json;

    fn states() -> States {
        let entities = vec![
            EntityState::new("light.kitchen", "on").with_attribute(
                "friendly_name",
                AttributeValue::String("Kitchen".to_string()),
            ),
            EntityState::new("light.hall", "off"),
            EntityState::new("switch.fan", "off"),
        ];
        entities
            .into_iter()
            .map(|e| (e.entity_id.clone(), e))
            .collect()
    }

    fn controller() -> Controller {
        let mut controller = Controller::new();
        controller
            .set_config(json!({"entities": ["light.kitchen"]}))
            .unwrap();
        controller
    }

    #[test]
    fn test_no_emit_before_render() {
        let mut controller = controller();
        let change = ConfigChange::Flag(Flag::HideHeader, true);
        assert_eq!(controller.update(&change, true), None);

        controller.rendered();
        assert_eq!(controller.update(&change, false), None);

        let config = controller.update(&change, true).unwrap();
        assert!(config.hide_header);
        assert!(controller.config().unwrap().hide_header);
    }

    #[test]
    fn test_host_keys_survive_edit() {
        let mut controller = Controller::new();
        controller
            .set_config(json!({
                "type": "custom:light-cluster-card",
                "entities": ["light.kitchen"],
                "card_mod": {"style": "ha-card { color: red; }"},
            }))
            .unwrap();
        controller.rendered();

        let config = controller
            .update(&ConfigChange::Flag(Flag::HideHeader, true), true)
            .unwrap();
        let value = config.to_value().unwrap();
        assert_eq!(value["type"], json!("custom:light-cluster-card"));
        assert_eq!(value["card_mod"]["style"], json!("ha-card { color: red; }"));
        assert_eq!(value["hide_header"], json!(true));
        assert_eq!(value["entities"], json!(["light.kitchen"]));
    }

    #[test]
    fn test_text_change() {
        let mut controller = controller();
        controller.rendered();

        let config = controller
            .update(&ConfigChange::Text(TextField::Header, "Lounge".to_string()), true)
            .unwrap();
        assert_eq!(config.header.as_deref(), Some("Lounge"));

        let config = controller
            .update(
                &ConfigChange::Text(TextField::BrightnessIcon, "brightness-5".to_string()),
                true,
            )
            .unwrap();
        assert_eq!(config.brightness_icon, "brightness-5");
        assert_eq!(config.header.as_deref(), Some("Lounge"));
    }

    #[test]
    fn test_effects_list_flag() {
        let mut controller = Controller::new();
        controller
            .set_config(json!({"entities": ["light.kitchen"], "effects_list": ["Rainbow"]}))
            .unwrap();
        controller.rendered();
        let config = controller
            .update(&ConfigChange::Flag(Flag::EffectsList, false), true)
            .unwrap();
        assert_eq!(config.effects_list, EffectsList::Enabled(false));
    }

    #[test]
    fn test_entity_changes() {
        let mut controller = controller();
        controller.rendered();

        let add = ConfigChange::Entity {
            entity_id: "light.hall".to_string(),
            checked: true,
        };
        let config = controller.update(&add, true).unwrap();
        assert_eq!(config.entities, vec!["light.kitchen", "light.hall"]);

        let config = controller.update(&add, true).unwrap();
        assert_eq!(config.entities, vec!["light.kitchen", "light.hall"]);

        let remove = ConfigChange::Entity {
            entity_id: "light.kitchen".to_string(),
            checked: false,
        };
        let config = controller.update(&remove, true).unwrap();
        assert_eq!(config.entities, vec!["light.hall"]);
    }

    #[test]
    fn test_cannot_remove_last_entity() {
        let mut controller = controller();
        controller.rendered();
        let remove = ConfigChange::Entity {
            entity_id: "light.kitchen".to_string(),
            checked: false,
        };
        assert_eq!(controller.update(&remove, true), None);
        assert_eq!(
            controller.config().unwrap().entities,
            vec!["light.kitchen"]
        );
    }

    #[test]
    fn test_view() {
        let controller = controller();
        let view = controller.view(&states()).unwrap();

        assert_eq!(
            view.text[0],
            TextFieldView {
                field: TextField::Header,
                value: String::new(),
                placeholder: Some("Kitchen".to_string()),
            }
        );
        assert_eq!(view.text[1].value, DEFAULT_BRIGHTNESS_ICON);
        assert_eq!(view.text[1].placeholder, None);
        assert_eq!(
            view.entities,
            vec![
                EntityOption {
                    entity_id: "light.hall".to_string(),
                    name: "light.hall".to_string(),
                    checked: false,
                },
                EntityOption {
                    entity_id: "light.kitchen".to_string(),
                    name: "Kitchen".to_string(),
                    checked: true,
                },
            ]
        );
        assert_eq!(view.flags.len(), Flag::ALL.len());
        assert!(view.flags.contains(&(Flag::Brightness, true)));
        assert!(view.flags.contains(&(Flag::HideHeader, false)));
    }

    #[test]
    fn test_view_configured_header() {
        let mut controller = Controller::new();
        controller
            .set_config(json!({"entities": ["light.kitchen"], "header": "Lounge"}))
            .unwrap();
        let view = controller.view(&states()).unwrap();
        assert_eq!(view.text[0].value, "Lounge");
        assert_eq!(view.text[0].placeholder.as_deref(), Some("Lounge"));
    }

    #[test]
    fn test_view_unconfigured() {
        let controller = Controller::new();
        assert_eq!(controller.phase(), Phase::Unconfigured);
        assert!(controller.view(&states()).is_none());
    }
}
