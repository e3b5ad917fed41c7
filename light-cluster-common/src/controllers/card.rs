//! The controller behind the light cluster card
//!
//! Several entities are shown as one set of controls. Slider positions are
//! the minimum of each attribute across the entities, so the value shown is
//! one every entity can reach.
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{parse_int, Phase};
use crate::{
    aggregate::{attribute_union, min_attribute_opt, percent},
    config::{Config, ConfigError, EffectsList},
    entities::{resolve_entity, EntityState, States},
    hass::{localize, Strings, EFFECT_CAPTION_FALLBACK, EFFECT_CAPTION_KEY},
    services::{Change, Service, ServiceCall},
};

/// The lowest brightness the slider offers.
pub const BRIGHTNESS_MIN: f64 = 1.0;

/// The highest brightness the slider offers.
pub const BRIGHTNESS_MAX: f64 = 255.0;

/// A slider on the card
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Slider {
    /// The brightness slider.
    Brightness,

    /// The colour temperature slider.
    ColorTemp,
}

impl Slider {
    /// The attribute the slider controls.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Slider::Brightness => "brightness",
            Slider::ColorTemp => "color_temp",
        }
    }

    const fn change(self, value: i64) -> Change {
        match self {
            Slider::Brightness => Change::Brightness(value),
            Slider::ColorTemp => Change::ColorTemp(value),
        }
    }
}

/// The header of the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    /// The title.
    pub title: String,

    /// True if every entity is on.
    pub on: bool,
}

/// A slider as it should be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct SliderView {
    /// The slider this is.
    pub slider: Slider,

    /// The icon next to the slider.
    pub icon: String,

    /// The lowest value.
    pub min: f64,

    /// The highest value.
    pub max: f64,

    /// The current value, if any entity reports one.
    pub value: Option<f64>,

    /// The percentage to show next to the slider, if enabled.
    pub percent: Option<i32>,
}

/// The effect dropdown as it should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectListView {
    /// The caption of the dropdown.
    pub caption: String,

    /// The effects to choose from.
    pub effects: Vec<String>,

    /// The index of the current effect of the first entity.
    pub selected: Option<usize>,
}

/// Everything needed to draw the card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// The CSS classes of the card.
    pub classes: Vec<&'static str>,

    /// The header, unless hidden.
    pub header: Option<HeaderView>,

    /// Should the sliders use the full width?
    pub full_width_sliders: bool,

    /// The brightness slider, if enabled.
    pub brightness: Option<SliderView>,

    /// The colour temperature slider, if enabled.
    pub color_temp: Option<SliderView>,

    /// The effect dropdown, if enabled.
    pub effects: Option<EffectListView>,
}

/// The controller for a light cluster card
#[derive(Debug, Default)]
pub struct Controller {
    config: Option<Config>,
    pending: bool,
}

impl Controller {
    /// Create an unconfigured controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            pending: false,
        }
    }

    /// Set the configuration from the host supplied value.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid. The previous
    /// configuration is kept.
    pub fn set_config(&mut self, input: Value) -> Result<(), ConfigError> {
        let config = Config::from_value(input)?;
        self.configure(config);
        Ok(())
    }

    /// Replace the configuration with one that is already valid.
    pub fn configure(&mut self, config: Config) {
        debug!("Configured for {}", config.entities.join(", "));
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

    /// The number of rows the card needs in the host layout.
    #[must_use]
    pub fn card_size(&self) -> u32 {
        self.config.as_ref().map_or(1, Config::card_size)
    }

    /// Is a command waiting for the host to publish new states?
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// The configured entities that exist, in configured order.
    ///
    /// # Errors
    ///
    /// Returns an error if the card is not configured or none of the
    /// entities exist.
    pub fn resolve<'a>(&self, states: &'a States) -> Result<Vec<&'a EntityState>, ConfigError> {
        let config = self.config.as_ref().ok_or(ConfigError::NotConfigured)?;

        let entities: Vec<&EntityState> = config
            .entities
            .iter()
            .filter_map(|id| resolve_entity(states, id))
            .collect();

        if entities.is_empty() {
            return Err(ConfigError::NoEntities(config.entities.join(", ")));
        }

        Ok(entities)
    }

    /// Work out what the card should show.
    ///
    /// # Errors
    ///
    /// Returns an error if the card is not configured or none of the
    /// entities exist.
    pub fn render(
        &self,
        states: &States,
        strings: Option<&Strings>,
    ) -> Result<CardView, ConfigError> {
        let config = self.config.as_ref().ok_or(ConfigError::NotConfigured)?;
        let entities = self.resolve(states)?;

        let mut classes = vec!["light-cluster-card"];
        if config.shorten_cards {
            classes.push("group");
        }
        if config.child_card {
            classes.push("light-entity-child-card");
        }

        let header = (!config.hide_header).then(|| HeaderView {
            title: config.title(),
            on: all_on(&entities),
        });

        let brightness = config
            .brightness
            .then(|| brightness_view(config, &entities));

        let color_temp = config
            .color_temp
            .then(|| color_temp_view(config, &entities));

        let effects = config.effects_list.is_shown().then(|| {
            let effects = effect_list(config, states, &entities);
            let selected = entities
                .first()
                .and_then(|e| e.string("effect"))
                .and_then(|current| effects.iter().position(|e| e == current));
            EffectListView {
                caption: localize(strings, EFFECT_CAPTION_KEY, EFFECT_CAPTION_FALLBACK),
                effects,
                selected,
            }
        });

        Ok(CardView {
            classes,
            header,
            full_width_sliders: config.full_width_sliders,
            brightness,
            color_temp,
            effects,
        })
    }

    /// The host has finished drawing the card.
    ///
    /// New commands are accepted again.
    pub fn rendered(&mut self) {
        self.pending = false;
    }

    /// The toggle was clicked.
    ///
    /// Every entity is turned off if all of them are on, otherwise every
    /// entity is turned on.
    pub fn toggle(&mut self, states: &States) -> Vec<ServiceCall> {
        let entities = match self.resolve(states) {
            Ok(entities) => entities,
            Err(err) => {
                warn!("Ignoring toggle: {err}");
                return vec![];
            }
        };

        let service = if all_on(&entities) {
            Service::TurnOff
        } else {
            Service::TurnOn
        };

        self.dispatch(&entities, service, &Change::Power)
    }

    /// A slider was moved.
    ///
    /// Only entities that are on are changed. Input that is not a number is
    /// ignored.
    pub fn set_slider(&mut self, states: &States, slider: Slider, value: &str) -> Vec<ServiceCall> {
        let Some(value) = parse_int(value) else {
            debug!("Ignoring non numeric {} value {value:?}", slider.attribute());
            return vec![];
        };

        self.dispatch_to_on(states, &slider.change(value))
    }

    /// An effect was selected.
    ///
    /// Only entities that are on are changed.
    pub fn set_effect(&mut self, states: &States, effect: &str) -> Vec<ServiceCall> {
        self.dispatch_to_on(states, &Change::Effect(effect.to_string()))
    }

    fn dispatch_to_on(&mut self, states: &States, change: &Change) -> Vec<ServiceCall> {
        let entities = match self.resolve(states) {
            Ok(entities) => entities,
            Err(err) => {
                warn!("Ignoring change: {err}");
                return vec![];
            }
        };

        let on: Vec<&EntityState> = entities.into_iter().filter(|e| e.is_on()).collect();
        self.dispatch(&on, Service::TurnOn, change)
    }

    fn dispatch(
        &mut self,
        entities: &[&EntityState],
        service: Service,
        change: &Change,
    ) -> Vec<ServiceCall> {
        if self.pending {
            debug!("Dropping {service} {change:?}, waiting for update");
            return vec![];
        }

        let calls: Vec<ServiceCall> = entities
            .iter()
            .map(|e| ServiceCall::new(e, service, change))
            .collect();

        for call in &calls {
            info!("Calling {call}");
        }

        if !calls.is_empty() {
            self.pending = true;
        }

        calls
    }
}

fn all_on(entities: &[&EntityState]) -> bool {
    entities.iter().all(|e| e.is_on())
}

fn brightness_view(config: &Config, entities: &[&EntityState]) -> SliderView {
    let value = min_attribute_opt(entities, Slider::Brightness.attribute());
    SliderView {
        slider: Slider::Brightness,
        icon: config.brightness_icon.clone(),
        min: BRIGHTNESS_MIN,
        max: BRIGHTNESS_MAX,
        value,
        percent: slider_percent(config, value, 0.0, BRIGHTNESS_MAX - 1.0),
    }
}

fn color_temp_view(config: &Config, entities: &[&EntityState]) -> SliderView {
    let value = min_attribute_opt(entities, Slider::ColorTemp.attribute());
    let min = min_attribute_opt(entities, "min_mireds");
    let max = min_attribute_opt(entities, "max_mireds");

    let percent = match (min, max) {
        (Some(min), Some(max)) => slider_percent(config, value, min - 1.0, max - 1.0),
        _ => slider_percent(config, None, 0.0, 0.0),
    };

    SliderView {
        slider: Slider::ColorTemp,
        icon: config.temperature_icon.clone(),
        min: min.unwrap_or_default(),
        max: max.unwrap_or_default(),
        value,
        percent,
    }
}

fn slider_percent(config: &Config, value: Option<f64>, min: f64, max: f64) -> Option<i32> {
    config
        .show_slider_percent
        .then(|| value.map_or(0, |value| percent(value, min, max)))
}

/// The effects to offer in the dropdown.
///
/// An explicit list wins, then the `options` of a configured entity, then
/// the effects supported by any of the entities.
#[must_use]
pub fn effect_list(config: &Config, states: &States, entities: &[&EntityState]) -> Vec<String> {
    match &config.effects_list {
        EffectsList::List(effects) => effects.clone(),
        EffectsList::Entity(entity_id) => match resolve_entity(states, entity_id) {
            Some(entity) => entity.list("options").map(<[String]>::to_vec).unwrap_or_default(),
            None => attribute_union(entities, "effect_list"),
        },
        EffectsList::Enabled(_) => attribute_union(entities, "effect_list"),
    }
}

/// A configuration to start a new card with, using the first light found.
///
/// Returns `None` if there are no lights, as no valid configuration exists.
#[must_use]
pub fn stub_config(states: &States) -> Option<Value> {
    let entity = states
        .values()
        .filter(|e| e.domain() == "light")
        .map(|e| e.entity_id.as_str())
        .min()?;
    Some(json!({ "entities": [entity] }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::AttributeValue;
    use serde_json::json;

    fn light(id: &str, state: &str, brightness: f64) -> EntityState {
        EntityState::new(id, state)
            .with_attribute("brightness", AttributeValue::Number(brightness))
            .with_attribute("color_temp", AttributeValue::Number(300.0))
            .with_attribute("min_mireds", AttributeValue::Number(153.0))
            .with_attribute("max_mireds", AttributeValue::Number(500.0))
            .with_attribute(
                "effect_list",
                AttributeValue::List(vec!["Colorloop".to_string(), "Random".to_string()]),
            )
            .with_attribute("effect", AttributeValue::String("Random".to_string()))
    }

    fn to_states(entities: Vec<EntityState>) -> States {
        entities
            .into_iter()
            .map(|e| (e.entity_id.clone(), e))
            .collect()
    }

    fn controller(config: Value) -> Controller {
        let mut controller = Controller::new();
        controller.set_config(config).unwrap();
        controller
    }

    fn ids(calls: &[ServiceCall]) -> Vec<&str> {
        calls.iter().map(|c| c.data.entity_id.as_str()).collect()
    }

    #[test]
    fn test_set_config_requires_entities() {
        let mut controller = Controller::new();
        assert_eq!(controller.phase(), Phase::Unconfigured);
        assert_eq!(
            controller.set_config(json!({})),
            Err(ConfigError::MissingEntities)
        );
        assert_eq!(controller.phase(), Phase::Unconfigured);

        controller
            .set_config(json!({"entities": ["light.a"]}))
            .unwrap();
        assert_eq!(controller.phase(), Phase::Configured);

        assert!(controller.set_config(json!({})).is_err());
        assert_eq!(controller.config().unwrap().entities, vec!["light.a"]);
    }

    #[test]
    fn test_render_unconfigured() {
        let controller = Controller::new();
        assert_eq!(
            controller.render(&States::new(), None),
            Err(ConfigError::NotConfigured)
        );
        assert_eq!(controller.card_size(), 1);
    }

    #[test]
    fn test_render_all_resolved() {
        let states = to_states(vec![
            light("light.a", "on", 120.0),
            light("light.b", "off", 80.0),
        ]);
        let controller = controller(json!({"entities": ["light.a", "light.b"]}));
        assert!(controller.render(&states, None).is_ok());
    }

    #[test]
    fn test_render_drops_unresolved() {
        let states = to_states(vec![light("light.a", "on", 120.0)]);
        let controller = controller(json!({"entities": ["light.missing", "light.a"]}));
        let entities = controller.resolve(&states).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_id, "light.a");
    }

    #[test]
    fn test_render_none_resolved() {
        let states = to_states(vec![light("light.a", "on", 120.0)]);
        let controller = controller(json!({"entities": ["light.x", "light.y"]}));
        assert_eq!(
            controller.render(&states, None),
            Err(ConfigError::NoEntities("light.x, light.y".to_string()))
        );
    }

    #[test]
    fn test_render_view() {
        let states = to_states(vec![
            light("light.a", "on", 120.0),
            light("light.b", "on", 80.0),
            light("light.c", "on", 200.0),
        ]);
        let controller = controller(json!({
            "entities": ["light.a", "light.b", "light.c"],
            "header": "Lounge",
            "show_slider_percent": true,
            "child_card": true,
        }));
        let view = controller.render(&states, None).unwrap();

        assert_eq!(
            view.classes,
            vec!["light-cluster-card", "light-entity-child-card"]
        );
        assert_eq!(
            view.header,
            Some(HeaderView {
                title: "Lounge".to_string(),
                on: true
            })
        );

        let brightness = view.brightness.unwrap();
        assert_eq!(brightness.value, Some(80.0));
        assert_eq!(brightness.min, 1.0);
        assert_eq!(brightness.max, 255.0);
        assert_eq!(brightness.percent, Some(31));
        assert_eq!(brightness.icon, "weather-sunny");

        let color_temp = view.color_temp.unwrap();
        assert_eq!(color_temp.value, Some(300.0));
        assert_eq!(color_temp.min, 153.0);
        assert_eq!(color_temp.max, 500.0);
        assert_eq!(color_temp.percent, Some(42));

        let effects = view.effects.unwrap();
        assert_eq!(effects.caption, "Effect");
        assert_eq!(effects.effects.len(), 2);
        assert_eq!(
            effects.selected,
            effects.effects.iter().position(|e| e == "Random")
        );
    }

    #[test]
    fn test_render_flags() {
        let states = to_states(vec![light("light.a", "off", 120.0)]);
        let controller = controller(json!({
            "entities": ["light.a"],
            "hide_header": true,
            "brightness": false,
            "color_temp": false,
            "effects_list": false,
            "shorten_cards": true,
            "full_width_sliders": true,
        }));
        let view = controller.render(&states, None).unwrap();
        assert_eq!(view.classes, vec!["light-cluster-card", "group"]);
        assert!(view.header.is_none());
        assert!(view.brightness.is_none());
        assert!(view.color_temp.is_none());
        assert!(view.effects.is_none());
        assert!(view.full_width_sliders);
    }

    #[test]
    fn test_render_without_attributes() {
        let states = to_states(vec![EntityState::new("switch.fan", "on")]);
        let controller = controller(json!({
            "entities": ["switch.fan"],
            "show_slider_percent": true,
        }));
        let view = controller.render(&states, None).unwrap();
        let brightness = view.brightness.unwrap();
        assert_eq!(brightness.value, None);
        assert_eq!(brightness.percent, Some(0));
        let color_temp = view.color_temp.unwrap();
        assert_eq!(color_temp.value, None);
        assert_eq!(color_temp.percent, Some(0));
        let effects = view.effects.unwrap();
        assert!(effects.effects.is_empty());
        assert_eq!(effects.selected, None);
        assert_eq!(view.header.unwrap().title, "Fan");
    }

    #[test]
    fn test_percent_hidden() {
        let states = to_states(vec![light("light.a", "on", 127.0)]);
        let controller = controller(json!({"entities": ["light.a"]}));
        let view = controller.render(&states, None).unwrap();
        assert_eq!(view.brightness.unwrap().percent, None);
    }

    #[test]
    fn test_effect_caption_is_localized() {
        let states = to_states(vec![light("light.a", "on", 127.0)]);
        let controller = controller(json!({"entities": ["light.a"]}));
        let strings: Strings = [(EFFECT_CAPTION_KEY.to_string(), "Effekt".to_string())]
            .into_iter()
            .collect();
        let view = controller.render(&states, Some(&strings)).unwrap();
        assert_eq!(view.effects.unwrap().caption, "Effekt");
    }

    #[test]
    fn test_explicit_effect_list_wins() {
        let states = to_states(vec![light("light.a", "on", 127.0)]);
        let controller = controller(json!({
            "entities": ["light.a"],
            "effects_list": ["Rainbow", "Strobe"],
        }));
        let view = controller.render(&states, None).unwrap();
        let effects = view.effects.unwrap();
        assert_eq!(effects.effects, vec!["Rainbow", "Strobe"]);
        assert_eq!(effects.selected, None);
    }

    #[test]
    fn test_effect_list_from_entity() {
        let select = EntityState::new("input_select.effects", "Candle").with_attribute(
            "options",
            AttributeValue::List(vec!["Candle".to_string(), "Random".to_string()]),
        );
        let states = to_states(vec![light("light.a", "on", 127.0), select]);
        let controller = controller(json!({
            "entities": ["light.a"],
            "effects_list": "input_select.effects",
        }));
        let effects = controller.render(&states, None).unwrap().effects.unwrap();
        assert_eq!(effects.effects, vec!["Candle", "Random"]);
        assert_eq!(effects.selected, Some(1));
    }

    #[test]
    fn test_effect_list_missing_entity_falls_back() {
        let states = to_states(vec![light("light.a", "on", 127.0)]);
        let controller = controller(json!({
            "entities": ["light.a"],
            "effects_list": "input_select.missing",
        }));
        let effects = controller.render(&states, None).unwrap().effects.unwrap();
        assert_eq!(effects.effects.len(), 2);
    }

    #[test]
    fn test_toggle_turns_all_on() {
        let states = to_states(vec![
            light("light.a", "on", 1.0),
            light("light.b", "on", 1.0),
            light("light.c", "off", 1.0),
        ]);
        let mut controller = controller(json!({"entities": ["light.a", "light.b", "light.c"]}));
        let calls = controller.toggle(&states);
        assert_eq!(ids(&calls), vec!["light.a", "light.b", "light.c"]);
        assert!(calls.iter().all(|c| c.service == Service::TurnOn));
        assert!(calls.iter().all(|c| c.domain == "light"));
    }

    #[test]
    fn test_toggle_turns_all_off() {
        let states = to_states(vec![
            light("light.a", "on", 1.0),
            EntityState::new("switch.b", "on"),
        ]);
        let mut controller = controller(json!({"entities": ["light.a", "switch.b"]}));
        let calls = controller.toggle(&states);
        assert_eq!(ids(&calls), vec!["light.a", "switch.b"]);
        assert!(calls.iter().all(|c| c.service == Service::TurnOff));
        assert_eq!(calls[1].domain, "switch");
    }

    #[test]
    fn test_slider_targets_on_entities() {
        let states = to_states(vec![
            light("light.a", "on", 1.0),
            light("light.b", "off", 1.0),
        ]);
        let mut controller = controller(json!({"entities": ["light.a", "light.b"]}));
        let calls = controller.set_slider(&states, Slider::Brightness, "200");
        assert_eq!(ids(&calls), vec!["light.a"]);
        assert_eq!(calls[0].service, Service::TurnOn);
        assert_eq!(calls[0].data.brightness, Some(200));
        assert_eq!(calls[0].data.color_temp, None);
    }

    #[test]
    fn test_color_temp_slider() {
        let states = to_states(vec![light("light.a", "on", 1.0)]);
        let mut controller = controller(json!({"entities": ["light.a"]}));
        let calls = controller.set_slider(&states, Slider::ColorTemp, "250");
        assert_eq!(calls[0].data.color_temp, Some(250));
        assert_eq!(calls[0].data.brightness, None);
    }

    #[test]
    fn test_slider_ignores_non_numeric() {
        let states = to_states(vec![light("light.a", "on", 1.0)]);
        let mut controller = controller(json!({"entities": ["light.a"]}));
        assert!(controller
            .set_slider(&states, Slider::Brightness, "bright")
            .is_empty());
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_effect_targets_on_entities() {
        let states = to_states(vec![
            light("light.a", "off", 1.0),
            light("light.b", "on", 1.0),
        ]);
        let mut controller = controller(json!({"entities": ["light.a", "light.b"]}));
        let calls = controller.set_effect(&states, "Colorloop");
        assert_eq!(ids(&calls), vec!["light.b"]);
        assert_eq!(calls[0].data.effect.as_deref(), Some("Colorloop"));
    }

    #[test]
    fn test_nothing_on_does_not_block() {
        let states = to_states(vec![light("light.a", "off", 1.0)]);
        let mut controller = controller(json!({"entities": ["light.a"]}));
        assert!(controller
            .set_slider(&states, Slider::Brightness, "10")
            .is_empty());
        assert!(!controller.is_pending());
        assert_eq!(controller.toggle(&states).len(), 1);
    }

    #[test]
    fn test_commands_dropped_until_rendered() {
        let states = to_states(vec![light("light.a", "on", 1.0)]);
        let mut controller = controller(json!({"entities": ["light.a"]}));

        assert_eq!(
            controller
                .set_slider(&states, Slider::Brightness, "10")
                .len(),
            1
        );
        assert!(controller.is_pending());
        assert!(controller
            .set_slider(&states, Slider::Brightness, "20")
            .is_empty());
        assert!(controller.set_effect(&states, "Random").is_empty());
        assert!(controller.toggle(&states).is_empty());

        controller.rendered();
        assert!(!controller.is_pending());
        assert_eq!(
            controller
                .set_slider(&states, Slider::Brightness, "20")
                .len(),
            1
        );
    }

    #[test]
    fn test_stub_config() {
        let states = to_states(vec![
            EntityState::new("switch.fan", "on"),
            light("light.b", "on", 1.0),
            light("light.a", "on", 1.0),
        ]);
        let stub = stub_config(&states).unwrap();
        assert_eq!(stub, json!({"entities": ["light.a"]}));
        assert!(Config::from_value(stub).is_ok());

        let states = to_states(vec![EntityState::new("switch.fan", "on")]);
        assert_eq!(stub_config(&states), None);
        assert_eq!(stub_config(&States::new()), None);
    }

    #[test]
    fn test_card_size() {
        let controller = controller(json!({"entities": ["light.a"], "effects_list": false}));
        assert_eq!(controller.card_size(), 3);
    }
}
