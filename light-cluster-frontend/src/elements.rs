//! The objects the host's custom elements delegate to
//!
//! The host creates one of these per element, hands it the element to draw
//! into, and then calls `setConfig` and `setHass` as its state changes.
use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use light_cluster_common::{
    catalog::{CARD_TYPE, EDITOR_TYPE},
    config::Config,
    controllers::card::stub_config,
};
use serde_json::Value;
use tracing::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget};
use yew::{AppHandle, Callback};

use crate::components::{
    card::{self, LightClusterCard},
    editor::{self, LightClusterCardEditor},
};
use crate::services::hass::{fire_config_changed, Hass};

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn config_from_js(value: &JsValue) -> Result<Config, JsValue> {
    let value: Value = value.into_serde().map_err(to_js_error)?;
    Config::from_value(value).map_err(to_js_error)
}

/// The light cluster card, as driven by the host
#[wasm_bindgen]
pub struct LightClusterCardElement {
    root: Element,
    config: Option<Rc<Config>>,
    hass: Option<Hass>,
    handle: Option<AppHandle<LightClusterCard>>,
}

#[wasm_bindgen]
impl LightClusterCardElement {
    /// Create a card that draws into `root`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            root,
            config: None,
            hass: None,
            handle: None,
        }
    }

    /// The tag name to define the card element under.
    #[wasm_bindgen(js_name = elementName)]
    #[must_use]
    pub fn element_name() -> String {
        CARD_TYPE.to_string()
    }

    /// Set the card configuration.
    ///
    /// Throws if the configuration is invalid.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: &JsValue) -> Result<(), JsValue> {
        let config = config_from_js(config)?;
        self.config = Some(Rc::new(config));
        self.mount();
        Ok(())
    }

    /// Set the host state.
    #[wasm_bindgen(js_name = setHass)]
    pub fn set_hass(&mut self, hass: JsValue) -> Result<(), JsValue> {
        self.hass = Some(Hass::from_js(hass).map_err(to_js_error)?);
        self.mount();
        Ok(())
    }

    /// The number of rows the card needs in the host layout.
    #[wasm_bindgen(js_name = getCardSize)]
    #[must_use]
    pub fn get_card_size(&self) -> u32 {
        match (&self.config, &self.hass) {
            (Some(config), Some(_)) => config.card_size(),
            _ => 1,
        }
    }

    /// A configuration to start a new card with.
    ///
    /// Returns `undefined` if the host has no lights.
    #[wasm_bindgen(js_name = getStubConfig)]
    pub fn get_stub_config(hass: JsValue) -> Result<JsValue, JsValue> {
        let hass = Hass::from_js(hass).map_err(to_js_error)?;
        match stub_config(&hass.snapshot().states) {
            Some(stub) => JsValue::from_serde(&stub).map_err(to_js_error),
            None => {
                debug!("No lights for a stub config");
                Ok(JsValue::UNDEFINED)
            }
        }
    }

    /// Create the editor for this card, drawing into `root`.
    #[wasm_bindgen(js_name = getConfigElement)]
    #[must_use]
    pub fn get_config_element(root: Element) -> LightClusterCardEditorElement {
        LightClusterCardEditorElement::new(root)
    }

    fn mount(&mut self) {
        let (Some(config), Some(hass)) = (&self.config, &self.hass) else {
            debug!("Waiting for both config and hass");
            return;
        };

        let props = card::Props {
            hass: hass.clone(),
            config: config.clone(),
        };

        if let Some(handle) = self.handle.as_mut() {
            handle.update(props);
            return;
        }

        let handle =
            yew::Renderer::<LightClusterCard>::with_root_and_props(self.root.clone(), props)
                .render();
        self.handle = Some(handle);
    }
}

/// The card editor, as driven by the host
#[wasm_bindgen]
pub struct LightClusterCardEditorElement {
    root: Element,
    config: Option<Rc<Config>>,
    hass: Option<Hass>,
    handle: Option<AppHandle<LightClusterCardEditor>>,
}

#[wasm_bindgen]
impl LightClusterCardEditorElement {
    /// Create an editor that draws into `root`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            root,
            config: None,
            hass: None,
            handle: None,
        }
    }

    /// The tag name to define the editor element under.
    #[wasm_bindgen(js_name = elementName)]
    #[must_use]
    pub fn element_name() -> String {
        EDITOR_TYPE.to_string()
    }

    /// Set the configuration being edited.
    ///
    /// Throws if the configuration is invalid.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: &JsValue) -> Result<(), JsValue> {
        let config = config_from_js(config)?;
        self.config = Some(Rc::new(config));
        self.mount();
        Ok(())
    }

    /// Set the host state.
    #[wasm_bindgen(js_name = setHass)]
    pub fn set_hass(&mut self, hass: JsValue) -> Result<(), JsValue> {
        self.hass = Some(Hass::from_js(hass).map_err(to_js_error)?);
        self.mount();
        Ok(())
    }

    fn mount(&mut self) {
        let Some(config) = &self.config else {
            debug!("Waiting for config");
            return;
        };

        let target: EventTarget = self.root.clone().into();
        let on_config_changed = Callback::from(move |config: Config| {
            if let Err(err) = fire_config_changed(&target, &config) {
                error!("Failed to send config: {err}");
            }
        });

        let props = editor::Props {
            hass: self.hass.clone(),
            config: config.clone(),
            on_config_changed,
        };

        if let Some(handle) = self.handle.as_mut() {
            handle.update(props);
            return;
        }

        let handle =
            yew::Renderer::<LightClusterCardEditor>::with_root_and_props(self.root.clone(), props)
                .render();
        self.handle = Some(handle);
    }
}
