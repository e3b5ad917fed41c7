//! The bridge to the host's `hass` object
use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Array, Function, Promise, Reflect};
use light_cluster_common::{
    catalog::{self, CardInfo},
    config::Config,
    hass::HassSnapshot,
    services::ServiceCall,
};
use serde::de::DeserializeOwned;
use tap::Pipe;
use thiserror::Error;
use tracing::{debug, error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, EventTarget};

/// The name of the event sent when the editor changes the configuration.
pub const CONFIG_CHANGED: &str = "config-changed";

/// An error talking to the host
#[derive(Error, Debug)]
pub enum HostError {
    /// A property of the host could not be read.
    #[error("Failed to read {0}: {1}")]
    Deserialize(&'static str, String),

    /// A value could not be converted for the host.
    #[error("Failed to convert {0}: {1}")]
    Serialize(&'static str, String),

    /// The host does not provide a function.
    #[error("Host has no function {0}")]
    MissingFunction(&'static str),

    /// The host raised an exception.
    #[error("Call to {0} failed: {1}")]
    Call(&'static str, String),

    /// There is no browser window.
    #[error("No window")]
    NoWindow,
}

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn read_property<T: DeserializeOwned + Default>(
    object: &JsValue,
    name: &'static str,
) -> Result<T, HostError> {
    let value = Reflect::get(object, &JsValue::from_str(name))
        .map_err(|e| HostError::Deserialize(name, js_error(&e)))?;

    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }

    value
        .into_serde()
        .map_err(|e| HostError::Deserialize(name, e.to_string()))
}

fn get_function(object: &JsValue, name: &'static str) -> Result<Function, HostError> {
    Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or(HostError::MissingFunction(name))
}

/// The host state handed to the card
#[derive(Clone)]
pub struct Hass {
    snapshot: Rc<HassSnapshot>,
    object: JsValue,
}

impl PartialEq for Hass {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.snapshot, &other.snapshot)
    }
}

impl Hass {
    /// Read the parts of the host's `hass` object the card uses.
    pub fn from_js(object: JsValue) -> Result<Self, HostError> {
        let snapshot = HassSnapshot {
            states: read_property(&object, "states")?,
            language: read_property(&object, "language")?,
            resources: read_property(&object, "resources")?,
        }
        .pipe(Rc::new);

        debug!("Read {} entity states", snapshot.states.len());
        Ok(Self { snapshot, object })
    }

    /// The host state.
    #[must_use]
    pub fn snapshot(&self) -> &HassSnapshot {
        &self.snapshot
    }

    /// Ask the host to call a service. The result is not waited for.
    pub fn call_service(&self, call: &ServiceCall) -> Result<(), HostError> {
        let function = get_function(&self.object, "callService")?;
        let data = JsValue::from_serde(&call.data)
            .map_err(|e| HostError::Serialize("service data", e.to_string()))?;

        function
            .call3(
                &self.object,
                &JsValue::from_str(&call.domain),
                &JsValue::from_str(call.service.as_str()),
                &data,
            )
            .map_err(|e| HostError::Call("callService", js_error(&e)))?;

        Ok(())
    }
}

async fn import_more_info_control(domain: &str) -> Result<(), HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let loader = get_function(&window, "loadCardHelpers")?;

    let promise = loader
        .call0(&window)
        .map_err(|e| HostError::Call("loadCardHelpers", js_error(&e)))?;
    let helpers = JsFuture::from(Promise::from(promise))
        .await
        .map_err(|e| HostError::Call("loadCardHelpers", js_error(&e)))?;

    get_function(&helpers, "importMoreInfoControl")?
        .call1(&helpers, &JsValue::from_str(domain))
        .map_err(|e| HostError::Call("importMoreInfoControl", js_error(&e)))?;

    Ok(())
}

/// Preload the host's "more info" control for a domain, if the host can.
pub async fn load_card_helpers(domain: &'static str) {
    match import_more_info_control(domain).await {
        Ok(()) => debug!("Loaded more info control for {domain}"),
        Err(HostError::MissingFunction(name)) => debug!("Host has no {name}"),
        Err(err) => error!("Failed to load card helpers: {err}"),
    }
}

/// Send the new configuration to the host.
pub fn fire_config_changed(target: &EventTarget, config: &Config) -> Result<(), HostError> {
    let config = config
        .to_value()
        .map_err(|e| HostError::Serialize("config", e.to_string()))?;
    let detail = JsValue::from_serde(&serde_json::json!({ "config": config }))
        .map_err(|e| HostError::Serialize("config", e.to_string()))?;

    let mut init = CustomEventInit::new();
    init.bubbles(true).composed(true).detail(&detail);

    let event = CustomEvent::new_with_event_init_dict(CONFIG_CHANGED, &init)
        .map_err(|e| HostError::Call("CustomEvent", js_error(&e)))?;
    target
        .dispatch_event(&event)
        .map_err(|e| HostError::Call("dispatchEvent", js_error(&e)))?;

    Ok(())
}

/// Advertise the card in the host's card picker.
///
/// Registering the same card type again does nothing.
pub fn register_card(card: CardInfo) -> Result<(), HostError> {
    if !catalog::register(card.clone()) {
        return Ok(());
    }

    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let key = JsValue::from_str("customCards");
    let cards = Reflect::get(&window, &key)
        .map_err(|e| HostError::Deserialize("customCards", js_error(&e)))?;

    let cards: Array = if Array::is_array(&cards) {
        cards.unchecked_into()
    } else {
        let cards = Array::new();
        Reflect::set(&window, &key, &cards)
            .map_err(|e| HostError::Call("customCards", js_error(&e)))?;
        cards
    };

    let entry = JsValue::from_serde(&card)
        .map_err(|e| HostError::Serialize("card", e.to_string()))?;
    cards.push(&entry);

    info!("Registered card {}", card.card_type);
    Ok(())
}
