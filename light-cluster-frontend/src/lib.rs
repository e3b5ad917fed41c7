//! Yew frontend for the light cluster card
#![warn(missing_docs)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// #![deny(clippy::unwrap_used)]
// #![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::use_self)]
// This code will not be used on concurrent threads.
#![allow(clippy::future_not_send)]
#![allow(clippy::let_unit_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::option_if_let_else)]

mod components;
mod elements;
mod services;

use light_cluster_common::catalog::CardInfo;
use tracing::error;
use wasm_bindgen::prelude::*;

pub use elements::{LightClusterCardEditorElement, LightClusterCardElement};

/// The entry point for the frontend
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    if let Err(err) = services::hass::register_card(CardInfo::light_cluster_card()) {
        error!("Failed to register card: {err}");
    }
    Ok(())
}
