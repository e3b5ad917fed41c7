//! The snapshot of host state handed to the card
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::States;

/// The key of the caption of the effect dropdown.
pub const EFFECT_CAPTION_KEY: &str = "ui.card.light.effect";

/// The caption used when the host has no translation.
pub const EFFECT_CAPTION_FALLBACK: &str = "Effect";

/// Translated strings for one language.
pub type Strings = HashMap<String, String>;

/// The part of the host state the card uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HassSnapshot {
    /// All entity states.
    #[serde(default)]
    pub states: States,

    /// The active language.
    #[serde(default)]
    pub language: String,

    /// Translated strings, indexed by language.
    #[serde(default)]
    pub resources: HashMap<String, Strings>,
}

impl HassSnapshot {
    /// The translated strings for the active language.
    #[must_use]
    pub fn strings(&self) -> Option<&Strings> {
        self.resources.get(&self.language)
    }

    /// Translate a string, or use the fallback.
    #[must_use]
    pub fn localize(&self, key: &str, fallback: &str) -> String {
        localize(self.strings(), key, fallback)
    }
}

/// Translate a string, or use the fallback.
#[must_use]
pub fn localize(strings: Option<&Strings>, key: &str, fallback: &str) -> String {
    strings
        .and_then(|strings| strings.get(key))
        .map_or_else(|| fallback.to_string(), Clone::clone)
}
