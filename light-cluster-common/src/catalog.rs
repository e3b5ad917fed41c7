//! The process wide catalog of cards advertised to the host
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The element name of the card.
pub const CARD_TYPE: &str = "light-cluster-card";

/// The element name of the card editor.
pub const EDITOR_TYPE: &str = "light-cluster-card-editor";

/// A card as listed in the host's card picker
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CardInfo {
    /// The element name of the card.
    #[serde(rename = "type")]
    pub card_type: String,

    /// The name shown to the user.
    pub name: String,

    /// A short description shown to the user.
    pub description: String,
}

impl CardInfo {
    /// The catalog entry for the light cluster card.
    #[must_use]
    pub fn light_cluster_card() -> Self {
        Self {
            card_type: CARD_TYPE.to_string(),
            name: "Light Cluster Card".to_string(),
            description: "Control lights and switches".to_string(),
        }
    }
}

static CATALOG: Mutex<Vec<CardInfo>> = Mutex::new(Vec::new());

/// Register a card, unless a card of the same type is already registered.
///
/// Returns true if the card was added.
pub fn register(info: CardInfo) -> bool {
    let mut catalog = CATALOG.lock().unwrap_or_else(PoisonError::into_inner);
    if catalog.iter().any(|c| c.card_type == info.card_type) {
        debug!("Card {} already registered", info.card_type);
        return false;
    }
    debug!("Registering card {}", info.card_type);
    catalog.push(info);
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_is_idempotent() {
        let info = CardInfo {
            card_type: "test-card".to_string(),
            name: "Test".to_string(),
            description: "A test card".to_string(),
        };
        assert!(register(info.clone()));
        assert!(!register(info.clone()));

        let renamed = CardInfo {
            name: "Renamed".to_string(),
            ..info
        };
        assert!(!register(renamed));
    }

    #[test]
    fn test_card_info() {
        let info = CardInfo::light_cluster_card();
        assert_eq!(
            json!({
                "type": "light-cluster-card",
                "name": "Light Cluster Card",
                "description": "Control lights and switches",
            }),
            serde_json::to_value(info).unwrap()
        );
    }
}
