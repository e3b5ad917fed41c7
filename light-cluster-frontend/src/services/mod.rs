//! Services provided by the host
pub mod hass;
