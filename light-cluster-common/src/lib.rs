//! Common stuff shared between the light cluster card and its editor
#![warn(missing_docs)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::use_self)]

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod entities;
pub mod hass;
pub mod services;
