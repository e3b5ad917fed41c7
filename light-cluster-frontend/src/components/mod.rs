//! Yew components for the light cluster card

pub mod card;
pub mod editor;
mod forms;
