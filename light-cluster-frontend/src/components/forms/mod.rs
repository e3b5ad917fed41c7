//! Form widgets used by the card editor
pub mod checkbox;
pub mod text_input;
