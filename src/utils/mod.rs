//! Helpers shared by the flows and the HTTP layer.
//!
//! - [`code_generator`] - Content-addressed short code derivation
//! - [`url_validator`] - Input URL checks for the create flow

pub mod code_generator;
pub mod url_validator;
