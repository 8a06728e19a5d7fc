//! Domain layer for the PEP client.

pub mod validate;

pub use validate::{RequestDefaults, validate_and_default};
