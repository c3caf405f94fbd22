//! Common utility functions

pub mod email;
pub mod validation;

pub use validation::{validate_password, validators, ValidationError, ValidationErrors};
