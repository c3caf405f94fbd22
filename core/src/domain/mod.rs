//! Domain layer containing business entities and value objects.

pub mod entities;
pub mod secrets;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::*;
pub use value_objects::*;
