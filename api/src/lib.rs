//! Gurmania HTTP API
//!
//! Exposes the application factory and its building blocks so the binary and
//! the integration tests assemble exactly the same service.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::AppState;
