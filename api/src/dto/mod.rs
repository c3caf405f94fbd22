//! Request and response bodies of the HTTP API

pub mod account;
pub mod admin;
pub mod auth;
pub mod instructor;

pub use account::*;
pub use admin::*;
pub use auth::*;
pub use instructor::*;
