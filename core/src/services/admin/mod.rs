//! Admin moderation that touches session security

mod service;

pub use service::AdminUserService;
