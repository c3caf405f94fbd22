//! Two-factor settings and backup codes

mod service;

#[cfg(test)]
mod tests;

pub use service::TwoFactorService;
