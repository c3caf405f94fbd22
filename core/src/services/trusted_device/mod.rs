//! Trusted devices: browsers that skip the second factor for a while

mod service;

pub use service::TrustedDeviceService;
