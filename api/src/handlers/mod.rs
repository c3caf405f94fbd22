pub mod client;
pub mod cookies;
pub mod error;

pub use error::{ApiError, ApiResult};
