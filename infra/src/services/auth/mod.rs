//! Authentication-related infrastructure services

mod limits;
pub mod memory_rate_limiter;
pub mod rate_limiter;

#[cfg(test)]
mod tests;

pub use limits::ScopeLimit;
pub use memory_rate_limiter::InMemoryRateLimiter;
pub use rate_limiter::RedisRateLimiter;
