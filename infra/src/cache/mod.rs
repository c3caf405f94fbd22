//! Cache module for Redis-based state
//!
//! Provides the shared Redis connection with retry logic. Rate limiting
//! counters are its main user.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use gm_shared::config::CacheConfig;
