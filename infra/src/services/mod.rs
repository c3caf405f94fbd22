//! Infrastructure implementations of core service traits

pub mod auth;
