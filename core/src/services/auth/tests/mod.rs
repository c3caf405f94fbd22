//! Tests for authentication service

#[cfg(test)]
mod two_factor_login_tests;
