//! Tests for token service

#[cfg(test)]
mod cleanup_tests;
