//! Tests for two-factor service
