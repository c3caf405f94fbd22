//! Tests for verification token service
