//! Shared test utilities for callsight integration tests.
//!
//! This module provides builder patterns for creating call records
//! programmatically.

pub mod builders;

pub use builders::*;
