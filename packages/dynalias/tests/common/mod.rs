//! Common test utilities for dynalias
//!
//! Trace builders and report assertions shared by the integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
