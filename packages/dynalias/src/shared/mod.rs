//! Shared module - Common types used by every feature
//!
//! Primitive identifiers and address arithmetic. No feature logic lives here.

pub mod models;

// Re-exports for convenience
pub use models::*;
