//! Application layer for the dynamic points-to relation
//!
//! - **AliasEngine**: versioned, context-sensitive alias discovery
//! - **PointeeCollector**: allocator-level points-to sets
//! - **analyze**: picks one of the two from configuration
//! - **collect_aliases** / **collect_pointees**: replay into one variant directly

pub mod analysis;
pub mod engine;
pub mod pointee;
pub mod stats;

pub use analysis::{analyze, collect_aliases, collect_pointees};
pub use engine::AliasEngine;
pub use pointee::{PointeeAnalysis, PointeeCollector};
pub use stats::EngineStats;
