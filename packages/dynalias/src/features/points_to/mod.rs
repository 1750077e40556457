//! # Dynamic Points-to Analysis
//!
//! Trace-driven points-to bookkeeping. A pointer definition is a value
//! tagged with the invocation it was observed in; its target is an address
//! tagged with the version of the allocation occupying it. Two definitions
//! alias when they hold the same target at the same moment.
//!
//! ## Usage
//! ```text
//! use dynalias::features::points_to::AliasEngine;
//!
//! let mut engine = AliasEngine::new(EngineConfig::default());
//! engine.process_mem_alloc(100, 0x1000, 8, AllocKind::Heap);
//! engine.process_top_level(1, 0x1000, 0);
//! engine.process_top_level(2, 0x1000, 0);
//! assert!(engine.finish().contains(1, 2));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    analyze, collect_aliases, collect_pointees, AliasEngine, EngineStats, PointeeAnalysis,
    PointeeCollector,
};
pub use domain::{Definition, Location};
pub use infrastructure::PointsToStore;
pub use ports::{AliasAnalysisView, AliasVerdict, DynamicAnalysis};
