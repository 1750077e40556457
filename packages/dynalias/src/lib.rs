/*
 * dynalias - Trace-Driven Dynamic Alias Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Primitive ids, address ranges
 * - features/    : Vertical slices (trace → memory → context → points_to → alias_report → checker)
 * - config/      : YAML configuration with validation
 *
 * A single forward pass over the trace reconstructs which pointer pairs
 * were observed pointing at the same live object, under address reuse,
 * recursion and multiple threads.
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility
#![allow(clippy::len_without_is_empty)] // Counters, not collections

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (vertical slices)
pub mod features;

/// Configuration
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalysisKind, CheckerConfig, DynAliasConfig, EngineConfig, ForkPolicy};
pub use errors::{DynAliasError, Result};
pub use features::alias_report::{AliasPair, AliasReport};
pub use features::checker::{AliasChecker, AliasTable, CheckReport, StaticAliasOracle};
pub use features::ids::{IdLookup, IdTable};
pub use features::points_to::{
    analyze, AliasEngine, AliasVerdict, DynamicAnalysis, EngineStats, PointeeCollector,
};
pub use features::trace::{TraceDispatcher, TraceRecord, TraceVisitor};
pub use shared::models::{Address, AddressRange, AllocKind, InvocationId, ThreadId, ValueId};
