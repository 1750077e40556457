//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains (as needed):
//! - domain/     - Pure data model
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Storage and codecs
//!
//! Data flows one way: trace → memory / context → points_to → alias_report,
//! and the checker only ever reads the finished report.

// Address ranges, version numbers
pub mod memory;

// Call stacks and invocation ids
pub mod context;

// Definitions, the points-to store and the alias engine
pub mod points_to;

// Canonical pairs and the finished report
pub mod alias_report;

// Record model, codecs and the dispatcher
pub mod trace;

// Value id lookup
pub mod ids;

// Static analysis checking
pub mod checker;
