//! Alias reporting
//!
//! - [`AliasPair`]: canonical unordered value pair
//! - [`AliasReporter`]: live, append-only pair set used during the pass
//! - [`AliasReport`]: frozen snapshot handed to consumers

pub mod alias_pair;
pub mod report;
pub mod reporter;

pub use alias_pair::AliasPair;
pub use report::{AliasReport, UnknownVersions};
pub use reporter::AliasReporter;
