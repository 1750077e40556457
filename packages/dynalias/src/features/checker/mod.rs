//! # Alias Analysis Checker
//!
//! Consumer of the finished alias report: reports dynamic aliases that a
//! static analysis claims can never happen.
//!
//! - [`StaticAliasOracle`]: the analysis under test
//! - [`AliasTable`]: oracle backed by a JSON verdict table
//! - [`AliasChecker`]: produces a [`CheckReport`] of [`MissingAlias`] findings

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{refuted_pairs, AliasChecker};
pub use domain::{CheckReport, MissingAlias};
pub use infrastructure::AliasTable;
pub use ports::{ConstantOracle, StaticAliasOracle};
