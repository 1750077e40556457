//! Checking a static analysis against dynamic ground truth

pub mod checker;

pub use checker::{refuted_pairs, AliasChecker};
