//! Infrastructure layer for the points-to relation
//!
//! - **PointsToStore**: Definition ⇄ Location index maps

pub mod store;

pub use store::PointsToStore;
