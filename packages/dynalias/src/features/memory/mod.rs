//! Memory model
//!
//! - [`IntervalIndex`]: overlap-aware range map
//! - [`AddressVersionStore`]: address → allocation version, with the
//!   version-unknown escape sets

pub mod interval_index;
pub mod version_store;

pub use interval_index::IntervalIndex;
pub use version_store::{AddressVersionStore, Superseded};
