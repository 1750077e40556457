//! Domain models for the dynamic points-to relation
//!
//! - Definition: pointer value tagged with the invocation it was observed in
//! - Location: address + allocation version it currently targets

pub mod definition;

pub use definition::{Definition, Location};
