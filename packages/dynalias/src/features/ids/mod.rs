//! Value identifier lookup

pub mod id_table;

pub use id_table::{IdLookup, IdTable, ValueInfo, ValueKind};
