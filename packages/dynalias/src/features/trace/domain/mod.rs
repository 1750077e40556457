//! Trace domain

pub mod record;

pub use record::TraceRecord;
