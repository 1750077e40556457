//! Trace replay

pub mod dispatcher;

pub use dispatcher::TraceDispatcher;
