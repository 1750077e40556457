//! # Trace records and replay
//!
//! The external instrumentation step produces an ordered record stream; this
//! feature decodes it and drives any [`TraceVisitor`] over it.
//!
//! ## Usage
//! ```text
//! use dynalias::features::trace::{TextTraceReader, TraceDispatcher};
//!
//! let reader = TextTraceReader::open("run.trace")?;
//! let mut engine = AliasEngine::new(EngineConfig::default());
//! TraceDispatcher::new(1_000_000).replay(reader, &mut engine)?;
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::TraceDispatcher;
pub use domain::TraceRecord;
pub use infrastructure::{
    open_trace, FramedTraceReader, FramedTraceWriter, RecordStream, TextTraceReader,
    TextTraceWriter, TraceFormat,
};
pub use ports::TraceVisitor;
